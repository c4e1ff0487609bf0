// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Perceptor for single-axis (hinge) joints.

use rondo_core::agent::Perceptor;
use rondo_core::class::SimObject;
use rondo_core::physics::{JointAxis, JointHandle, PhysicsProvider};
use rondo_core::predicate::{Predicate, PredicateList, PredicateValue};
use std::any::Any;

/// The predicate name under which hinge joint state is reported.
pub const HINGE_PERCEPT: &str = "HJ";

/// Reports a hinge joint's axis angle, and optionally its rate.
///
/// Field order: `(HJ <name> <angle-deg> [<rate-deg-per-sec>])`.
pub struct HingeJointPerceptor {
    name: String,
    joint: Option<JointHandle>,
    report_rate: bool,
}

impl HingeJointPerceptor {
    /// Creates a perceptor reporting under the given joint wire name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joint: None,
            report_rate: false,
        }
    }

    /// Also report the axis rate each step.
    pub fn with_rate(mut self) -> Self {
        self.report_rate = true;
        self
    }

    /// Attaches the perceptor to its joint.
    pub fn link(&mut self, joint: JointHandle) {
        self.joint = Some(joint);
    }
}

impl SimObject for HingeJointPerceptor {
    fn class_name(&self) -> &str {
        "HingeJointPerceptor"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Perceptor for HingeJointPerceptor {
    fn percept(&self, world: &dyn PhysicsProvider, output: &mut PredicateList) -> bool {
        let Some(joint) = self.joint else {
            return false;
        };
        let Some(angle) = world.joint_angle(joint, JointAxis::First) else {
            return false;
        };

        let mut args = vec![
            PredicateValue::Str(self.name.clone()),
            PredicateValue::Float(angle),
        ];
        if self.report_rate {
            match world.joint_rate(joint, JointAxis::First) {
                Some(rate) => args.push(PredicateValue::Float(rate)),
                None => return false,
            }
        }
        output.push(Predicate::new(HINGE_PERCEPT, args));
        true
    }
}
