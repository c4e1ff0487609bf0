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

//! Perceptor for two-axis (universal) joints.

use rondo_core::agent::Perceptor;
use rondo_core::class::SimObject;
use rondo_core::physics::{JointAxis, JointHandle, PhysicsProvider};
use rondo_core::predicate::{Predicate, PredicateList, PredicateValue};
use std::any::Any;

/// The predicate name under which universal joint state is reported.
pub const UNIVERSAL_PERCEPT: &str = "UJ";

/// Reports both axis angles of a universal joint, and optionally the
/// rates.
///
/// Field order:
/// `(UJ <name> <ax1-deg> <ax2-deg> [<rt1-deg-per-sec> <rt2-deg-per-sec>])`.
pub struct UniversalJointPerceptor {
    name: String,
    joint: Option<JointHandle>,
    report_rate: bool,
}

impl UniversalJointPerceptor {
    /// Creates a perceptor reporting under the given joint wire name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joint: None,
            report_rate: false,
        }
    }

    /// Also report both axis rates each step.
    pub fn with_rate(mut self) -> Self {
        self.report_rate = true;
        self
    }

    /// Attaches the perceptor to its joint.
    pub fn link(&mut self, joint: JointHandle) {
        self.joint = Some(joint);
    }
}

impl SimObject for UniversalJointPerceptor {
    fn class_name(&self) -> &str {
        "UniversalJointPerceptor"
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

impl Perceptor for UniversalJointPerceptor {
    fn percept(&self, world: &dyn PhysicsProvider, output: &mut PredicateList) -> bool {
        let Some(joint) = self.joint else {
            return false;
        };
        // Both axes must be readable before anything is appended; a joint
        // that lost an axis mid-simulation reports nothing at all.
        let (Some(ax1), Some(ax2)) = (
            world.joint_angle(joint, JointAxis::First),
            world.joint_angle(joint, JointAxis::Second),
        ) else {
            return false;
        };

        let mut args = vec![
            PredicateValue::Str(self.name.clone()),
            PredicateValue::Float(ax1),
            PredicateValue::Float(ax2),
        ];
        if self.report_rate {
            let (Some(rt1), Some(rt2)) = (
                world.joint_rate(joint, JointAxis::First),
                world.joint_rate(joint, JointAxis::Second),
            ) else {
                return false;
            };
            args.push(PredicateValue::Float(rt1));
            args.push(PredicateValue::Float(rt2));
        }
        output.push(Predicate::new(UNIVERSAL_PERCEPT, args));
        true
    }
}
