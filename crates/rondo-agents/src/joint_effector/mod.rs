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

//! Effector actuating a hinge joint motor.

use rondo_core::agent::{ActionObject, Effector, PendingSlot};
use rondo_core::class::dispatch::ArgType;
use rondo_core::class::SimObject;
use rondo_core::physics::{JointAxis, JointHandle, PhysicsProvider};
use rondo_core::predicate::Predicate;
use std::any::Any;

/// Drives the motor of one hinge joint from agent commands.
///
/// Each robot joint gets its own instance, answering to the joint's wire
/// name (e.g. `"lae1"`). The command carries a single velocity target in
/// degrees per second. The effector only becomes useful after
/// [`link`](HingeJointEffector::link) attaches it to a joint; commands
/// decoded before that are dropped at application time.
pub struct HingeJointEffector {
    predicate: String,
    joint: Option<JointHandle>,
    pending: PendingSlot,
}

impl HingeJointEffector {
    /// Creates an effector answering to the given command name.
    pub fn new(predicate: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            joint: None,
            pending: PendingSlot::new(),
        }
    }

    /// Attaches the effector to its joint.
    pub fn link(&mut self, joint: JointHandle) {
        self.joint = Some(joint);
    }

    /// The linked joint, if any.
    pub fn joint(&self) -> Option<JointHandle> {
        self.joint
    }
}

impl SimObject for HingeJointEffector {
    fn class_name(&self) -> &str {
        "HingeJointEffector"
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

impl Effector for HingeJointEffector {
    fn predicate_name(&self) -> &str {
        &self.predicate
    }

    fn realize(&mut self, predicate: &Predicate) -> bool {
        if predicate.name() != self.predicate {
            return false;
        }
        match ActionObject::decode(predicate, &[ArgType::Float]) {
            Some(action) => {
                self.pending.set(action);
                true
            }
            None => {
                log::debug!(
                    "{}: rejected malformed motor command {predicate}",
                    self.predicate
                );
                false
            }
        }
    }

    fn apply_pending(&mut self, world: &mut dyn PhysicsProvider, _delta_time: f32) {
        let Some(action) = self.pending.take() else {
            return;
        };
        let Some(joint) = self.joint else {
            log::warn!("{}: dropping motor command, joint not linked", self.predicate);
            return;
        };
        let Some(target) = action.float_at(0) else {
            return;
        };
        if !world.set_motor_velocity(joint, JointAxis::First, target) {
            log::warn!("{}: joint {joint:?} rejected motor target", self.predicate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rondo_core::predicate::PredicateValue;

    fn motor_command(name: &str, target: f32) -> Predicate {
        Predicate::new(name, vec![PredicateValue::Float(target)])
    }

    #[test]
    fn realize_requires_matching_name_and_shape() {
        let mut effector = HingeJointEffector::new("lae1");
        assert!(effector.realize(&motor_command("lae1", 45.0)));
        assert!(!effector.realize(&motor_command("rae1", 45.0)));
        assert!(!effector.realize(&Predicate::new(
            "lae1",
            vec![PredicateValue::Str("fast".into())]
        )));
    }

    #[test]
    fn last_write_wins_within_a_step() {
        let mut effector = HingeJointEffector::new("lae1");
        assert!(effector.realize(&motor_command("lae1", 10.0)));
        assert!(effector.realize(&motor_command("lae1", 99.0)));
        // Only the later command survives; verified end to end in the
        // integration tests with a real provider.
    }
}
