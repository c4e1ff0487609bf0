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

//! Kinematic implementation of the physics provider.
//!
//! Joints hold an angle per axis and integrate it from the commanded motor
//! velocity; bodies translate with a constant linear velocity. No forces,
//! no collision. Enough to exercise actuation, perception, and snapshot
//! hand-off end to end.

use rondo_core::math::{Quat, Vec3};
use rondo_core::physics::{BodyHandle, JointAxis, JointHandle, PhysicsProvider};
use std::collections::BTreeMap;

/// Kinematic state of one joint axis.
#[derive(Debug, Clone, Copy, Default)]
struct AxisState {
    /// Current angle in degrees.
    angle: f32,
    /// Commanded motor velocity in degrees per second.
    rate: f32,
}

#[derive(Debug, Clone)]
struct JointState {
    first: AxisState,
    /// `None` for hinge joints, `Some` for universal joints.
    second: Option<AxisState>,
}

#[derive(Debug, Clone)]
struct BodyState {
    position: Vec3,
    orientation: Quat,
    linear_velocity: Vec3,
}

/// An in-memory kinematic world implementing [`PhysicsProvider`].
#[derive(Debug, Default)]
pub struct KinematicWorld {
    // BTreeMaps keep handle iteration order stable across steps.
    joints: BTreeMap<u64, JointState>,
    bodies: BTreeMap<u64, BodyState>,
    next_id: u64,
    sim_time: f32,
}

impl KinematicWorld {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single-axis (hinge) joint at angle zero.
    pub fn add_hinge_joint(&mut self) -> JointHandle {
        self.insert_joint(JointState {
            first: AxisState::default(),
            second: None,
        })
    }

    /// Adds a two-axis (universal) joint at angle zero on both axes.
    pub fn add_universal_joint(&mut self) -> JointHandle {
        self.insert_joint(JointState {
            first: AxisState::default(),
            second: Some(AxisState::default()),
        })
    }

    /// Adds a body with the given pose and linear velocity.
    pub fn add_body(&mut self, position: Vec3, linear_velocity: Vec3) -> BodyHandle {
        let id = self.fresh_id();
        self.bodies.insert(
            id,
            BodyState {
                position,
                orientation: Quat::IDENTITY,
                linear_velocity,
            },
        );
        BodyHandle(id)
    }

    /// Total simulated time in seconds.
    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    fn insert_joint(&mut self, state: JointState) -> JointHandle {
        let id = self.fresh_id();
        self.joints.insert(id, state);
        JointHandle(id)
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn axis_state(&self, joint: JointHandle, axis: JointAxis) -> Option<&AxisState> {
        let state = self.joints.get(&joint.0)?;
        match axis {
            JointAxis::First => Some(&state.first),
            JointAxis::Second => state.second.as_ref(),
        }
    }

    fn axis_state_mut(&mut self, joint: JointHandle, axis: JointAxis) -> Option<&mut AxisState> {
        let state = self.joints.get_mut(&joint.0)?;
        match axis {
            JointAxis::First => Some(&mut state.first),
            JointAxis::Second => state.second.as_mut(),
        }
    }
}

impl PhysicsProvider for KinematicWorld {
    fn step(&mut self, dt: f32) {
        for state in self.joints.values_mut() {
            state.first.angle += state.first.rate * dt;
            if let Some(second) = &mut state.second {
                second.angle += second.rate * dt;
            }
        }
        for body in self.bodies.values_mut() {
            body.position = body.position + body.linear_velocity * dt;
        }
        self.sim_time += dt;
    }

    fn joint_angle(&self, joint: JointHandle, axis: JointAxis) -> Option<f32> {
        self.axis_state(joint, axis).map(|s| s.angle)
    }

    fn joint_rate(&self, joint: JointHandle, axis: JointAxis) -> Option<f32> {
        self.axis_state(joint, axis).map(|s| s.rate)
    }

    fn set_motor_velocity(&mut self, joint: JointHandle, axis: JointAxis, target: f32) -> bool {
        match self.axis_state_mut(joint, axis) {
            Some(state) => {
                state.rate = target;
                true
            }
            None => {
                log::warn!("set_motor_velocity on unknown joint {joint:?} axis {axis:?}");
                false
            }
        }
    }

    fn body_pose(&self, body: BodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies
            .get(&body.0)
            .map(|b| (b.position, b.orientation))
    }

    fn bodies(&self) -> Vec<BodyHandle> {
        self.bodies.keys().copied().map(BodyHandle).collect()
    }
}
