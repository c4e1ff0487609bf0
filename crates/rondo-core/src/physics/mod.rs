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

//! # Physics Abstractions
//!
//! The collaborator contract consumed from the physics engine: get/set
//! accessors for joint axis state and body poses, and motor actuation.
//! Integration itself (rigid body dynamics, collision) lives behind this
//! trait in a provider crate.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::math::{Quat, Vec3};

/// Opaque handle to a rigid body in the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct BodyHandle(pub u64);

/// Opaque handle to a joint in the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct JointHandle(pub u64);

/// Selects one rotation axis of a joint.
///
/// Hinge joints expose only [`First`](JointAxis::First); universal joints
/// expose both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum JointAxis {
    /// The primary rotation axis.
    First,
    /// The secondary rotation axis (universal joints only).
    Second,
}

/// Interface contract for any physics engine implementation.
///
/// Angles and rates cross this boundary in **degrees** and degrees per
/// second, matching the agent wire protocol. Accessors return `None` for
/// handles (or axes) the provider does not know, so callers can probe
/// safely every step.
pub trait PhysicsProvider: Send + Sync {
    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);

    /// The current angle of a joint axis, in degrees.
    fn joint_angle(&self, joint: JointHandle, axis: JointAxis) -> Option<f32>;

    /// The current angular rate of a joint axis, in degrees per second.
    fn joint_rate(&self, joint: JointHandle, axis: JointAxis) -> Option<f32>;

    /// Drives a joint axis motor toward the given velocity target, in
    /// degrees per second. Returns `false` for an unknown joint or axis.
    fn set_motor_velocity(&mut self, joint: JointHandle, axis: JointAxis, target: f32) -> bool;

    /// The world-space pose of a body.
    fn body_pose(&self, body: BodyHandle) -> Option<(Vec3, Quat)>;

    /// All body handles currently alive, in stable order.
    fn bodies(&self) -> Vec<BodyHandle>;
}
