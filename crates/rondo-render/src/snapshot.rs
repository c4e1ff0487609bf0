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

//! Immutable per-step snapshots of the simulation state visible to a
//! renderer.

use bincode::{Decode, Encode};
use rondo_core::math::{Quat, Vec3};
use rondo_core::physics::{BodyHandle, PhysicsProvider};
use serde::{Deserialize, Serialize};

/// World-space pose of one body at a step boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct BodyPose {
    /// The body this pose belongs to.
    pub body: BodyHandle,
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
}

/// A fully-consistent view of the simulation at one step boundary.
///
/// All fields describe the same step; consumers never see a mixture of
/// two steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct FrameSnapshot {
    /// Monotonic step index, starting at zero.
    pub step: u64,
    /// Total simulated time in seconds.
    pub sim_time: f32,
    /// Poses of every body, in the provider's stable order.
    pub poses: Vec<BodyPose>,
}

impl FrameSnapshot {
    /// Captures the current provider state into a snapshot.
    pub fn capture(world: &dyn PhysicsProvider, step: u64, sim_time: f32) -> Self {
        let poses = world
            .bodies()
            .into_iter()
            .filter_map(|body| {
                world
                    .body_pose(body)
                    .map(|(position, orientation)| BodyPose {
                        body,
                        position,
                        orientation,
                    })
            })
            .collect();
        Self {
            step,
            sim_time,
            poses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rondo_infra::KinematicWorld;

    #[test]
    fn capture_collects_all_body_poses() {
        let mut world = KinematicWorld::new();
        let a = world.add_body(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
        let b = world.add_body(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO);

        let snapshot = FrameSnapshot::capture(&world, 7, 0.14);
        assert_eq!(snapshot.step, 7);
        assert_eq!(snapshot.poses.len(), 2);
        let bodies: Vec<_> = snapshot.poses.iter().map(|p| p.body).collect();
        assert!(bodies.contains(&a));
        assert!(bodies.contains(&b));
    }

    #[test]
    fn empty_world_captures_empty_snapshot() {
        let world = KinematicWorld::new();
        let snapshot = FrameSnapshot::capture(&world, 0, 0.0);
        assert!(snapshot.poses.is_empty());
    }
}
