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

use rondo_core::math::{Quat, Vec3};
use rondo_core::physics::BodyHandle;
use rondo_render::{BodyPose, FrameBuffer, FrameSnapshot};
use std::sync::Arc;
use std::thread;

/// Builds a frame whose every field is derived from the step index, so a
/// reader can detect any mixture of two frames.
fn stamped_frame(step: u64) -> FrameSnapshot {
    let stamp = step as f32;
    let poses = (0..8)
        .map(|i| BodyPose {
            body: BodyHandle(i),
            position: Vec3::new(stamp, stamp, stamp),
            orientation: Quat::new(0.0, 0.0, 0.0, stamp),
        })
        .collect();
    FrameSnapshot {
        step,
        sim_time: stamp,
        poses,
    }
}

/// Asserts that every field of the frame belongs to the same step.
fn assert_consistent(frame: &FrameSnapshot) {
    let stamp = frame.step as f32;
    assert_eq!(frame.sim_time, stamp, "sim_time from a different step");
    for pose in &frame.poses {
        assert_eq!(pose.position, Vec3::new(stamp, stamp, stamp));
        assert_eq!(pose.orientation.w, stamp);
    }
}

#[test]
fn concurrent_reader_never_observes_a_mixed_frame() {
    let buffer = Arc::new(FrameBuffer::new());
    buffer.publish(stamped_frame(0));

    let writer_buffer = buffer.clone();
    let writer = thread::spawn(move || {
        for step in 1..=2_000 {
            writer_buffer.publish(stamped_frame(step));
        }
    });

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let reader_buffer = buffer.clone();
            thread::spawn(move || {
                let mut last_step = 0;
                for _ in 0..2_000 {
                    let frame = reader_buffer.read();
                    assert_consistent(&frame);
                    // Published steps are monotonic, so observed steps
                    // must never go backwards either.
                    assert!(frame.step >= last_step, "front buffer went backwards");
                    last_step = frame.step;
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
