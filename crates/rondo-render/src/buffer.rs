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

//! Double-buffered snapshot hand-off between simulation and renderer.

use crate::snapshot::FrameSnapshot;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Two fixed buffers with an atomically swapped front index.
///
/// The simulation side writes the back buffer during each step, then
/// publishes it with a single release-store of the index; no field-by-field
/// copy is ever visible to the consumer side. Readers acquire-load the
/// index and see either the fully-previous or the fully-current frame,
/// never a mixture.
///
/// The per-buffer lock only guards against a reader still cloning the old
/// front while the writer laps it; the writer never touches the buffer a
/// new reader would pick up.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buffers: [RwLock<FrameSnapshot>; 2],
    front: AtomicUsize,
}

impl FrameBuffer {
    /// Creates a buffer pair holding empty frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a new frame, making it the front buffer.
    ///
    /// Called by the simulation side at each step boundary.
    pub fn publish(&self, frame: FrameSnapshot) {
        let back = 1 - self.front.load(Ordering::Acquire);
        {
            let mut slot = self.buffers[back].write().expect("frame buffer poisoned");
            *slot = frame;
        }
        self.front.store(back, Ordering::Release);
    }

    /// Reads the front buffer.
    ///
    /// If the simulation has not published since the last read, this
    /// returns the same frame again.
    pub fn read(&self) -> FrameSnapshot {
        let front = self.front.load(Ordering::Acquire);
        self.buffers[front]
            .read()
            .expect("frame buffer poisoned")
            .clone()
    }

    /// The step index of the frame currently in front.
    pub fn front_step(&self) -> u64 {
        let front = self.front.load(Ordering::Acquire);
        self.buffers[front]
            .read()
            .expect("frame buffer poisoned")
            .step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_an_empty_frame() {
        let buffer = FrameBuffer::new();
        assert_eq!(buffer.read(), FrameSnapshot::default());
    }

    #[test]
    fn publish_makes_frame_visible() {
        let buffer = FrameBuffer::new();
        buffer.publish(FrameSnapshot {
            step: 3,
            sim_time: 0.06,
            poses: Vec::new(),
        });
        assert_eq!(buffer.read().step, 3);
        assert_eq!(buffer.front_step(), 3);
    }

    #[test]
    fn reader_sees_latest_of_consecutive_publishes() {
        let buffer = FrameBuffer::new();
        for step in 1..=5 {
            buffer.publish(FrameSnapshot {
                step,
                sim_time: step as f32 * 0.02,
                poses: Vec::new(),
            });
        }
        assert_eq!(buffer.read().step, 5);
    }

    #[test]
    fn rereading_without_publish_returns_same_frame() {
        let buffer = FrameBuffer::new();
        buffer.publish(FrameSnapshot {
            step: 1,
            sim_time: 0.02,
            poses: Vec::new(),
        });
        assert_eq!(buffer.read(), buffer.read());
    }
}
