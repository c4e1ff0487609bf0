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

//! Decouples an asynchronous renderer from the physics step.
//!
//! The simulation loop publishes a [`FrameSnapshot`] at every step
//! boundary through a double-buffered [`FrameBuffer`]; a consumer driven
//! by the [`ProxyServer`]'s configurable cycle length reads the front
//! buffer at its own cadence. The only state shared across that boundary
//! is the buffer pair.

pub mod buffer;
pub mod proxy;
pub mod snapshot;

pub use buffer::FrameBuffer;
pub use proxy::{ProxyServer, RenderConsumer};
pub use snapshot::{BodyPose, FrameSnapshot};
