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

//! The proxy server: buffered snapshot hand-off at a configurable cadence.

use crate::buffer::FrameBuffer;
use crate::snapshot::FrameSnapshot;
use rondo_core::class::dispatch::ArgType;
use rondo_core::class::{ClassDescriptor, SimObject};
use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default hand-off cadence (25 Hz).
pub const DEFAULT_CYCLE_MS: u64 = 40;

/// How often a disabled consumer (cycle length zero) re-checks the cadence.
const IDLE_POLL: Duration = Duration::from_millis(20);

/// Hands buffered simulation snapshots to a cadence-driven consumer.
///
/// The simulation side publishes through [`publish`](ProxyServer::publish)
/// at every step boundary; the consumer side runs on its own thread at
/// [`cycle_length`](ProxyServer::cycle_length) intervals, independent of
/// the step rate. Changing the cadence is cheap, synchronous, and takes
/// effect at the next tick boundary; it never interrupts an in-flight
/// tick and never blocks on the consumer.
pub struct ProxyServer {
    cycle_ms: Arc<AtomicU64>,
    buffer: Arc<FrameBuffer>,
}

impl ProxyServer {
    /// Creates a proxy server with the default cadence.
    pub fn new() -> Self {
        Self {
            cycle_ms: Arc::new(AtomicU64::new(DEFAULT_CYCLE_MS)),
            buffer: Arc::new(FrameBuffer::new()),
        }
    }

    /// The current hand-off cadence.
    pub fn cycle_length(&self) -> Duration {
        Duration::from_millis(self.cycle_ms.load(Ordering::Relaxed))
    }

    /// Sets the hand-off cadence in milliseconds.
    ///
    /// Zero disables the consumer tick until a positive cadence is set.
    /// The new value is picked up when the consumer schedules its next
    /// tick; the currently executing tick keeps the cadence it started
    /// with.
    pub fn set_cycle_length(&self, milliseconds: u64) {
        log::info!("render cycle length set to {milliseconds} ms");
        self.cycle_ms.store(milliseconds, Ordering::Relaxed);
    }

    /// The shared buffer pair.
    pub fn buffer(&self) -> Arc<FrameBuffer> {
        self.buffer.clone()
    }

    /// Publishes a frame at a step boundary (simulation side).
    pub fn publish(&self, frame: FrameSnapshot) {
        self.buffer.publish(frame);
    }

    /// Spawns the cadence-driven consumer thread.
    ///
    /// `on_frame` runs once per tick with the current front frame. If the
    /// simulation is slower than the cadence, the same frame is delivered
    /// again; if faster, intermediate frames are skipped. The cadence is
    /// advisory, not a guarantee that every frame is rendered.
    pub fn start_consumer<F>(&self, mut on_frame: F) -> RenderConsumer
    where
        F: FnMut(&FrameSnapshot) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let cycle_ms = self.cycle_ms.clone();
        let buffer = self.buffer.clone();

        let handle = thread::spawn(move || {
            log::debug!("render consumer started");
            while !stop_flag.load(Ordering::Relaxed) {
                // Latch the cadence at the tick boundary; a change made
                // while this tick sleeps applies to the next one.
                let cycle = cycle_ms.load(Ordering::Relaxed);
                if cycle == 0 {
                    thread::sleep(IDLE_POLL);
                    continue;
                }
                thread::sleep(Duration::from_millis(cycle));
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                let frame = buffer.read();
                on_frame(&frame);
            }
            log::debug!("render consumer stopped");
        });

        RenderConsumer {
            stop,
            handle: Some(handle),
        }
    }
}

impl Default for ProxyServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimObject for ProxyServer {
    fn class_name(&self) -> &str {
        "ProxyServer"
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

impl ProxyServer {
    /// The class descriptor declared to the registry during the load
    /// phase. Expects the `"Leaf"` root to be registered already.
    pub fn class_descriptor() -> ClassDescriptor {
        ClassDescriptor::new("ProxyServer", Box::new(|| Box::new(ProxyServer::new())))
            .with_parent("Leaf")
            .with_function(
                "setCycleLength",
                vec![ArgType::Uint],
                Box::new(|obj, args| {
                    let Some(server) = obj.as_any_mut().downcast_mut::<ProxyServer>() else {
                        return false;
                    };
                    let Some(milliseconds) = args[0].as_uint() else {
                        return false;
                    };
                    server.set_cycle_length(milliseconds as u64);
                    true
                }),
            )
    }
}

/// Handle to a running render consumer thread.
pub struct RenderConsumer {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl RenderConsumer {
    /// Signals the consumer to stop and waits for it to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RenderConsumer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rondo_core::class::{ClassRegistry, Leaf};
    use rondo_core::predicate::PredicateValue;

    fn registry_with_proxy() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry
            .register(ClassDescriptor::new(
                "Leaf",
                Box::new(|| Box::new(Leaf::new("Leaf"))),
            ))
            .unwrap();
        registry.register(ProxyServer::class_descriptor()).unwrap();
        registry
    }

    #[test]
    fn default_cadence_is_applied() {
        let server = ProxyServer::new();
        assert_eq!(server.cycle_length(), Duration::from_millis(DEFAULT_CYCLE_MS));
    }

    #[test]
    fn set_cycle_length_command_with_valid_argument() {
        let registry = registry_with_proxy();
        let mut server = ProxyServer::new();
        assert!(registry.dispatch(&mut server, "setCycleLength", &[PredicateValue::Int(16)]));
        assert_eq!(server.cycle_length(), Duration::from_millis(16));
    }

    #[test]
    fn set_cycle_length_command_rejects_bad_arguments() {
        let registry = registry_with_proxy();
        let mut server = ProxyServer::new();
        let before = server.cycle_length();

        // Negative cadence is not representable.
        assert!(!registry.dispatch(&mut server, "setCycleLength", &[PredicateValue::Int(-5)]));
        // Wrong type.
        assert!(!registry.dispatch(
            &mut server,
            "setCycleLength",
            &[PredicateValue::Str("fast".into())]
        ));
        // Wrong arity.
        assert!(!registry.dispatch(
            &mut server,
            "setCycleLength",
            &[PredicateValue::Int(16), PredicateValue::Int(32)]
        ));

        assert_eq!(server.cycle_length(), before);
    }

    #[test]
    fn proxy_is_kind_of_leaf() {
        let registry = registry_with_proxy();
        let instance = registry.create_instance("ProxyServer").unwrap();
        assert!(registry.is_kind_of(instance.as_ref(), "Leaf"));
    }
}
