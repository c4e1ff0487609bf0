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

//! A generic, thread-safe message channel.
//!
//! The network collaborator pushes parsed command predicates onto a bus
//! from its own threads; the simulation loop drains them once per step.
//! A second bus carries outbound observation lists the other way. The bus
//! is generic over the message type so this crate stays decoupled from
//! the concrete payloads higher layers define.

use log;

/// Manages an unbounded, multi-producer channel for messages of type `T`.
#[derive(Debug)]
pub struct MessageBus<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> MessageBus<T> {
    /// Creates a new bus with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Attempts to send a message, logging if the receiver is disconnected.
    ///
    /// Sending never blocks; a disconnected receiver means the consumer
    /// side shut down first and the message is dropped.
    pub fn publish(&self, message: T) {
        if let Err(e) = self.sender.send(message) {
            log::error!("Failed to send message: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sender end of the channel.
    ///
    /// Hand this to producers (e.g. the network layer) so they can publish
    /// from their own threads.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end of the channel.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }

    /// Drains every message currently queued, without blocking.
    ///
    /// The step loop calls this once per step so that messages arriving
    /// mid-step are deferred to the next one.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T: Send + 'static> Default for MessageBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn publish_then_drain_preserves_order() {
        let bus = MessageBus::new();
        bus.publish(1);
        bus.publish(2);
        bus.publish(3);
        assert_eq!(bus.drain(), vec![1, 2, 3]);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn drain_on_empty_bus_does_not_block() {
        let bus: MessageBus<i32> = MessageBus::new();
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn senders_work_across_threads() {
        let bus = MessageBus::new();
        let sender = bus.sender();
        let handle = thread::spawn(move || {
            for i in 0..10 {
                sender.send(i).expect("receiver alive");
            }
        });
        handle.join().unwrap();
        assert_eq!(bus.drain().len(), 10);
    }
}
