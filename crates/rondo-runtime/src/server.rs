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

//! The stepped simulation server.
//!
//! One step is a fixed sequence: drain the inbound command queue and route
//! each predicate to the effector that answers to it (a later command for
//! the same effector overwrites an earlier one), apply every pending
//! action exactly once, advance physics, publish the frame snapshot, then
//! run the perceptors and emit their observations.

use rondo_core::agent::{Effector, Perceptor};
use rondo_core::event::MessageBus;
use rondo_core::physics::PhysicsProvider;
use rondo_core::predicate::{Predicate, PredicateList};
use rondo_core::telemetry::{CounterHandle, GaugeHandle, MetricsRegistry};
use rondo_core::Stopwatch;
use rondo_render::{FrameSnapshot, ProxyServer};
use std::time::Duration;

/// Holds telemetry handles for the step loop.
struct ServerMetrics {
    step_time_ms: GaugeHandle,
    commands_accepted: CounterHandle,
    percepts_emitted: CounterHandle,
}

/// The single authority over physics stepping and predicate application.
pub struct SimulationServer {
    world: Box<dyn PhysicsProvider>,
    effectors: Vec<Box<dyn Effector>>,
    perceptors: Vec<Box<dyn Perceptor>>,
    commands: MessageBus<Predicate>,
    percepts: MessageBus<PredicateList>,
    proxy: ProxyServer,
    step_seconds: f32,
    step_index: u64,
    sim_time: f32,
    metrics: Option<ServerMetrics>,
}

impl SimulationServer {
    /// Creates a server around a prepared physics world.
    pub fn new(world: Box<dyn PhysicsProvider>, proxy: ProxyServer, step: Duration) -> Self {
        Self {
            world,
            effectors: Vec::new(),
            perceptors: Vec::new(),
            commands: MessageBus::new(),
            percepts: MessageBus::new(),
            proxy,
            step_seconds: step.as_secs_f32(),
            step_index: 0,
            sim_time: 0.0,
            metrics: None,
        }
    }

    /// Attaches a metrics registry to the server for observability.
    pub fn with_telemetry(mut self, registry: &MetricsRegistry) -> Self {
        let metrics = ServerMetrics {
            step_time_ms: registry.register_gauge("sim", "step_time_ms").unwrap(),
            commands_accepted: registry.register_counter("sim", "commands_accepted").unwrap(),
            percepts_emitted: registry.register_counter("sim", "percepts_emitted").unwrap(),
        };
        self.metrics = Some(metrics);
        self
    }

    /// Adds an effector to the step loop.
    pub fn add_effector(&mut self, effector: Box<dyn Effector>) {
        self.effectors.push(effector);
    }

    /// Adds a perceptor to the step loop.
    pub fn add_perceptor(&mut self, perceptor: Box<dyn Perceptor>) {
        self.perceptors.push(perceptor);
    }

    /// Sender handed to the network layer for inbound commands.
    pub fn command_sender(&self) -> flume::Sender<Predicate> {
        self.commands.sender()
    }

    /// Receiver handed to the network layer for outbound observations.
    pub fn percept_receiver(&self) -> flume::Receiver<PredicateList> {
        self.percepts.receiver().clone()
    }

    /// The render hand-off server.
    pub fn proxy(&self) -> &ProxyServer {
        &self.proxy
    }

    /// The number of completed steps.
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Executes one simulation step.
    pub fn step(&mut self) {
        let watch = Stopwatch::new();

        // Route inbound commands. Each effector keeps only the last
        // command that reached it before this point.
        let mut accepted: u64 = 0;
        for predicate in self.commands.drain() {
            let mut handled = false;
            for effector in &mut self.effectors {
                if effector.realize(&predicate) {
                    handled = true;
                    accepted += 1;
                    break;
                }
            }
            if !handled {
                log::debug!("dropping unhandled command {predicate}");
            }
        }

        // Physics-update phase: each pending action applies exactly once.
        for effector in &mut self.effectors {
            effector.apply_pending(self.world.as_mut(), self.step_seconds);
        }

        self.world.step(self.step_seconds);
        self.step_index += 1;
        self.sim_time += self.step_seconds;

        // Step boundary: hand the renderer a consistent frame.
        self.proxy.publish(FrameSnapshot::capture(
            self.world.as_ref(),
            self.step_index,
            self.sim_time,
        ));

        let mut output = PredicateList::new();
        for perceptor in &self.perceptors {
            perceptor.percept(self.world.as_ref(), &mut output);
        }
        let emitted = output.len() as u64;
        if !output.is_empty() {
            self.percepts.publish(output);
        }

        if let Some(metrics) = &self.metrics {
            metrics.step_time_ms.set(watch.elapsed_secs_f64() * 1000.0);
            metrics.commands_accepted.add(accepted);
            metrics.percepts_emitted.add(emitted);
        }
    }

    /// Runs `steps` simulation steps, pacing each to the configured step
    /// length in wall-clock time.
    pub fn run(&mut self, steps: u64) {
        let step_duration = Duration::from_secs_f32(self.step_seconds);
        for _ in 0..steps {
            let watch = Stopwatch::new();
            self.step();
            let elapsed = watch.elapsed();
            if elapsed < step_duration {
                std::thread::sleep(step_duration - elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rondo_agents::{CatchEffector, HingeJointEffector, HingeJointPerceptor};
    use rondo_core::predicate::PredicateValue;
    use rondo_infra::KinematicWorld;

    fn motor_command(name: &str, target: f32) -> Predicate {
        Predicate::new(name, vec![PredicateValue::Float(target)])
    }

    fn server_with_hinge() -> (SimulationServer, rondo_core::physics::JointHandle) {
        let mut world = KinematicWorld::new();
        let joint = world.add_hinge_joint();

        let mut effector = HingeJointEffector::new("lae1");
        effector.link(joint);
        let mut perceptor = HingeJointPerceptor::new("laj1");
        perceptor.link(joint);

        let mut server = SimulationServer::new(
            Box::new(world),
            ProxyServer::new(),
            Duration::from_millis(20),
        );
        server.add_effector(Box::new(effector));
        server.add_perceptor(Box::new(perceptor));
        (server, joint)
    }

    #[test]
    fn commands_flow_through_one_step() {
        let (mut server, _joint) = server_with_hinge();
        let sender = server.command_sender();
        let percepts = server.percept_receiver();

        sender.send(motor_command("lae1", 50.0)).unwrap();
        server.step();

        // 50 deg/s over one 20 ms step.
        let output = percepts.try_recv().unwrap();
        let percept = output.iter().next().unwrap();
        assert_eq!(percept.name(), "HJ");
        let angle = percept.args()[1].as_float().unwrap();
        assert!((angle - 1.0).abs() < 1e-3, "unexpected angle {angle}");
    }

    #[test]
    fn later_command_overwrites_earlier_within_a_step() {
        let (mut server, _joint) = server_with_hinge();
        let sender = server.command_sender();
        let percepts = server.percept_receiver();

        sender.send(motor_command("lae1", 10.0)).unwrap();
        sender.send(motor_command("lae1", 100.0)).unwrap();
        server.step();

        let output = percepts.try_recv().unwrap();
        let angle = output.iter().next().unwrap().args()[1].as_float().unwrap();
        assert!((angle - 2.0).abs() < 1e-3, "unexpected angle {angle}");
    }

    #[test]
    fn malformed_commands_do_not_disturb_the_loop() {
        let (mut server, _joint) = server_with_hinge();
        let sender = server.command_sender();

        sender
            .send(Predicate::new("lae1", vec![PredicateValue::Str("oops".into())]))
            .unwrap();
        sender.send(Predicate::new("unknown", vec![])).unwrap();
        server.step();
        assert_eq!(server.step_index(), 1);
    }

    #[test]
    fn snapshots_are_published_at_step_boundaries() {
        let (mut server, _joint) = server_with_hinge();
        let buffer = server.proxy().buffer();

        server.step();
        server.step();
        assert_eq!(buffer.read().step, 2);
    }

    #[test]
    fn telemetry_tracks_accepted_commands() {
        let registry = MetricsRegistry::new();
        let (server, _joint) = server_with_hinge();
        let mut server = server.with_telemetry(&registry);
        let sender = server.command_sender();

        sender.send(motor_command("lae1", 10.0)).unwrap();
        sender.send(motor_command("lae1", 20.0)).unwrap();
        server.step();

        use rondo_core::telemetry::MetricId;
        assert_eq!(
            registry.get(&MetricId::new("sim", "commands_accepted")),
            Some(2.0)
        );
        assert_eq!(
            registry.get(&MetricId::new("sim", "percepts_emitted")),
            Some(1.0)
        );
    }

    #[test]
    fn catch_margin_scenario_end_to_end() {
        let world = KinematicWorld::new();
        let mut server = SimulationServer::new(
            Box::new(world),
            ProxyServer::new(),
            Duration::from_millis(20),
        );
        server.add_effector(Box::new(CatchEffector::new()));
        let sender = server.command_sender();

        sender
            .send(Predicate::new(
                "catch-margin",
                vec![PredicateValue::Float(0.5)],
            ))
            .unwrap();
        server.step();

        let margin = server.effectors[0]
            .as_any()
            .downcast_ref::<CatchEffector>()
            .unwrap()
            .catch_margin();
        assert_eq!(margin, 0.5);

        // Malformed follow-up leaves the margin untouched.
        sender
            .send(Predicate::new(
                "catch-margin",
                vec![PredicateValue::Float(0.7), PredicateValue::Float(1.0)],
            ))
            .unwrap();
        server.step();

        let margin = server.effectors[0]
            .as_any()
            .downcast_ref::<CatchEffector>()
            .unwrap()
            .catch_margin();
        assert_eq!(margin, 0.5);
    }
}
