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

//! Headless simulation server.
//!
//! Boots the class registry (load phase), builds a small demo scene,
//! starts the render consumer at the configured cadence, and runs the
//! step loop while a demo agent thread issues joint commands.

mod config;
mod server;

use anyhow::Context;
use config::RuntimeConfig;
use rondo_agents::{
    register_builtin_classes, CatchEffector, HingeJointEffector, HingeJointPerceptor,
    UniversalJointPerceptor,
};
use rondo_core::class::ClassRegistry;
use rondo_core::predicate::{Predicate, PredicateValue};
use rondo_core::telemetry::MetricsRegistry;
use rondo_infra::KinematicWorld;
use rondo_render::ProxyServer;
use server::SimulationServer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = RuntimeConfig::load_or_default(std::env::args().nth(1))?;
    log::info!("starting with {config:?}");

    // Load phase: every class is declared before the first step runs.
    // A failure here is a misconfigured module and aborts startup.
    let mut registry = ClassRegistry::new();
    register_builtin_classes(&mut registry).context("loading built-in agent classes")?;
    registry
        .register(ProxyServer::class_descriptor())
        .context("loading render classes")?;

    // Demo scene: a rolling ball, one hinge joint, one universal joint.
    let mut world = KinematicWorld::new();
    let _ball = world.add_body(
        rondo_core::math::Vec3::ZERO,
        rondo_core::math::Vec3::new(0.5, 0.0, 0.3),
    );
    let hinge = world.add_hinge_joint();
    let universal = world.add_universal_joint();

    // Instantiate the agent boundary through the registry, the same path
    // plugin-provided classes take.
    let catch = registry
        .create_instance("CatchEffector")?
        .into_any()
        .downcast::<CatchEffector>()
        .expect("CatchEffector factory");
    let mut arm = registry
        .create_instance("HingeJointEffector")?
        .into_any()
        .downcast::<HingeJointEffector>()
        .expect("HingeJointEffector factory");
    arm.link(hinge);
    let mut arm_sense = registry
        .create_instance("HingeJointPerceptor")?
        .into_any()
        .downcast::<HingeJointPerceptor>()
        .expect("HingeJointPerceptor factory");
    arm_sense.link(hinge);
    let mut neck_sense = registry
        .create_instance("UniversalJointPerceptor")?
        .into_any()
        .downcast::<UniversalJointPerceptor>()
        .expect("UniversalJointPerceptor factory");
    neck_sense.link(universal);

    // Configure the render cadence through the command path.
    let mut proxy = ProxyServer::new();
    if !registry.dispatch(
        &mut proxy,
        "setCycleLength",
        &[PredicateValue::Int(config.cycle_length_ms as i32)],
    ) {
        log::warn!(
            "setCycleLength({}) rejected, keeping {:?}",
            config.cycle_length_ms,
            proxy.cycle_length()
        );
    }

    let frames = Arc::new(AtomicU64::new(0));
    let frame_count = frames.clone();
    let consumer = proxy.start_consumer(move |frame| {
        frame_count.fetch_add(1, Ordering::Relaxed);
        log::trace!("presenting step {} (t={:.2}s)", frame.step, frame.sim_time);
    });

    let metrics = MetricsRegistry::new();
    let mut server = SimulationServer::new(
        Box::new(world),
        proxy,
        Duration::from_millis(config.step_ms),
    )
    .with_telemetry(&metrics);
    server.add_effector(catch);
    server.add_effector(arm);
    server.add_perceptor(arm_sense);
    server.add_perceptor(neck_sense);

    // Demo agent: tunes its catch margin, then works the hinge motor.
    let commands = server.command_sender();
    let percepts = server.percept_receiver();
    let agent = std::thread::spawn(move || {
        commands
            .send(Predicate::new(
                "catch-margin",
                vec![PredicateValue::Float(0.5)],
            ))
            .ok();
        for i in 0..10 {
            let target = if i % 2 == 0 { 30.0 } else { -30.0 };
            commands
                .send(Predicate::new("hinge", vec![PredicateValue::Float(target)]))
                .ok();
            std::thread::sleep(Duration::from_millis(50));
        }
    });

    server.run(config.run_steps);
    agent.join().ok();
    consumer.stop();

    let observed: usize = percepts.drain().map(|list| list.len()).sum();
    log::info!(
        "finished after {} steps, {} frames presented, {} percepts emitted",
        server.step_index(),
        frames.load(Ordering::Relaxed),
        observed
    );
    for (id, value) in metrics.snapshot() {
        log::info!("metric {id} = {value:.3}");
    }

    Ok(())
}
