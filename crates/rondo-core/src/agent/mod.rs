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

//! Traits for the agent-facing simulation boundary.
//!
//! Effectors translate inbound command predicates into simulation-state
//! mutations; perceptors translate simulation state into outbound
//! observation predicates. Both sit between untrusted network input and
//! the physics step, so every failure on these paths is a value, never a
//! panic.

use crate::class::dispatch::{arguments_match, ArgType};
use crate::class::SimObject;
use crate::physics::PhysicsProvider;
use crate::predicate::{Predicate, PredicateList, PredicateValue};

/// The validated, typed result of decoding a command predicate.
///
/// An action object is transient: it is consumed by exactly one simulation
/// step and never survives into the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionObject {
    name: String,
    values: Vec<PredicateValue>,
}

impl ActionObject {
    /// Decodes a predicate against an accepted command shape.
    ///
    /// Returns `None` unless the arity matches exactly and every argument
    /// converts to the type expected at its position (all-or-nothing).
    pub fn decode(predicate: &Predicate, expected: &[ArgType]) -> Option<Self> {
        if !arguments_match(expected, predicate.args()) {
            return None;
        }
        Some(Self {
            name: predicate.name().to_string(),
            values: predicate.args().to_vec(),
        })
    }

    /// The predicate name this action was decoded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The decoded argument values.
    pub fn values(&self) -> &[PredicateValue] {
        &self.values
    }

    /// The float at position `index`. Validation guarantees presence for
    /// positions declared `Float` in the decode rule.
    pub fn float_at(&self, index: usize) -> Option<f32> {
        self.values.get(index).and_then(PredicateValue::as_float)
    }

    /// The unsigned integer at position `index`.
    pub fn uint_at(&self, index: usize) -> Option<u32> {
        self.values.get(index).and_then(PredicateValue::as_uint)
    }

    /// The string at position `index`.
    pub fn str_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(PredicateValue::as_str)
    }
}

/// The lifecycle of an effector's pending action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectorState {
    /// No action pending.
    #[default]
    Idle,
    /// A decoded action awaits the next simulation step.
    ActionPending,
    /// The pending action was applied during the current step.
    Applied,
}

/// Holds at most one pending [`ActionObject`] and enforces its lifecycle.
///
/// A newly decoded action for a slot that already has one pending
/// overwrites it (last-write-wins; no queuing). Once taken for
/// application, the slot clears before the next step, so a stale action
/// can never be re-applied.
#[derive(Debug, Default)]
pub struct PendingSlot {
    state: EffectorState,
    action: Option<ActionObject>,
}

impl PendingSlot {
    /// Creates an idle slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> EffectorState {
        self.state
    }

    /// Stores a decoded action, replacing any action already pending.
    pub fn set(&mut self, action: ActionObject) {
        self.state = EffectorState::ActionPending;
        self.action = Some(action);
    }

    /// Takes the pending action for application, if any.
    ///
    /// The slot transitions through [`EffectorState::Applied`] back to
    /// [`EffectorState::Idle`]; a second call without an intervening
    /// [`set`](Self::set) returns `None`.
    pub fn take(&mut self) -> Option<ActionObject> {
        let action = self.action.take();
        if action.is_some() {
            // The applied phase only spans the step consuming the action;
            // the slot must read idle again before the next one so a stale
            // action can never re-apply.
            self.state = EffectorState::Idle;
        }
        action
    }
}

/// A component translating inbound predicates into simulation mutations.
///
/// Implementations follow a fixed per-step discipline: predicates routed to
/// the effector are decoded via [`realize`](Effector::realize) as they
/// arrive, and the single surviving pending action is applied exactly once
/// during the physics-update phase via
/// [`apply_pending`](Effector::apply_pending).
pub trait Effector: SimObject {
    /// The command name this effector answers to (e.g. `"catch-margin"`).
    fn predicate_name(&self) -> &str;

    /// Decodes an inbound predicate into the pending action.
    ///
    /// If the predicate's name does not match or decoding fails, the
    /// effector is left unchanged and `false` is returned. On success the
    /// decoded action becomes pending (replacing a previous pending action)
    /// and `true` is returned.
    fn realize(&mut self, predicate: &Predicate) -> bool;

    /// Applies the pending action, if any, to the simulated object.
    ///
    /// Invoked exactly once per simulation step during the physics-update
    /// phase. A no-op when idle; never re-applies a stale action.
    fn apply_pending(&mut self, world: &mut dyn PhysicsProvider, delta_time: f32);
}

/// A component translating simulation state into outbound predicates.
pub trait Perceptor: SimObject {
    /// Reads the associated simulated state and appends one or more
    /// predicates describing it, in a fixed canonical field order.
    ///
    /// Returns `true` on success. If the underlying sensor or state is
    /// unavailable (e.g. not yet linked), nothing is appended and `false`
    /// is returned. Safe to call every step regardless of link state.
    fn percept(&self, world: &dyn PhysicsProvider, output: &mut PredicateList) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;

    fn action(name: &str, value: f32) -> ActionObject {
        ActionObject::decode(
            &Predicate::new(name, vec![PredicateValue::Float(value)]),
            &[ArgType::Float],
        )
        .unwrap()
    }

    #[test]
    fn decode_rejects_shape_mismatch() {
        let p = Predicate::new(
            "catch-margin",
            vec![PredicateValue::Float(0.5), PredicateValue::Float(1.0)],
        );
        assert!(ActionObject::decode(&p, &[ArgType::Float]).is_none());

        let p = Predicate::new("catch-margin", vec![PredicateValue::Str("x".into())]);
        assert!(ActionObject::decode(&p, &[ArgType::Float]).is_none());
    }

    #[test]
    fn decode_accepts_integer_for_float_position() {
        let p = Predicate::new("catch-margin", vec![PredicateValue::Int(1)]);
        let action = ActionObject::decode(&p, &[ArgType::Float]).unwrap();
        assert_eq!(action.float_at(0), Some(1.0));
    }

    #[test]
    fn pending_slot_applies_at_most_once() {
        let mut slot = PendingSlot::new();
        assert_eq!(slot.state(), EffectorState::Idle);
        assert!(slot.take().is_none());

        slot.set(action("a", 1.0));
        assert_eq!(slot.state(), EffectorState::ActionPending);
        assert!(slot.take().is_some());
        // Second take without a new set is a no-op.
        assert!(slot.take().is_none());
        assert_eq!(slot.state(), EffectorState::Idle);
    }

    #[test]
    fn pending_slot_last_write_wins() {
        let mut slot = PendingSlot::new();
        slot.set(action("a", 1.0));
        slot.set(action("a", 2.0));
        let taken = slot.take().unwrap();
        assert_eq!(taken.float_at(0), Some(2.0));
        assert!(slot.take().is_none());
    }
}
