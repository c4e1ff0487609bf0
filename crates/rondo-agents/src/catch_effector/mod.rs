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

//! Effector tuning the goalkeeper's catch reach.

use rondo_core::agent::{ActionObject, Effector, PendingSlot};
use rondo_core::class::dispatch::ArgType;
use rondo_core::class::SimObject;
use rondo_core::math::Vec3;
use rondo_core::physics::PhysicsProvider;
use rondo_core::predicate::Predicate;
use std::any::Any;

/// Catch reach used until an agent tunes it, in meters.
pub const DEFAULT_CATCH_MARGIN: f32 = 1.0;

/// The command name this effector answers to.
pub const CATCH_MARGIN_PREDICATE: &str = "catch-margin";

/// Adjusts the scalar distance threshold deciding ball-catch eligibility.
///
/// The threshold is consulted by the catch rules each step; a malformed
/// command leaves the previous threshold in place.
pub struct CatchEffector {
    margin: f32,
    pending: PendingSlot,
}

impl CatchEffector {
    /// Creates an effector with the default catch margin.
    pub fn new() -> Self {
        Self {
            margin: DEFAULT_CATCH_MARGIN,
            pending: PendingSlot::new(),
        }
    }

    /// The current catch-distance threshold in meters.
    pub fn catch_margin(&self) -> f32 {
        self.margin
    }

    /// Sets the catch-distance threshold directly (configuration path).
    pub fn set_catch_margin(&mut self, margin: f32) {
        self.margin = margin;
    }

    /// Whether a ball at `ball` is within catch reach of a keeper at
    /// `keeper`.
    pub fn can_catch(&self, keeper: Vec3, ball: Vec3) -> bool {
        keeper.distance_squared(ball) <= self.margin * self.margin
    }
}

impl Default for CatchEffector {
    fn default() -> Self {
        Self::new()
    }
}

impl SimObject for CatchEffector {
    fn class_name(&self) -> &str {
        "CatchEffector"
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

impl Effector for CatchEffector {
    fn predicate_name(&self) -> &str {
        CATCH_MARGIN_PREDICATE
    }

    fn realize(&mut self, predicate: &Predicate) -> bool {
        if predicate.name() != self.predicate_name() {
            return false;
        }
        match ActionObject::decode(predicate, &[ArgType::Float]) {
            Some(action) => {
                self.pending.set(action);
                true
            }
            None => {
                log::debug!("catch-margin: rejected malformed command {predicate}");
                false
            }
        }
    }

    fn apply_pending(&mut self, _world: &mut dyn PhysicsProvider, _delta_time: f32) {
        let Some(action) = self.pending.take() else {
            return;
        };
        let Some(margin) = action.float_at(0) else {
            return;
        };
        log::trace!("catch-margin: {} -> {}", self.margin, margin);
        self.margin = margin;
    }
}
