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

//! Perceptors reporting joint state back to agents.
//!
//! Each percept is one predicate with a fixed field order: the joint's
//! wire name first, then axis angles in degrees, then (when enabled) axis
//! rates in degrees per second.

mod hinge;
mod universal;

pub use hinge::HingeJointPerceptor;
pub use universal::UniversalJointPerceptor;
