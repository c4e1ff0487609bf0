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

//! Concrete effectors and perceptors.
//!
//! Each type here implements the `rondo-core` agent contracts and is
//! declared to the class registry during the startup load phase via
//! [`register_builtin_classes`].

pub mod catch_effector;
pub mod joint_effector;
pub mod joint_perceptor;
pub mod registration;

pub use catch_effector::CatchEffector;
pub use joint_effector::HingeJointEffector;
pub use joint_perceptor::{HingeJointPerceptor, UniversalJointPerceptor};
pub use registration::register_builtin_classes;
