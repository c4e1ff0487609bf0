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

//! Startup registration of the built-in agent classes.
//!
//! Registration is an explicit, ordered list of calls executed during the
//! load phase: parents first, each call independently failable. A failure
//! here means a misconfigured module and halts loading.

use crate::catch_effector::CatchEffector;
use crate::joint_effector::HingeJointEffector;
use crate::joint_perceptor::{HingeJointPerceptor, UniversalJointPerceptor};
use rondo_core::class::dispatch::ArgType;
use rondo_core::class::{ClassDescriptor, ClassRegistry, Leaf, RegistryError};

/// Registers the class tree for all built-in effectors and perceptors.
///
/// The resulting ancestry is:
///
/// ```text
/// Leaf
/// ├── Effector
/// │   ├── CatchEffector
/// │   └── HingeJointEffector
/// └── Perceptor
///     ├── HingeJointPerceptor
///     └── UniversalJointPerceptor
/// ```
pub fn register_builtin_classes(registry: &mut ClassRegistry) -> Result<(), RegistryError> {
    registry.register(ClassDescriptor::new(
        "Leaf",
        Box::new(|| Box::new(Leaf::new("Leaf"))),
    ))?;
    registry.register(
        ClassDescriptor::new("Effector", Box::new(|| Box::new(Leaf::new("Effector"))))
            .with_parent("Leaf"),
    )?;
    registry.register(
        ClassDescriptor::new("Perceptor", Box::new(|| Box::new(Leaf::new("Perceptor"))))
            .with_parent("Leaf"),
    )?;

    registry.register(
        ClassDescriptor::new("CatchEffector", Box::new(|| Box::new(CatchEffector::new())))
            .with_parent("Effector")
            .with_function(
                "setCatchMargin",
                vec![ArgType::Float],
                Box::new(|obj, args| {
                    let Some(effector) = obj.as_any_mut().downcast_mut::<CatchEffector>() else {
                        return false;
                    };
                    let Some(margin) = args[0].as_float() else {
                        return false;
                    };
                    effector.set_catch_margin(margin);
                    true
                }),
            ),
    )?;

    registry.register(
        ClassDescriptor::new(
            "HingeJointEffector",
            Box::new(|| Box::new(HingeJointEffector::new("hinge"))),
        )
        .with_parent("Effector"),
    )?;

    registry.register(
        ClassDescriptor::new(
            "HingeJointPerceptor",
            Box::new(|| Box::new(HingeJointPerceptor::new("hinge"))),
        )
        .with_parent("Perceptor"),
    )?;

    registry.register(
        ClassDescriptor::new(
            "UniversalJointPerceptor",
            Box::new(|| Box::new(UniversalJointPerceptor::new("universal"))),
        )
        .with_parent("Perceptor"),
    )?;

    log::info!("registered built-in agent classes");
    Ok(())
}
