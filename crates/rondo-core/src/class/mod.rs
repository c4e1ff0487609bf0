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

//! The runtime class registry.
//!
//! Simulation object classes are declared, instantiated, and related by
//! *name* at runtime, because plugins unknown at build time contribute
//! classes of their own. Each class records exactly one parent, forming an
//! acyclic single-inheritance chain that terminates at a parentless root;
//! capability queries walk that chain instead of relying on static types.
//!
//! Registration is a one-time, startup-only mutation. Once the simulation
//! loop starts, the registry is shared read-only (typically behind an
//! `Arc`) and lookups need no locking.

pub mod dispatch;

use crate::predicate::PredicateValue;
use dispatch::FunctionTable;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// The base interface every registry-managed simulation object implements.
///
/// The registry identifies objects by class name rather than by static
/// type, so the only hard requirements are a class name for ancestry walks
/// and `Any` access for recovering the concrete type after instantiation.
pub trait SimObject: Send {
    /// The registered class name of this object.
    fn class_name(&self) -> &str;

    /// Allows downcasting to concrete object types.
    fn as_any(&self) -> &dyn Any;

    /// Allows mutable downcasting to concrete object types.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Consumes the box, allowing owned downcasting after `create_instance`.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// A generic, featureless node used to instantiate base classes that exist
/// only as ancestors (e.g. the root of the class tree).
pub struct Leaf {
    class: String,
}

impl Leaf {
    /// Creates a leaf claiming membership of the given class.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }
}

impl SimObject for Leaf {
    fn class_name(&self) -> &str {
        &self.class
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

/// Factory closure producing a fresh instance of a registered class.
pub type Factory = Box<dyn Fn() -> Box<dyn SimObject> + Send + Sync>;

/// Errors surfaced while mutating or querying the class registry.
///
/// These are load-time errors: a failed registration means a misconfigured
/// plugin, and loading of that module should halt.
#[derive(Debug)]
pub enum RegistryError {
    /// A class with the same name was already registered.
    DuplicateName(String),
    /// The named parent class has not been registered yet.
    UnknownParent {
        /// The class being registered.
        class: String,
        /// The parent name that could not be resolved.
        parent: String,
    },
    /// The named class was never registered.
    UnknownClass(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateName(name) => {
                write!(f, "class '{name}' is already registered")
            }
            RegistryError::UnknownParent { class, parent } => {
                write!(f, "class '{class}' names unknown parent '{parent}'")
            }
            RegistryError::UnknownClass(name) => {
                write!(f, "class '{name}' is not registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// A registered class: its name, its single parent, a factory, and the
/// table of named commands the class answers to.
pub struct ClassDescriptor {
    name: String,
    parent: Option<String>,
    factory: Factory,
    functions: FunctionTable,
}

impl ClassDescriptor {
    /// Creates a descriptor for a root class (no parent, no commands).
    pub fn new(name: impl Into<String>, factory: Factory) -> Self {
        Self {
            name: name.into(),
            parent: None,
            factory,
            functions: FunctionTable::new(),
        }
    }

    /// Declares the single parent class.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Registers a named, type-checked command handler on this class.
    pub fn with_function(
        mut self,
        name: impl Into<String>,
        expected: Vec<dispatch::ArgType>,
        handler: dispatch::FunctionHandler,
    ) -> Self {
        self.functions.register(name, expected, handler);
        self
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent class name, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

/// The runtime class registry: name-keyed descriptors with single-parent
/// ancestry, instantiation, and command dispatch.
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassDescriptor>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    /// Records a class descriptor.
    ///
    /// Fails with [`RegistryError::DuplicateName`] if the name is taken and
    /// with [`RegistryError::UnknownParent`] if the declared parent has not
    /// been registered first. Parents must therefore be registered before
    /// their children, which keeps every ancestry chain acyclic by
    /// construction.
    pub fn register(&mut self, descriptor: ClassDescriptor) -> Result<(), RegistryError> {
        if self.classes.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateName(descriptor.name.clone()));
        }
        if let Some(parent) = &descriptor.parent {
            if !self.classes.contains_key(parent) {
                return Err(RegistryError::UnknownParent {
                    class: descriptor.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
        log::debug!(
            "ClassRegistry: registered '{}' (parent: {})",
            descriptor.name,
            descriptor.parent.as_deref().unwrap_or("<root>")
        );
        self.classes.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Returns `true` if a class of the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Invokes the factory of the named class.
    pub fn create_instance(&self, name: &str) -> Result<Box<dyn SimObject>, RegistryError> {
        match self.classes.get(name) {
            Some(descriptor) => Ok((descriptor.factory)()),
            None => Err(RegistryError::UnknownClass(name.to_string())),
        }
    }

    /// Walks the instance's ancestry chain comparing names.
    ///
    /// Returns `true` on an exact match at any depth, `false` once the
    /// chain is exhausted or the instance's class is unknown. This replaces
    /// static type checks with a name-based capability query.
    pub fn is_kind_of(&self, instance: &dyn SimObject, ancestor: &str) -> bool {
        let mut current = Some(instance.class_name());
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self.classes.get(name).and_then(|d| d.parent());
        }
        false
    }

    /// Dispatches a named command against an instance.
    ///
    /// The handler is resolved on the instance's class or, if absent there,
    /// on the nearest registered ancestor (inherited commands). Arity and
    /// per-position argument types are validated before the handler runs;
    /// on any mismatch this returns `false` without invoking the handler
    /// and without mutating any state. Commands originate from untrusted
    /// external input, so failure is always a value, never a panic.
    pub fn dispatch(
        &self,
        instance: &mut dyn SimObject,
        function: &str,
        args: &[PredicateValue],
    ) -> bool {
        let mut current = Some(instance.class_name().to_string());
        while let Some(name) = current {
            let Some(descriptor) = self.classes.get(&name) else {
                return false;
            };
            if let Some(entry) = descriptor.functions.get(function) {
                if !dispatch::arguments_match(entry.expected(), args) {
                    log::trace!(
                        "dispatch: '{function}' on '{}' rejected malformed arguments",
                        instance.class_name()
                    );
                    return false;
                }
                return (entry.handler())(instance, args);
            }
            current = descriptor.parent().map(str::to_string);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::dispatch::ArgType;
    use super::*;
    use crate::predicate::PredicateValue;

    struct Counter {
        class: String,
        value: i32,
    }

    impl Counter {
        fn new(class: &str) -> Self {
            Self {
                class: class.to_string(),
                value: 0,
            }
        }
    }

    impl SimObject for Counter {
        fn class_name(&self) -> &str {
            &self.class
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

    fn registry_with_chain() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry
            .register(ClassDescriptor::new("A", Box::new(|| Box::new(Leaf::new("A")))))
            .unwrap();
        registry
            .register(
                ClassDescriptor::new("B", Box::new(|| Box::new(Counter::new("B"))))
                    .with_parent("A"),
            )
            .unwrap();
        registry
    }

    #[test]
    fn parent_must_exist_before_child() {
        let mut registry = ClassRegistry::new();
        let result = registry.register(
            ClassDescriptor::new("B", Box::new(|| Box::new(Leaf::new("B")))).with_parent("A"),
        );
        assert!(matches!(
            result,
            Err(RegistryError::UnknownParent { .. })
        ));

        // Correct order succeeds and establishes the ancestry.
        let registry = registry_with_chain();
        let b = registry.create_instance("B").unwrap();
        assert!(registry.is_kind_of(b.as_ref(), "A"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = registry_with_chain();
        let result =
            registry.register(ClassDescriptor::new("A", Box::new(|| Box::new(Leaf::new("A")))));
        assert!(matches!(result, Err(RegistryError::DuplicateName(_))));
    }

    #[test]
    fn create_instance_unknown_class() {
        let registry = ClassRegistry::new();
        assert!(matches!(
            registry.create_instance("Ghost"),
            Err(RegistryError::UnknownClass(_))
        ));
    }

    #[test]
    fn is_kind_of_walks_full_chain() {
        let registry = registry_with_chain();
        let b = registry.create_instance("B").unwrap();
        assert!(registry.is_kind_of(b.as_ref(), "B"));
        assert!(registry.is_kind_of(b.as_ref(), "A"));
        assert!(!registry.is_kind_of(b.as_ref(), "C"));
    }

    #[test]
    fn dispatch_validates_before_invoking() {
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDescriptor::new("Counter", Box::new(|| Box::new(Counter::new("Counter"))))
                    .with_function(
                        "add",
                        vec![ArgType::Int],
                        Box::new(|obj, args| {
                            let counter = obj.as_any_mut().downcast_mut::<Counter>().unwrap();
                            counter.value += args[0].as_int().unwrap();
                            true
                        }),
                    ),
            )
            .unwrap();

        let mut instance = registry.create_instance("Counter").unwrap();

        assert!(registry.dispatch(instance.as_mut(), "add", &[PredicateValue::Int(5)]));

        // Wrong arity: rejected, state untouched.
        assert!(!registry.dispatch(
            instance.as_mut(),
            "add",
            &[PredicateValue::Int(1), PredicateValue::Int(2)]
        ));
        // Wrong type: rejected, state untouched.
        assert!(!registry.dispatch(
            instance.as_mut(),
            "add",
            &[PredicateValue::Str("nope".into())]
        ));
        // Unknown function: rejected.
        assert!(!registry.dispatch(instance.as_mut(), "sub", &[PredicateValue::Int(1)]));

        let counter = instance.as_any().downcast_ref::<Counter>().unwrap();
        assert_eq!(counter.value, 5);
    }

    #[test]
    fn dispatch_resolves_inherited_commands() {
        let mut registry = ClassRegistry::new();
        registry
            .register(
                ClassDescriptor::new("Base", Box::new(|| Box::new(Leaf::new("Base"))))
                    .with_function(
                        "ping",
                        vec![],
                        Box::new(|_, _| true),
                    ),
            )
            .unwrap();
        registry
            .register(
                ClassDescriptor::new("Derived", Box::new(|| Box::new(Leaf::new("Derived"))))
                    .with_parent("Base"),
            )
            .unwrap();

        let mut derived = registry.create_instance("Derived").unwrap();
        assert!(registry.dispatch(derived.as_mut(), "ping", &[]));
    }
}
