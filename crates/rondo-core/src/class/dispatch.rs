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

//! Per-class function dispatch tables.
//!
//! A [`FunctionTable`] maps command names to an argument-decoding rule
//! (expected arity and per-position type) plus a native handler. Decoding
//! is all-or-nothing: either every argument converts to its expected type
//! and the handler runs, or nothing is invoked at all.

use crate::class::SimObject;
use crate::predicate::PredicateValue;
use std::collections::HashMap;

/// The expected type of one argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// A signed integer.
    Int,
    /// A non-negative integer.
    Uint,
    /// A float; an integer argument widens to float.
    Float,
    /// A string token.
    Str,
    /// A 3-vector.
    Vector,
}

impl ArgType {
    /// Returns `true` if `value` converts to this expected type.
    pub fn accepts(&self, value: &PredicateValue) -> bool {
        match self {
            ArgType::Int => value.as_int().is_some(),
            ArgType::Uint => value.as_uint().is_some(),
            ArgType::Float => value.as_float().is_some(),
            ArgType::Str => value.as_str().is_some(),
            ArgType::Vector => value.as_vector().is_some(),
        }
    }
}

/// Validates an argument list against a decode rule.
///
/// Returns `true` only when the arity matches exactly and every argument
/// converts to the type expected at its position.
pub fn arguments_match(expected: &[ArgType], args: &[PredicateValue]) -> bool {
    expected.len() == args.len()
        && expected
            .iter()
            .zip(args.iter())
            .all(|(ty, value)| ty.accepts(value))
}

/// A native invocation target bound to a class function.
///
/// The handler receives arguments that already passed validation against
/// the entry's decode rule, so its own typed extraction cannot fail. It
/// still reports success as a value so callers can log and continue.
pub type FunctionHandler =
    Box<dyn Fn(&mut dyn SimObject, &[PredicateValue]) -> bool + Send + Sync>;

/// One registered function: decode rule plus handler.
pub struct FunctionEntry {
    expected: Vec<ArgType>,
    handler: FunctionHandler,
}

impl FunctionEntry {
    /// The expected argument types, in position order.
    pub fn expected(&self) -> &[ArgType] {
        &self.expected
    }

    /// The native handler.
    pub fn handler(&self) -> &FunctionHandler {
        &self.handler
    }
}

/// Named, type-checked command handlers owned by one class.
#[derive(Default)]
pub struct FunctionTable {
    entries: HashMap<String, FunctionEntry>,
}

impl FunctionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a handler under a function name.
    ///
    /// A second registration under the same name replaces the first; like
    /// class registration this happens only during the load phase.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        expected: Vec<ArgType>,
        handler: FunctionHandler,
    ) {
        self.entries
            .insert(name.into(), FunctionEntry { expected, handler });
    }

    /// Looks up the entry for a function name.
    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.entries.get(name)
    }

    /// Returns `true` if no functions are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
