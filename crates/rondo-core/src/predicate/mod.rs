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

//! The predicate data model: the in-memory form of commands received from
//! agents and of observations sent back to them.
//!
//! A [`Predicate`] is a name plus an ordered sequence of typed arguments.
//! Predicates arriving from the network are untrusted; every consumer
//! validates shape and types before acting, and reports mismatches as
//! values rather than panicking.

use crate::math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed argument of a [`Predicate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredicateValue {
    /// A signed integer token.
    Int(i32),
    /// A floating-point token.
    Float(f32),
    /// A string token.
    Str(String),
    /// A nested 3-vector `(x y z)`.
    Vector(Vec3),
}

impl PredicateValue {
    /// Returns the value as a signed integer, if it is one.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            PredicateValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an unsigned integer.
    ///
    /// Only a non-negative [`Int`](PredicateValue::Int) converts; everything
    /// else is rejected.
    pub fn as_uint(&self) -> Option<u32> {
        match self {
            PredicateValue::Int(v) if *v >= 0 => Some(*v as u32),
            _ => None,
        }
    }

    /// Returns the value as a float.
    ///
    /// An [`Int`](PredicateValue::Int) widens to `f32`; the reverse
    /// conversion is rejected.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            PredicateValue::Float(v) => Some(*v),
            PredicateValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Returns the value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PredicateValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a 3-vector, if it is one.
    pub fn as_vector(&self) -> Option<Vec3> {
        match self {
            PredicateValue::Vector(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PredicateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateValue::Int(v) => write!(f, "{v}"),
            PredicateValue::Float(v) => write!(f, "{v}"),
            PredicateValue::Str(s) => write!(f, "{s}"),
            PredicateValue::Vector(v) => write!(f, "({} {} {})", v.x, v.y, v.z),
        }
    }
}

impl From<i32> for PredicateValue {
    fn from(v: i32) -> Self {
        PredicateValue::Int(v)
    }
}

impl From<f32> for PredicateValue {
    fn from(v: f32) -> Self {
        PredicateValue::Float(v)
    }
}

impl From<&str> for PredicateValue {
    fn from(v: &str) -> Self {
        PredicateValue::Str(v.to_string())
    }
}

impl From<Vec3> for PredicateValue {
    fn from(v: Vec3) -> Self {
        PredicateValue::Vector(v)
    }
}

/// A parsed command or observation unit: a name plus ordered typed arguments.
///
/// Immutable once built. The textual wire form `(name arg1 arg2 ...)` is
/// produced and consumed by the network collaborator; this type only deals
/// with the parsed representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    name: String,
    args: Vec<PredicateValue>,
}

impl Predicate {
    /// Creates a new predicate from a name and its argument list.
    pub fn new(name: impl Into<String>, args: Vec<PredicateValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// The command/observation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered argument list.
    pub fn args(&self) -> &[PredicateValue] {
        &self.args
    }

    /// The number of arguments.
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        write!(f, ")")
    }
}

/// An ordered list of outbound predicates produced by perceptors each step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredicateList {
    predicates: Vec<Predicate>,
}

impl PredicateList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a predicate to the list.
    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Returns the predicates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter()
    }

    /// Returns the number of predicates in the list.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns `true` if the list holds no predicates.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Removes all predicates, keeping the allocation.
    pub fn clear(&mut self) {
        self.predicates.clear();
    }
}
