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

//! A compact, lock-free metrics registry.
//!
//! Counters and gauges hand out cheap atomic handles that subsystems keep
//! and update every step without touching the registry again. Values are
//! stored as `f64` bits in an `AtomicU64`, so updates from the simulation
//! thread never contend with readers.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A unique, structured identifier for a metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// The broad category of the metric (e.g., "sim", "render").
    pub namespace: String,
    /// The specific name of the metric (e.g., "step_time_ms").
    pub name: String,
}

impl MetricId {
    /// Creates a new `MetricId` from a namespace and a name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Errors surfaced by the metrics registry.
#[derive(Debug)]
pub enum MetricsError {
    /// A metric with the same ID was already registered.
    DuplicateMetric(MetricId),
}

impl Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::DuplicateMetric(id) => {
                write!(f, "metric '{id}' is already registered")
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Shared atomic storage for one metric value, kept as `f64` bits.
#[derive(Debug)]
struct MetricCell {
    bits: AtomicU64,
}

impl MetricCell {
    fn new(initial: f64) -> Self {
        Self {
            bits: AtomicU64::new(initial.to_bits()),
        }
    }

    fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Handle to a gauge: a value that can go up or down.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    cell: Arc<MetricCell>,
}

impl GaugeHandle {
    /// Sets the gauge to `value`.
    pub fn set(&self, value: f64) {
        self.cell.set(value);
    }

    /// The current gauge value.
    pub fn get(&self) -> f64 {
        self.cell.get()
    }
}

/// Handle to a counter: a value that only ever increases.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    cell: Arc<MetricCell>,
}

impl CounterHandle {
    /// Increments the counter by one.
    pub fn increment(&self) {
        self.add(1);
    }

    /// Increments the counter by `amount`.
    pub fn add(&self, amount: u64) {
        // Single-writer discipline: each counter is updated from one thread,
        // so a read-modify-write pair is sufficient here.
        self.cell.set(self.cell.get() + amount as f64);
    }

    /// The current counter value.
    pub fn get(&self) -> u64 {
        self.cell.get() as u64
    }
}

/// Central registry for metrics.
///
/// Registration takes the only lock; handle updates are lock-free.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    cells: Mutex<HashMap<MetricId, Arc<MetricCell>>>,
}

impl MetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new gauge metric.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<GaugeHandle, MetricsError> {
        let cell = self.insert(MetricId::new(namespace, name), 0.0)?;
        Ok(GaugeHandle { cell })
    }

    /// Registers a new counter metric.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<CounterHandle, MetricsError> {
        let cell = self.insert(MetricId::new(namespace, name), 0.0)?;
        Ok(CounterHandle { cell })
    }

    /// The current value of a metric, if registered.
    pub fn get(&self, id: &MetricId) -> Option<f64> {
        self.cells
            .lock()
            .expect("metrics registry poisoned")
            .get(id)
            .map(|cell| cell.get())
    }

    /// A point-in-time snapshot of every metric, sorted by ID for stable
    /// logging output.
    pub fn snapshot(&self) -> Vec<(MetricId, f64)> {
        let mut entries: Vec<_> = self
            .cells
            .lock()
            .expect("metrics registry poisoned")
            .iter()
            .map(|(id, cell)| (id.clone(), cell.get()))
            .collect();
        entries.sort_by(|a, b| (a.0.to_string()).cmp(&b.0.to_string()));
        entries
    }

    fn insert(&self, id: MetricId, initial: f64) -> Result<Arc<MetricCell>, MetricsError> {
        let mut cells = self.cells.lock().expect("metrics registry poisoned");
        if cells.contains_key(&id) {
            return Err(MetricsError::DuplicateMetric(id));
        }
        let cell = Arc::new(MetricCell::new(initial));
        cells.insert(id, cell.clone());
        Ok(cell)
    }
}
