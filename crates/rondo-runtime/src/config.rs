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

//! Runtime configuration, loaded from a JSON file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of the simulation server process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Physics step length in milliseconds.
    pub step_ms: u64,
    /// Render hand-off cadence in milliseconds.
    pub cycle_length_ms: u64,
    /// Number of steps the demo run executes before shutting down.
    pub run_steps: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            step_ms: 20,
            cycle_length_ms: 40,
            run_steps: 250,
        }
    }
}

impl RuntimeConfig {
    /// Loads the configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Loads from `path` when given, otherwise falls back to defaults.
    pub fn load_or_default(path: Option<String>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }
}
