// Copyright 2025 Sushanth (https://github.com/sushanthpy)
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

//! Scheduler configuration

use serde::{Deserialize, Serialize};

/// Construction-time limits for a [`crate::FrameScheduler`].
///
/// The scheduler sizes all of its scratch buffers from these values; calls
/// whose inputs exceed them fail with `CapacityExceeded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum candidate count per call.
    pub max_entities: usize,
    /// Maximum quota group count per call. Zero disables the quota path.
    pub max_groups: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_entities: 10_000,
            max_groups: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_entities, 10_000);
        assert_eq!(config.max_groups, 0);
    }

    #[test]
    fn test_partial_deserialization() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{"max_entities": 50000}"#).unwrap();
        assert_eq!(config.max_entities, 50_000);
        assert_eq!(config.max_groups, 0);
    }

    #[test]
    fn test_round_trip() {
        let config = SchedulerConfig {
            max_entities: 200_000,
            max_groups: 32,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<SchedulerConfig>(&json).unwrap(), config);
    }
}
