// Copyright 2024 OctoFHIR Team
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

//! Engine configuration options

use crate::model::Culture;

/// Configuration shared by the proxies and validators an engine builds
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Upper bound on follow-up recomputes coalesced into one notification
    pub max_coalesced_passes: usize,

    /// Culture used when values are stringified
    pub culture: Culture,

    /// Number of parsed templates kept in the cache; 0 disables caching
    pub template_cache_size: usize,

    /// Default `strict` flag for rules compiled from definitions
    pub strict_validation: bool,

    /// Whether view-side "target updated" events re-run validation
    pub validates_on_target_updated: bool,
}

impl EngineConfig {
    /// Create a configuration with custom limits and the invariant culture
    pub fn new(max_coalesced_passes: usize, template_cache_size: usize) -> Self {
        Self {
            max_coalesced_passes,
            template_cache_size,
            ..Self::default()
        }
    }

    /// Every enforced rule runs and every failure message is collected
    pub fn strict_validation() -> Self {
        Self {
            strict_validation: true,
            ..Self::default()
        }
    }

    /// Create a configuration for testing
    pub fn testing() -> Self {
        Self {
            max_coalesced_passes: 4,
            culture: Culture::invariant(),
            template_cache_size: 8,
            strict_validation: false,
            validates_on_target_updated: true,
        }
    }

    /// Use `culture` for stringification
    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_coalesced_passes: 16,
            culture: Culture::invariant(),
            template_cache_size: 256,
            strict_validation: false,
            validates_on_target_updated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = EngineConfig::default();
        assert_eq!(default.max_coalesced_passes, 16);
        assert!(!default.strict_validation);

        assert!(EngineConfig::strict_validation().strict_validation);

        let testing = EngineConfig::testing();
        assert_eq!(testing.max_coalesced_passes, 4);
        assert!(testing.validates_on_target_updated);

        let custom = EngineConfig::new(2, 0);
        assert_eq!(custom.max_coalesced_passes, 2);
        assert_eq!(custom.template_cache_size, 0);
    }
}
