/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Addon settings for the Marvelous Designer integration.
//!
//! Only publish plugin toggles are configurable. Plugins without an entry run
//! with their built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Enabled/optional/active switches for one publish plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginToggle {
    /// Disabled plugins never run
    pub enabled: bool,
    /// Optional plugins can be switched off per instance by the artist
    pub optional: bool,
    /// Default state of an optional plugin
    pub active: bool,
}

impl Default for PluginToggle {
    fn default() -> Self {
        Self {
            enabled: true,
            optional: true,
            active: true,
        }
    }
}

/// Settings root, keyed like the addon settings on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdSettings {
    /// Publish plugin toggles keyed by plugin name
    pub publish: BTreeMap<String, PluginToggle>,
}

impl Default for MdSettings {
    fn default() -> Self {
        let publish = ["ExtractPointCache", "ExtractObj", "ExtractFbx"]
            .into_iter()
            .map(|name| (name.to_string(), PluginToggle::default()))
            .collect();
        Self { publish }
    }
}

impl MdSettings {
    pub fn plugin(&self, name: &str) -> Option<&PluginToggle> {
        self.publish.get(name)
    }

    /// Whether the plugin runs at all. Unknown plugins are enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.plugin(name).map_or(true, |toggle| toggle.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_cover_pointcache_extractors() {
        let settings = MdSettings::default();

        for name in ["ExtractPointCache", "ExtractObj", "ExtractFbx"] {
            assert_eq!(settings.plugin(name), Some(&PluginToggle::default()));
        }
        assert!(settings.plugin("ExtractZfab").is_none());
        assert!(settings.is_enabled("ExtractZfab"));
    }

    #[test]
    fn test_partial_toggle_deserializes_with_defaults() {
        let settings: MdSettings = serde_json::from_value(json!({
            "publish": {"ExtractObj": {"enabled": false}}
        }))
        .unwrap();

        assert!(!settings.is_enabled("ExtractObj"));
        let toggle = settings.plugin("ExtractObj").unwrap();
        assert!(toggle.optional);
        assert!(toggle.active);
        // an explicit table replaces the default table
        assert!(settings.plugin("ExtractFbx").is_none());
    }
}
