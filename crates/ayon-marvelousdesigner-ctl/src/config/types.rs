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

use ayon_marvelousdesigner::settings::PluginToggle;
use ayon_marvelousdesigner::MdSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdConfig {
    pub metadata: MetadataConfig,
    pub logging: LoggingConfig,
    pub workfile: WorkfileConfig,
    /// Publish plugin toggles keyed by plugin name
    pub publish: BTreeMap<String, PluginToggle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Sidecar file used when `--metadata` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkfileConfig {
    /// Default `.zprj` copied when no last workfile is reopened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    pub temp_dir: PathBuf,
}

impl MdConfig {
    /// Create a new configuration with defaults
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Addon settings built from the `[publish]` tables.
    pub fn settings(&self) -> MdSettings {
        MdSettings {
            publish: self.publish.clone(),
        }
    }
}
