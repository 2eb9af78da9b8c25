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

use crate::config::types::*;
use ayon_marvelousdesigner::MdSettings;
use std::path::PathBuf;

impl Default for MdConfig {
    fn default() -> Self {
        Self {
            metadata: MetadataConfig::default(),
            logging: LoggingConfig::default(),
            workfile: WorkfileConfig::default(),
            publish: MdSettings::default().publish,
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self { sidecar: None }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for WorkfileConfig {
    fn default() -> Self {
        Self {
            template: None,
            temp_dir: std::env::temp_dir().join("ayon"),
        }
    }
}

/// Generate a complete default configuration as TOML string
pub fn generate_default_config_toml() -> Result<String, toml::ser::Error> {
    let config = MdConfig::default();
    toml::to_string_pretty(&config)
}

/// Path used by `config init` when no output is given.
pub fn default_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("md-ctl").join("config.toml"))
}
