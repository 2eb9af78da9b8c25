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

use crate::config::{ConfigError, MdConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "MD_CTL_CONFIG";

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Failed to compile regex"));

pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths
    pub fn new() -> Self {
        let mut search_paths = vec![PathBuf::from("./md-ctl.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("md-ctl").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with custom search paths
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Load configuration from the specified file or auto-discover.
    ///
    /// An explicit file or `MD_CTL_CONFIG` must exist; discovery falls back
    /// to defaults when no search path has a file.
    pub fn load_config(&self, config_file: Option<&Path>) -> Result<MdConfig, ConfigError> {
        let config_path = if let Some(path) = config_file {
            path.to_path_buf()
        } else if let Some(env_config) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            PathBuf::from(env_config)
        } else if let Some(found) = self.find_config_file() {
            found
        } else {
            tracing::debug!("No configuration file found, using defaults");
            return Ok(MdConfig::default());
        };

        tracing::debug!(path = %config_path.display(), "Loading configuration");
        self.load_config_from_file(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_config_from_file(&self, path: &Path) -> Result<MdConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let substituted_content = self.substitute_env_vars(&content)?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") | None => toml::from_str::<MdConfig>(&substituted_content)?,
            Some(ext) => {
                return Err(ConfigError::UnsupportedFormat {
                    extension: ext.to_string(),
                })
            }
        };

        Ok(config)
    }

    /// Find the first existing configuration file in search paths
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .find(|path| path.is_file())
            .cloned()
    }

    /// Substitute environment variables in configuration content
    fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR_PATTERN.captures_iter(content) {
            let full_match = &cap[0];
            let replacement = self.process_var_expression(&cap[1])?;
            result = result.replace(full_match, &replacement);
        }

        Ok(result)
    }

    /// Process a variable expression like "VAR", "VAR:-default", or "VAR:?error"
    fn process_var_expression(&self, expr: &str) -> Result<String, ConfigError> {
        if let Some((var_name, default_value)) = expr.split_once(":-") {
            Ok(env::var(var_name).unwrap_or_else(|_| default_value.to_string()))
        } else if let Some((var_name, error_msg)) = expr.split_once(":?") {
            env::var(var_name).map_err(|_| {
                ConfigError::EnvSubstitutionError(format!(
                    "Required environment variable '{}' is not set: {}",
                    var_name, error_msg
                ))
            })
        } else {
            env::var(expr).map_err(|_| {
                ConfigError::EnvSubstitutionError(format!(
                    "Required environment variable '{}' is not set",
                    expr
                ))
            })
        }
    }

    /// Get all search paths for debugging
    pub fn get_search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_env_substitution_with_default() {
        let loader = ConfigLoader::new();
        env::remove_var("MD_TEST_VAR_DEFAULT");

        let content = "sidecar = \"${MD_TEST_VAR_DEFAULT:-/tmp/scene.zprj.ayon.json}\"";
        let result = loader.substitute_env_vars(content).unwrap();
        assert_eq!(result, "sidecar = \"/tmp/scene.zprj.ayon.json\"");
    }

    #[test]
    #[serial]
    fn test_env_substitution_with_existing_var() {
        let loader = ConfigLoader::new();
        env::set_var("MD_TEST_VAR", "debug");

        let content = "level = \"${MD_TEST_VAR:-info}\"";
        let result = loader.substitute_env_vars(content).unwrap();
        assert_eq!(result, "level = \"debug\"");

        env::remove_var("MD_TEST_VAR");
    }

    #[test]
    #[serial]
    fn test_env_substitution_required_var_missing() {
        let loader = ConfigLoader::new();
        env::remove_var("MD_REQUIRED_VAR");

        let result = loader.substitute_env_vars("sidecar = \"${MD_REQUIRED_VAR}\"");
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_substitution_custom_error() {
        let loader = ConfigLoader::new();
        env::remove_var("MD_REQUIRED_VAR");

        let content = "sidecar = \"${MD_REQUIRED_VAR:?Sidecar path must be provided}\"";
        let result = loader.substitute_env_vars(content);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Sidecar path must be provided"));
    }

    #[test]
    #[serial]
    fn test_missing_discovered_config_uses_defaults() {
        env::remove_var(CONFIG_ENV);
        let loader = ConfigLoader::with_search_paths(vec![PathBuf::from("/nonexistent/md-ctl.toml")]);

        let config = loader.load_config(None).unwrap();
        assert_eq!(config, MdConfig::default());
    }
}
