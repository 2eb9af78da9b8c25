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

use crate::config::{types::*, ValidationError};

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for MdConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = self.metadata.validate() {
            errors.push(e);
        }
        if let Err(e) = self.logging.validate() {
            errors.push(e);
        }
        if let Err(e) = self.workfile.validate() {
            errors.push(e);
        }
        for name in self.publish.keys() {
            if name.trim().is_empty() {
                errors.push(ValidationError::InvalidPlugin {
                    message: "plugin name must not be empty".to_string(),
                });
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple { errors }),
        }
    }
}

impl Validate for MetadataConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.sidecar {
            Some(path) if path.as_os_str().is_empty() => Err(ValidationError::InvalidPath {
                path: "metadata.sidecar must not be empty".to_string(),
            }),
            Some(path) if path.is_dir() => Err(ValidationError::InvalidPath {
                path: format!("metadata.sidecar is a directory: {}", path.display()),
            }),
            _ => Ok(()),
        }
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            _ => Err(ValidationError::InvalidLogLevel {
                level: self.level.clone(),
            }),
        }
    }
}

impl Validate for WorkfileConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.temp_dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidPath {
                path: "workfile.temp_dir must not be empty".to_string(),
            });
        }
        if let Some(template) = &self.template {
            if template.extension().and_then(|ext| ext.to_str()) != Some("zprj") {
                return Err(ValidationError::InvalidPath {
                    path: format!("workfile.template must be a .zprj file: {}", template.display()),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_are_valid() {
        assert!(MdConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = MdConfig::default();
        config.logging.level = "loud".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLogLevel { .. }));
    }

    #[test]
    fn test_multiple_errors_are_collected() {
        let mut config = MdConfig::default();
        config.logging.level = "loud".to_string();
        config.workfile.template = Some(PathBuf::from("/templates/default.ma"));

        match config.validate().unwrap_err() {
            ValidationError::Multiple { errors } => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {other}"),
        }
    }
}
