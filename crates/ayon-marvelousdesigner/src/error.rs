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

//! Error types for the integration.
//!
//! Hard errors bubble to the invoking plugin; nothing here is retried. The
//! soft "no container matched" condition is not an error and is reported via
//! [`crate::metadata::ImprintOutcome`] instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`crate::metadata::MetadataAccessor`].
#[derive(Debug, Error)]
pub enum AccessorError {
    #[error("Failed to read metadata from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write metadata to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Host metadata call failed: {0}")]
    Host(String),
}

/// Errors raised by the metadata registry.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The stored string is present but cannot be used as a metadata document
    #[error("Stored metadata is malformed: {reason}")]
    Malformed { reason: String },

    /// A known section holds a value of the wrong JSON type
    #[error("Metadata section '{section}' must be {expected}")]
    InvalidSection {
        section: String,
        expected: &'static str,
    },

    #[error("Failed to serialize metadata document: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Accessor(#[from] AccessorError),
}

/// Requested extension is outside the closed dispatch set.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Unsupported format: {extension}")]
    Unsupported { extension: String },
}

/// Errors reported by the Marvelous Designer application API.
#[derive(Debug, Error)]
#[error("Marvelous Designer call '{call}' failed: {message}")]
pub struct ApiError {
    pub call: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(call: &'static str, message: impl Into<String>) -> Self {
        Self {
            call,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error("Instance is missing its '{key}' field")]
    MissingField { key: &'static str },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Loader '{loader}' does not support {operation}")]
    NotSupported {
        loader: String,
        operation: &'static str,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum PublishError {
    /// A failure the artist can act on; shown without a traceback
    #[error("{0}")]
    KnownPublish(String),

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Instance '{instance}' is missing '{key}'")]
    MissingData { instance: String, key: &'static str },

    #[error("Failed to prepare staging directory {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Default workfile template not found: {0}")]
    TemplateMissing(PathBuf),

    #[error("Failed to copy workfile template to {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
