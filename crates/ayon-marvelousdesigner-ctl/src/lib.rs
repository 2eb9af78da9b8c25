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

//! # md-ctl
//!
//! Operator tool for the pipeline metadata of Marvelous Designer workfiles.
//! Outside the application the metadata lives in a JSON sidecar next to the
//! `.zprj`; this crate reads and edits it through the same
//! [`MetadataRegistry`](ayon_marvelousdesigner::MetadataRegistry) the host uses.

pub mod cli;
pub mod commands;
pub mod config;
pub mod utils;

pub use cli::*;
pub use commands::run;
pub use config::{ConfigError, ConfigLoader, MdConfig, Validate, ValidationError};
pub use utils::*;
