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

//! Subcommand implementations. Every command writes its output to the given
//! writer so it can be captured.

pub mod config;
pub mod containers;
pub mod context;
pub mod document;
pub mod instances;
pub mod plugins;
pub mod workfile;

use anyhow::{bail, Context, Result};
use ayon_marvelousdesigner::{FileAccessor, MetadataRegistry};
use serde_json::{Map, Value};
use std::io::Write;
use std::sync::Arc;

use crate::cli::{Cli, Commands};
use crate::config::MdConfig;

/// Run the parsed command against the resolved configuration.
pub fn run(cli: &Cli, config: &MdConfig, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Commands::Document(action) => document::run(&open_registry(cli, config)?, action, out),
        Commands::Containers(action) => {
            containers::run(cli, &open_registry(cli, config)?, action, out)
        }
        Commands::Instances(action) => {
            instances::run(cli, &open_registry(cli, config)?, action, out)
        }
        Commands::Context(action) => context::run(cli, &open_registry(cli, config)?, action, out),
        Commands::Workfile(action) => workfile::run(config, action, out),
        Commands::Plugins => plugins::run(config, out),
        Commands::Config(action) => config::run(cli, config, action, out),
    }
}

/// Registry over the sidecar named on the command line or in the config.
pub fn open_registry(cli: &Cli, config: &MdConfig) -> Result<MetadataRegistry> {
    let path = cli
        .metadata
        .clone()
        .or_else(|| config.metadata.sidecar.clone())
        .context("No metadata file given; pass --metadata or set metadata.sidecar")?;
    tracing::debug!(path = %path.display(), "Opening metadata sidecar");
    Ok(MetadataRegistry::new(Arc::new(FileAccessor::new(path))))
}

/// Parse a command-line JSON argument that must be an object.
pub(crate) fn parse_object(text: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(text).context("Invalid JSON argument")?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("Expected a JSON object, got: {}", other),
    }
}

pub(crate) fn write_json(out: &mut dyn Write, value: &impl serde::Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", text)?;
    Ok(())
}
