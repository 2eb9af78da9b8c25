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

use anyhow::{Context, Result};
use ayon_marvelousdesigner::instance::{keys, str_field};
use ayon_marvelousdesigner::MetadataRegistry;
use serde_json::Value;
use std::io::Write;

use super::{parse_object, write_json};
use crate::cli::{Cli, InstanceCommands};
use crate::utils::{should_print, LogLevel};

pub fn run(
    cli: &Cli,
    registry: &MetadataRegistry,
    action: &InstanceCommands,
    out: &mut dyn Write,
) -> Result<()> {
    match action {
        InstanceCommands::List { json } => {
            let instances = registry
                .get_instances()
                .context("Failed to read instances")?;
            if *json {
                return write_json(out, &instances);
            }
            for (id, data) in &instances {
                let data = data.as_object();
                let field = |key| data.and_then(|data| str_field(data, key)).unwrap_or("-");
                let active = data
                    .and_then(|data| data.get(keys::ACTIVE))
                    .and_then(Value::as_bool)
                    .unwrap_or(true);
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    id,
                    field(keys::PRODUCT_TYPE),
                    field(keys::PRODUCT_NAME),
                    if active { "active" } else { "inactive" }
                )?;
            }
            Ok(())
        }
        InstanceCommands::Remove { id } => {
            let existed = registry
                .remove_instance(id)
                .with_context(|| format!("Failed to remove instance '{}'", id))?;
            if !existed {
                writeln!(out, "No instance with id '{}'", id)?;
            } else if should_print(cli, LogLevel::Info) {
                writeln!(out, "Removed instance '{}'", id)?;
            }
            Ok(())
        }
        InstanceCommands::Set { id, data, replace } => {
            let data = parse_object(data)?;
            registry
                .set_instance(id, data, !replace)
                .with_context(|| format!("Failed to store instance '{}'", id))?;
            if should_print(cli, LogLevel::Info) {
                let verb = if *replace { "Replaced" } else { "Updated" };
                writeln!(out, "{} instance '{}'", verb, id)?;
            }
            Ok(())
        }
    }
}
