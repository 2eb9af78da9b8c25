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
use ayon_marvelousdesigner::{ImprintOutcome, MetadataRegistry};
use std::io::Write;

use super::{parse_object, write_json};
use crate::cli::{Cli, ContainerCommands};
use crate::utils::{should_print, LogLevel};

pub fn run(
    cli: &Cli,
    registry: &MetadataRegistry,
    action: &ContainerCommands,
    out: &mut dyn Write,
) -> Result<()> {
    match action {
        ContainerCommands::List { json } => {
            let containers = registry
                .list_containers()
                .context("Failed to read containers")?;
            if *json {
                return write_json(out, &containers);
            }
            for container in &containers {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    container.object_name,
                    container.loader,
                    container.representation,
                    container.namespace.as_deref().unwrap_or("-")
                )?;
            }
            Ok(())
        }
        ContainerCommands::Remove { object_name } => {
            let removed = registry
                .remove_container(object_name)
                .with_context(|| format!("Failed to remove container '{}'", object_name))?;
            if should_print(cli, LogLevel::Info) {
                writeln!(out, "Removed {} container(s) named '{}'", removed, object_name)?;
            }
            Ok(())
        }
        ContainerCommands::Imprint { object_name, data } => {
            let patch = parse_object(data)?;
            let outcome = registry
                .update_container_fields(object_name, patch)
                .with_context(|| format!("Failed to update container '{}'", object_name))?;
            match outcome {
                ImprintOutcome::Applied => {
                    if should_print(cli, LogLevel::Info) {
                        writeln!(out, "Updated container '{}'", object_name)?;
                    }
                }
                ImprintOutcome::Missing => {
                    writeln!(out, "No container named '{}'", object_name)?;
                }
            }
            Ok(())
        }
    }
}
