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
use ayon_marvelousdesigner::MetadataRegistry;
use std::io::Write;

use super::{parse_object, write_json};
use crate::cli::{Cli, ContextCommands};
use crate::utils::{should_print, LogLevel};

pub fn run(
    cli: &Cli,
    registry: &MetadataRegistry,
    action: &ContextCommands,
    out: &mut dyn Write,
) -> Result<()> {
    match action {
        ContextCommands::Show => {
            let data = registry
                .get_context_data()
                .context("Failed to read context data")?;
            write_json(out, &data)
        }
        ContextCommands::Set { data } => {
            let data = parse_object(data)?;
            registry
                .set_context_data(data)
                .context("Failed to store context data")?;
            if should_print(cli, LogLevel::Info) {
                writeln!(out, "Replaced context data")?;
            }
            Ok(())
        }
    }
}
