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

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Write;

use crate::cli::{Cli, ConfigCommands};
use crate::config::{default_user_config_path, generate_default_config_toml, MdConfig};
use crate::utils::{should_print, LogLevel};

pub fn run(cli: &Cli, config: &MdConfig, action: &ConfigCommands, out: &mut dyn Write) -> Result<()> {
    match action {
        ConfigCommands::Init {
            output,
            force,
            stdout,
        } => {
            let content =
                generate_default_config_toml().context("Failed to render default configuration")?;
            if *stdout {
                write!(out, "{}", content)?;
                return Ok(());
            }

            let path = output
                .clone()
                .or_else(default_user_config_path)
                .context("No user config directory; pass --output")?;
            if path.exists() && !force {
                bail!(
                    "Configuration file {} already exists; use --force to overwrite",
                    path.display()
                );
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if should_print(cli, LogLevel::Info) {
                writeln!(out, "Wrote default configuration to {}", path.display())?;
            }
            Ok(())
        }
        ConfigCommands::Show => {
            let content =
                toml::to_string_pretty(config).context("Failed to render configuration")?;
            write!(out, "{}", content)?;
            Ok(())
        }
    }
}
