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
use clap::Parser;
use md_ctl::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_logging(&cli, &config.logging.level);
    tracing::debug!(?cli, "Starting md-ctl");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &config, &mut out)
}
