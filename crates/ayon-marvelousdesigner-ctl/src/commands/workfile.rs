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
use ayon_marvelousdesigner::hooks::{resolve_launch_workfile, LaunchRequest};
use std::io::Write;

use crate::cli::WorkfileCommands;
use crate::config::MdConfig;

pub fn run(config: &MdConfig, action: &WorkfileCommands, out: &mut dyn Write) -> Result<()> {
    match action {
        WorkfileCommands::Resolve {
            project,
            last,
            start_last,
        } => {
            let template = config
                .workfile
                .template
                .as_ref()
                .context("No workfile template configured; set workfile.template")?;
            let mut request = LaunchRequest::new(project, template, &config.workfile.temp_dir);
            if let Some(last) = last {
                request = request.with_last_workfile(last, *start_last);
            }

            let plan =
                resolve_launch_workfile(&request).context("Failed to resolve launch workfile")?;
            writeln!(out, "{}", plan.workfile.display())?;
            for (name, value) in &plan.env {
                writeln!(out, "{}={}", name, value)?;
            }
            Ok(())
        }
    }
}
