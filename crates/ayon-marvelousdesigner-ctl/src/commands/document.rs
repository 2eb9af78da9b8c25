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

use super::write_json;
use crate::cli::DocumentCommands;

pub fn run(registry: &MetadataRegistry, action: &DocumentCommands, out: &mut dyn Write) -> Result<()> {
    match action {
        DocumentCommands::Show => {
            let document = registry
                .get_document()
                .context("Failed to read metadata document")?;
            write_json(out, document.as_map())
        }
    }
}
