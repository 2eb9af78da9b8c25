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

use anyhow::Result;
use ayon_marvelousdesigner::plugins::registry;
use std::io::Write;

use crate::config::MdConfig;

pub fn run(config: &MdConfig, out: &mut dyn Write) -> Result<()> {
    registry::register_builtin_plugins();
    let settings = config.settings();

    let mut creators = registry::get_all_creators();
    creators.sort_by(|a, b| a.identifier().cmp(b.identifier()));
    writeln!(out, "Creators:")?;
    for creator in &creators {
        let auto = if creator.is_auto() { " (auto)" } else { "" };
        writeln!(
            out,
            "  {}\t{}\t{}{}",
            creator.identifier(),
            creator.label(),
            creator.product_base_type(),
            auto
        )?;
    }

    let mut loaders = registry::get_all_loaders();
    loaders.sort_by(|a, b| a.name().cmp(b.name()));
    writeln!(out, "Loaders:")?;
    for loader in &loaders {
        writeln!(
            out,
            "  {}\t{}\t{}",
            loader.name(),
            loader.product_types().join(","),
            loader.representations().join(",")
        )?;
    }

    let mut publish = registry::get_all_publish_plugins();
    publish.sort_by(|a, b| {
        a.order()
            .total_cmp(&b.order())
            .then_with(|| a.name().cmp(b.name()))
    });
    writeln!(out, "Publish plugins:")?;
    for plugin in &publish {
        let state = if !settings.is_enabled(plugin.name()) {
            "disabled"
        } else if settings
            .plugin(plugin.name())
            .map_or(plugin.optional(), |toggle| toggle.optional)
        {
            "optional"
        } else {
            "required"
        };
        writeln!(
            out,
            "  {:>5.2}\t{}\t{}\t{}",
            plugin.order(),
            plugin.name(),
            plugin.label(),
            state
        )?;
    }
    Ok(())
}
