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

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "md-ctl",
    version,
    about = "Inspect and edit Marvelous Designer pipeline metadata",
    long_about = "A tool for listing, editing and removing the containers, instances and \
                  publish context stored alongside Marvelous Designer workfiles"
)]
pub struct Cli {
    /// Metadata sidecar file (defaults to `metadata.sidecar` from the config)
    #[arg(long, global = true, env = "MD_CTL_METADATA")]
    pub metadata: Option<PathBuf>,

    /// Configuration file (defaults to MD_CTL_CONFIG, ./md-ctl.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Raw metadata document operations
    #[command(subcommand)]
    Document(DocumentCommands),

    /// Loaded container operations
    #[command(subcommand)]
    Containers(ContainerCommands),

    /// Publish instance operations
    #[command(subcommand)]
    Instances(InstanceCommands),

    /// Publish context data operations
    #[command(subcommand)]
    Context(ContextCommands),

    /// Launch workfile operations
    #[command(subcommand)]
    Workfile(WorkfileCommands),

    /// List built-in plugins and their publish toggles
    Plugins,

    /// Configuration file operations
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum DocumentCommands {
    /// Print the whole metadata document
    Show,
}

#[derive(Subcommand, Debug)]
pub enum ContainerCommands {
    /// List loaded containers
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Remove every container with the given object name
    Remove { object_name: String },
    /// Merge JSON fields into the first container with the given object name
    Imprint {
        object_name: String,
        /// JSON object with the fields to set
        data: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum InstanceCommands {
    /// List publish instances
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Remove an instance by id
    Remove { id: String },
    /// Merge JSON fields into an instance, creating it if missing
    Set {
        id: String,
        /// JSON object with the instance fields
        data: String,
        /// Replace the stored record instead of merging
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContextCommands {
    /// Print the publish context data
    Show,
    /// Replace the publish context data
    Set {
        /// JSON object
        data: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorkfileCommands {
    /// Resolve the workfile Marvelous Designer would open on launch
    Resolve {
        /// Project name, used for the temp directory
        #[arg(long)]
        project: String,
        /// Last workfile of the task
        #[arg(long)]
        last: Option<PathBuf>,
        /// Reopen the last workfile if it exists
        #[arg(long)]
        start_last: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Output file (defaults to the user config dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with_all = ["output", "force"])]
        stdout: bool,
    },
    /// Print the effective configuration
    Show,
}
