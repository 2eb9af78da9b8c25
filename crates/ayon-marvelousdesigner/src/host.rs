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

//! # Host
//!
//! The pipeline talks to an application through independent capability
//! groups. Each group is its own trait; [`MarvelousDesignerHost`] implements
//! all of them on top of a [`MetadataRegistry`] and a [`GarmentApi`].

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::GarmentApi;
use crate::container::Container;
use crate::error::{ApiError, MetadataError};
use crate::metadata::MetadataRegistry;
use crate::plugins::registry::register_builtin_plugins;
use crate::session::{ToolLauncher, ToolsSession};
use crate::settings::MdSettings;
use crate::{HOST_NAME, WORKFILE_EXTENSIONS};

pub trait HostBase {
    fn name(&self) -> &str;
}

/// Saving and opening work files.
pub trait WorkfileHost: HostBase {
    fn workfile_extensions(&self) -> &[&'static str];

    /// Save the open project to `path` and return where it was saved.
    fn save_workfile(&self, path: &Path) -> Result<PathBuf, ApiError>;

    fn open_workfile(&self, path: &Path) -> Result<(), ApiError>;

    /// `None` while the project has never been saved.
    fn current_workfile(&self) -> Result<Option<PathBuf>, ApiError>;

    fn workfile_has_unsaved_changes(&self) -> Result<bool, ApiError>;
}

/// Tracking of loaded assets.
pub trait LoadHost: HostBase {
    fn get_containers(&self) -> Result<Vec<Container>, MetadataError>;
}

/// Publish session context stored with the project.
pub trait PublishHost: HostBase {
    fn get_context_data(&self) -> Result<Map<String, Value>, MetadataError>;

    /// Store `data` as the new context. `changes` is accepted for interface
    /// compatibility; the whole section is replaced.
    fn update_context_data(
        &self,
        data: Map<String, Value>,
        changes: &Map<String, Value>,
    ) -> Result<(), MetadataError>;
}

/// Marvelous Designer host.
pub struct MarvelousDesignerHost {
    registry: MetadataRegistry,
    api: Arc<dyn GarmentApi>,
    settings: MdSettings,
    tools: Mutex<ToolsSession>,
    has_been_setup: AtomicBool,
}

impl std::fmt::Debug for MarvelousDesignerHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarvelousDesignerHost")
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .field("has_been_setup", &self.is_setup())
            .finish_non_exhaustive()
    }
}

impl MarvelousDesignerHost {
    pub fn new(registry: MetadataRegistry, api: Arc<dyn GarmentApi>) -> Self {
        Self {
            registry,
            api,
            settings: MdSettings::default(),
            tools: Mutex::new(ToolsSession::new()),
            has_been_setup: AtomicBool::new(false),
        }
    }

    pub fn with_settings(mut self, settings: MdSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    pub fn api(&self) -> &dyn GarmentApi {
        self.api.as_ref()
    }

    pub fn settings(&self) -> &MdSettings {
        &self.settings
    }

    /// Register the built-in creators, loaders and publish plugins.
    pub fn install(&self) {
        register_builtin_plugins();
        self.has_been_setup.store(true, Ordering::SeqCst);
        tracing::info!(host = HOST_NAME, "Installed host");
    }

    pub fn is_setup(&self) -> bool {
        self.has_been_setup.load(Ordering::SeqCst)
    }

    /// Show the tools dialog, reusing it while it is open.
    pub fn show_tools_dialog(&self, launcher: &dyn ToolLauncher) {
        self.tools.lock().show(launcher);
    }

    /// Mark the tools dialog as closed by the artist.
    pub fn close_tools_dialog(&self) {
        self.tools.lock().close();
    }

    pub fn tools_dialogs_created(&self) -> u64 {
        self.tools.lock().dialogs_created()
    }
}

impl HostBase for MarvelousDesignerHost {
    fn name(&self) -> &str {
        HOST_NAME
    }
}

impl WorkfileHost for MarvelousDesignerHost {
    fn workfile_extensions(&self) -> &[&'static str] {
        WORKFILE_EXTENSIONS
    }

    // The application has no "save in place": export the project, then
    // open the exported file so it becomes the current workfile.
    fn save_workfile(&self, path: &Path) -> Result<PathBuf, ApiError> {
        self.api.export_zprj(path)?;
        self.open_workfile(path)?;
        tracing::info!(path = %path.display(), "Saved workfile");
        Ok(path.to_path_buf())
    }

    fn open_workfile(&self, path: &Path) -> Result<(), ApiError> {
        self.api.import_zprj(path)
    }

    fn current_workfile(&self) -> Result<Option<PathBuf>, ApiError> {
        self.api.project_file_path()
    }

    fn workfile_has_unsaved_changes(&self) -> Result<bool, ApiError> {
        self.api.has_unsaved_changes()
    }
}

impl LoadHost for MarvelousDesignerHost {
    fn get_containers(&self) -> Result<Vec<Container>, MetadataError> {
        self.registry.list_containers()
    }
}

impl PublishHost for MarvelousDesignerHost {
    fn get_context_data(&self) -> Result<Map<String, Value>, MetadataError> {
        self.registry.get_context_data()
    }

    fn update_context_data(
        &self,
        data: Map<String, Value>,
        _changes: &Map<String, Value>,
    ) -> Result<(), MetadataError> {
        self.registry.set_context_data(data)
    }
}
