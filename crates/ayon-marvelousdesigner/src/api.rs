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

//! The Marvelous Designer application API.
//!
//! Import, export, fabric and project-file calls the integration needs from
//! the running application. The embedding layer implements [`GarmentApi`] on
//! top of the application's scripting API; tests use
//! [`crate::testing::RecordingGarmentApi`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ApiError;

/// Handle of a fabric slot inside the current project.
pub type FabricIndex = i64;

/// Options for importing an Alembic cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlembicImportOptions {
    /// Uniform scale applied to the imported geometry
    pub scale: f64,
}

impl Default for AlembicImportOptions {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Options shared by FBX/OBJ import and all mesh exports.
///
/// Field names on the wire match the publish attribute names artists toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportExportOptions {
    #[serde(rename = "bExportGarment")]
    pub export_garment: bool,
    #[serde(rename = "bExportAvatar")]
    pub export_avatar: bool,
    #[serde(rename = "bSingleObject")]
    pub single_object: bool,
    #[serde(rename = "bThin")]
    pub thin: bool,
    #[serde(rename = "bMetaData")]
    pub metadata: bool,
    #[serde(rename = "bExportAnimation")]
    pub export_animation: bool,
}

impl Default for ImportExportOptions {
    fn default() -> Self {
        Self {
            export_garment: true,
            export_avatar: false,
            single_object: true,
            thin: false,
            metadata: true,
            export_animation: false,
        }
    }
}

/// Calls into the running Marvelous Designer application.
pub trait GarmentApi: Send + Sync {
    fn import_alembic(&self, path: &Path, options: &AlembicImportOptions)
        -> Result<(), ApiError>;

    fn import_fbx(&self, path: &Path, options: &ImportExportOptions) -> Result<(), ApiError>;

    fn import_obj(&self, path: &Path, options: &ImportExportOptions) -> Result<(), ApiError>;

    /// Export to `path`; returns the file the application actually wrote.
    fn export_alembic(&self, path: &Path, options: &ImportExportOptions)
        -> Result<PathBuf, ApiError>;

    fn export_fbx(&self, path: &Path, options: &ImportExportOptions) -> Result<PathBuf, ApiError>;

    fn export_obj(&self, path: &Path, options: &ImportExportOptions) -> Result<PathBuf, ApiError>;

    /// Open a `.zprj` project.
    fn import_zprj(&self, path: &Path) -> Result<(), ApiError>;

    /// Save the current project as `.zprj`.
    fn export_zprj(&self, path: &Path) -> Result<(), ApiError>;

    /// Path of the open project, if it has been saved.
    fn project_file_path(&self) -> Result<Option<PathBuf>, ApiError>;

    fn has_unsaved_changes(&self) -> Result<bool, ApiError>;

    /// Add a `.zfab` fabric to the project and return its slot.
    fn add_fabric(&self, path: &Path) -> Result<FabricIndex, ApiError>;

    fn replace_fabric(&self, index: FabricIndex, path: &Path) -> Result<(), ApiError>;

    fn delete_fabric(&self, index: FabricIndex) -> Result<(), ApiError>;

    fn export_zfab(&self, path: &Path, index: FabricIndex) -> Result<(), ApiError>;

    /// Slot of the fabric currently selected by the artist.
    fn current_fabric_index(&self) -> Result<FabricIndex, ApiError>;

    /// Name of the fabric in `index`, `None` if the slot is empty.
    fn fabric_name(&self, index: FabricIndex) -> Result<Option<String>, ApiError>;
}
