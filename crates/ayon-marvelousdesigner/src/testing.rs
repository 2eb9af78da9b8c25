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

//! Test doubles for running the integration without the application.
//!
//! [`RecordingGarmentApi`] records every call, keeps a fake fabric table and
//! writes small placeholder files for exports so publish plugins see real
//! output on disk.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{AlembicImportOptions, FabricIndex, GarmentApi, ImportExportOptions};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ImportAlembic(PathBuf),
    ImportFbx(PathBuf),
    ImportObj(PathBuf),
    ExportAlembic(PathBuf),
    ExportFbx(PathBuf),
    ExportObj(PathBuf),
    ImportZprj(PathBuf),
    ExportZprj(PathBuf),
    AddFabric(PathBuf),
    ReplaceFabric(FabricIndex, PathBuf),
    DeleteFabric(FabricIndex),
    ExportZfab(PathBuf, FabricIndex),
}

#[derive(Debug)]
struct ApiState {
    calls: Vec<ApiCall>,
    fabrics: BTreeMap<FabricIndex, String>,
    current_fabric: FabricIndex,
    project: Option<PathBuf>,
    unsaved: bool,
    write_outputs: bool,
    last_export_options: Option<ImportExportOptions>,
}

/// In-process stand-in for the application API.
#[derive(Debug)]
pub struct RecordingGarmentApi {
    state: Mutex<ApiState>,
}

impl Default for RecordingGarmentApi {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingGarmentApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ApiState {
                calls: Vec::new(),
                fabrics: BTreeMap::new(),
                current_fabric: 0,
                project: None,
                unsaved: false,
                write_outputs: true,
                last_export_options: None,
            }),
        }
    }

    pub fn with_project(self, path: impl Into<PathBuf>) -> Self {
        self.state.lock().project = Some(path.into());
        self
    }

    pub fn with_fabric(self, index: FabricIndex, name: &str) -> Self {
        self.state.lock().fabrics.insert(index, name.to_string());
        self
    }

    pub fn set_current_fabric(&self, index: FabricIndex) {
        self.state.lock().current_fabric = index;
    }

    pub fn set_unsaved(&self, unsaved: bool) {
        self.state.lock().unsaved = unsaved;
    }

    /// Make exports "succeed" without producing files.
    pub fn skip_outputs(self) -> Self {
        self.state.lock().write_outputs = false;
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    pub fn fabric(&self, index: FabricIndex) -> Option<String> {
        self.state.lock().fabrics.get(&index).cloned()
    }

    pub fn last_export_options(&self) -> Option<ImportExportOptions> {
        self.state.lock().last_export_options.clone()
    }

    fn record(&self, call: ApiCall) {
        self.state.lock().calls.push(call);
    }

    fn write_placeholder(&self, call: &'static str, path: &Path) -> Result<(), ApiError> {
        if !self.state.lock().write_outputs {
            return Ok(());
        }
        fs::write(path, b"placeholder").map_err(|e| ApiError::new(call, e.to_string()))
    }

    fn export_mesh(
        &self,
        call: &'static str,
        path: &Path,
        options: &ImportExportOptions,
    ) -> Result<PathBuf, ApiError> {
        self.state.lock().last_export_options = Some(options.clone());
        self.write_placeholder(call, path)?;
        if options.metadata {
            self.write_placeholder(call, &path.with_extension("xml"))?;
        }
        Ok(path.to_path_buf())
    }
}

fn fabric_name_from(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl GarmentApi for RecordingGarmentApi {
    fn import_alembic(
        &self,
        path: &Path,
        _options: &AlembicImportOptions,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::ImportAlembic(path.to_path_buf()));
        Ok(())
    }

    fn import_fbx(&self, path: &Path, _options: &ImportExportOptions) -> Result<(), ApiError> {
        self.record(ApiCall::ImportFbx(path.to_path_buf()));
        Ok(())
    }

    fn import_obj(&self, path: &Path, _options: &ImportExportOptions) -> Result<(), ApiError> {
        self.record(ApiCall::ImportObj(path.to_path_buf()));
        Ok(())
    }

    fn export_alembic(
        &self,
        path: &Path,
        options: &ImportExportOptions,
    ) -> Result<PathBuf, ApiError> {
        self.record(ApiCall::ExportAlembic(path.to_path_buf()));
        self.export_mesh("ExportAlembic", path, options)
    }

    fn export_fbx(&self, path: &Path, options: &ImportExportOptions) -> Result<PathBuf, ApiError> {
        self.record(ApiCall::ExportFbx(path.to_path_buf()));
        self.export_mesh("ExportFBX", path, options)
    }

    fn export_obj(&self, path: &Path, options: &ImportExportOptions) -> Result<PathBuf, ApiError> {
        self.record(ApiCall::ExportObj(path.to_path_buf()));
        self.export_mesh("ExportOBJ", path, options)
    }

    fn import_zprj(&self, path: &Path) -> Result<(), ApiError> {
        self.record(ApiCall::ImportZprj(path.to_path_buf()));
        let mut state = self.state.lock();
        state.project = Some(path.to_path_buf());
        state.unsaved = false;
        Ok(())
    }

    fn export_zprj(&self, path: &Path) -> Result<(), ApiError> {
        self.record(ApiCall::ExportZprj(path.to_path_buf()));
        self.write_placeholder("ExportZPrj", path)?;
        self.state.lock().unsaved = false;
        Ok(())
    }

    fn project_file_path(&self) -> Result<Option<PathBuf>, ApiError> {
        Ok(self.state.lock().project.clone())
    }

    fn has_unsaved_changes(&self) -> Result<bool, ApiError> {
        Ok(self.state.lock().unsaved)
    }

    fn add_fabric(&self, path: &Path) -> Result<FabricIndex, ApiError> {
        self.record(ApiCall::AddFabric(path.to_path_buf()));
        let mut state = self.state.lock();
        let index = state
            .fabrics
            .keys()
            .next_back()
            .map(|last| last + 1)
            .unwrap_or(0);
        state.fabrics.insert(index, fabric_name_from(path));
        Ok(index)
    }

    fn replace_fabric(&self, index: FabricIndex, path: &Path) -> Result<(), ApiError> {
        self.record(ApiCall::ReplaceFabric(index, path.to_path_buf()));
        let mut state = self.state.lock();
        match state.fabrics.get_mut(&index) {
            Some(name) => {
                *name = fabric_name_from(path);
                Ok(())
            }
            None => Err(ApiError::new("ReplaceFabric", format!("no fabric at {}", index))),
        }
    }

    fn delete_fabric(&self, index: FabricIndex) -> Result<(), ApiError> {
        self.record(ApiCall::DeleteFabric(index));
        self.state
            .lock()
            .fabrics
            .remove(&index)
            .map(|_| ())
            .ok_or_else(|| ApiError::new("DeleteFabric", format!("no fabric at {}", index)))
    }

    fn export_zfab(&self, path: &Path, index: FabricIndex) -> Result<(), ApiError> {
        self.record(ApiCall::ExportZfab(path.to_path_buf(), index));
        if !self.state.lock().fabrics.contains_key(&index) {
            return Err(ApiError::new("ExportZFab", format!("no fabric at {}", index)));
        }
        self.write_placeholder("ExportZFab", path)
    }

    fn current_fabric_index(&self) -> Result<FabricIndex, ApiError> {
        Ok(self.state.lock().current_fabric)
    }

    fn fabric_name(&self, index: FabricIndex) -> Result<Option<String>, ApiError> {
        Ok(self.fabric(index))
    }
}
