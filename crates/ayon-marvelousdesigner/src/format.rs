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

//! Format dispatch for import and export.
//!
//! The set of formats is closed: `.abc`, `.fbx`, `.obj` and the fabric format
//! `.zfab`. Fabrics are addressed by slot index instead of by path once they
//! are in the project, so they import but never export through here.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::api::{AlembicImportOptions, FabricIndex, GarmentApi, ImportExportOptions};
use crate::error::{ApiError, FormatError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    Alembic,
    Fbx,
    Obj,
    Zfab,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 4] = [
        MeshFormat::Alembic,
        MeshFormat::Fbx,
        MeshFormat::Obj,
        MeshFormat::Zfab,
    ];

    /// Extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            MeshFormat::Alembic => "abc",
            MeshFormat::Fbx => "fbx",
            MeshFormat::Obj => "obj",
            MeshFormat::Zfab => "zfab",
        }
    }

    /// Accepts `.abc`, `abc`, `.ABC` and so on.
    pub fn from_extension(extension: &str) -> Result<Self, FormatError> {
        let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == normalized)
            .ok_or_else(|| FormatError::Unsupported {
                extension: extension.to_string(),
            })
    }

    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Options object built for an import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOptions {
    Alembic(AlembicImportOptions),
    Mesh(ImportExportOptions),
    /// Fabrics take no options
    Fabric,
}

/// What an import produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Imported {
    Mesh,
    Fabric(FabricIndex),
}

/// Importer selected for one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHandler {
    format: MeshFormat,
}

impl FormatHandler {
    pub fn format(&self) -> MeshFormat {
        self.format
    }

    /// Default options for this format.
    pub fn options(&self) -> ImportOptions {
        match self.format {
            MeshFormat::Alembic => ImportOptions::Alembic(AlembicImportOptions::default()),
            MeshFormat::Fbx | MeshFormat::Obj => {
                ImportOptions::Mesh(ImportExportOptions::default())
            }
            MeshFormat::Zfab => ImportOptions::Fabric,
        }
    }

    /// Import `path` into the open project with this format's default options.
    pub fn import(&self, api: &dyn GarmentApi, path: &Path) -> Result<Imported, ApiError> {
        tracing::debug!(format = %self.format, path = %path.display(), "Importing");
        match self.options() {
            ImportOptions::Alembic(options) => {
                api.import_alembic(path, &options)?;
                Ok(Imported::Mesh)
            }
            ImportOptions::Mesh(options) if self.format == MeshFormat::Fbx => {
                api.import_fbx(path, &options)?;
                Ok(Imported::Mesh)
            }
            ImportOptions::Mesh(options) => {
                api.import_obj(path, &options)?;
                Ok(Imported::Mesh)
            }
            ImportOptions::Fabric => api.add_fabric(path).map(Imported::Fabric),
        }
    }
}

/// Pick the importer for an extension.
///
/// # Errors
///
/// [`FormatError::Unsupported`] for anything outside the closed set.
pub fn select_handler(extension: &str) -> Result<FormatHandler, FormatError> {
    MeshFormat::from_extension(extension).map(|format| FormatHandler { format })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportCall {
    Alembic,
    Fbx,
    Obj,
}

/// Exporter selected for one mesh format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshExporter {
    format: MeshFormat,
    call: ExportCall,
}

impl MeshExporter {
    pub fn format(&self) -> MeshFormat {
        self.format
    }

    /// Export the project geometry; returns the path the application wrote.
    pub fn export(
        &self,
        api: &dyn GarmentApi,
        path: &Path,
        options: &ImportExportOptions,
    ) -> Result<PathBuf, ApiError> {
        tracing::debug!(format = %self.format, path = %path.display(), "Exporting");
        match self.call {
            ExportCall::Alembic => api.export_alembic(path, options),
            ExportCall::Fbx => api.export_fbx(path, options),
            ExportCall::Obj => api.export_obj(path, options),
        }
    }
}

/// Pick the mesh exporter for an extension. `.zfab` is not a mesh export.
pub fn select_exporter(extension: &str) -> Result<MeshExporter, FormatError> {
    let format = MeshFormat::from_extension(extension)?;
    let call = match format {
        MeshFormat::Alembic => ExportCall::Alembic,
        MeshFormat::Fbx => ExportCall::Fbx,
        MeshFormat::Obj => ExportCall::Obj,
        MeshFormat::Zfab => {
            return Err(FormatError::Unsupported {
                extension: extension.to_string(),
            })
        }
    };
    Ok(MeshExporter { format, call })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ApiCall, RecordingGarmentApi};

    #[test]
    fn test_closed_set_dispatch() {
        let abc = select_handler(".abc").unwrap();
        let fbx = select_handler(".fbx").unwrap();
        let obj = select_handler(".obj").unwrap();
        let zfab = select_handler(".zfab").unwrap();

        assert_eq!(abc.format(), MeshFormat::Alembic);
        assert_eq!(fbx.format(), MeshFormat::Fbx);
        assert_eq!(obj.format(), MeshFormat::Obj);
        assert_eq!(zfab.format(), MeshFormat::Zfab);
        assert_ne!(abc, fbx);
        assert_ne!(fbx, obj);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = select_handler(".xyz").unwrap_err();
        assert!(matches!(err, FormatError::Unsupported { ref extension } if extension == ".xyz"));
        assert!(select_handler("").is_err());
    }

    #[test]
    fn test_extension_normalization() {
        assert_eq!(select_handler("ABC").unwrap().format(), MeshFormat::Alembic);
        assert_eq!(
            MeshFormat::from_path(Path::new("/cache/shirt.Fbx")).unwrap(),
            MeshFormat::Fbx
        );
        assert!(MeshFormat::from_path(Path::new("/cache/noext")).is_err());
    }

    #[test]
    fn test_options_per_format() {
        assert!(matches!(
            select_handler(".abc").unwrap().options(),
            ImportOptions::Alembic(_)
        ));
        assert!(matches!(
            select_handler(".obj").unwrap().options(),
            ImportOptions::Mesh(_)
        ));
        assert_eq!(select_handler(".zfab").unwrap().options(), ImportOptions::Fabric);
    }

    #[test]
    fn test_import_calls_matching_api() {
        let api = RecordingGarmentApi::new();
        let path = Path::new("/cache/shirt.fbx");

        let imported = select_handler(".fbx").unwrap().import(&api, path).unwrap();

        assert_eq!(imported, Imported::Mesh);
        assert_eq!(api.calls(), vec![ApiCall::ImportFbx(path.to_path_buf())]);
    }

    #[test]
    fn test_fabric_import_returns_slot() {
        let api = RecordingGarmentApi::new();
        let imported = select_handler("zfab")
            .unwrap()
            .import(&api, Path::new("/lib/denim.zfab"))
            .unwrap();

        assert!(matches!(imported, Imported::Fabric(_)));
    }

    #[test]
    fn test_exporter_rejects_fabric() {
        assert!(select_exporter(".zfab").is_err());
        assert_eq!(select_exporter("obj").unwrap().format(), MeshFormat::Obj);
    }
}
