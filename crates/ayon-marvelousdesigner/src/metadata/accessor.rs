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

use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::AccessorError;

/// Raw access to the metadata string stored in the current project.
///
/// This is the only persistence boundary the registry uses. Inside the
/// application it wraps the garment metadata API; outside it a sidecar file
/// ([`FileAccessor`]) or memory ([`InMemoryAccessor`]) stands in.
pub trait MetadataAccessor: Send + Sync {
    /// Return the stored metadata string, or `None` if nothing was stored yet.
    fn get_raw_metadata(&self) -> Result<Option<String>, AccessorError>;

    /// Replace the stored metadata string.
    fn set_raw_metadata(&self, raw: &str) -> Result<(), AccessorError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    raw: Option<String>,
    writes: usize,
}

/// Accessor holding the metadata string in memory.
#[derive(Debug, Default)]
pub struct InMemoryAccessor {
    state: Mutex<MemoryState>,
}

impl InMemoryAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing raw metadata string.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                raw: Some(raw.into()),
                writes: 0,
            }),
        }
    }

    /// Current raw string, as last written.
    pub fn raw(&self) -> Option<String> {
        self.state.lock().raw.clone()
    }

    /// Number of `set_raw_metadata` calls received so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }
}

impl MetadataAccessor for InMemoryAccessor {
    fn get_raw_metadata(&self) -> Result<Option<String>, AccessorError> {
        Ok(self.state.lock().raw.clone())
    }

    fn set_raw_metadata(&self, raw: &str) -> Result<(), AccessorError> {
        let mut state = self.state.lock();
        state.raw = Some(raw.to_string());
        state.writes += 1;
        Ok(())
    }
}

/// Accessor backed by a JSON sidecar file.
///
/// A missing file reads as "no metadata yet".
#[derive(Debug, Clone)]
pub struct FileAccessor {
    path: PathBuf,
}

impl FileAccessor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sidecar next to a workfile: `scene.zprj` -> `scene.zprj.ayon.json`.
    pub fn for_workfile(workfile: &Path) -> Self {
        let mut name = workfile.as_os_str().to_os_string();
        name.push(".ayon.json");
        Self::new(PathBuf::from(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetadataAccessor for FileAccessor {
    fn get_raw_metadata(&self) -> Result<Option<String>, AccessorError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(AccessorError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn set_raw_metadata(&self, raw: &str) -> Result<(), AccessorError> {
        fs::write(&self.path, raw).map_err(|source| AccessorError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
