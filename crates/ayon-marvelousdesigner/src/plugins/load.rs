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

//! # Loaders
//!
//! Loaders bring a published representation into the open project and record
//! a [`Container`] for it so the scene inventory can update or remove it later.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::api::FabricIndex;
use crate::container::Container;
use crate::error::{FormatError, LoadError, MetadataError};
use crate::format::{select_handler, MeshFormat};
use crate::host::MarvelousDesignerHost;
use crate::metadata::MetadataRegistry;

/// What a loader needs to know about the representation being loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadContext {
    pub name: String,
    pub namespace: Option<String>,
    pub project_name: String,
    pub representation_id: String,
    pub filepath: PathBuf,
}

impl LoadContext {
    pub fn new(
        name: impl Into<String>,
        project_name: impl Into<String>,
        representation_id: impl Into<String>,
        filepath: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            project_name: project_name.into(),
            representation_id: representation_id.into(),
            filepath: filepath.into(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Record a loaded asset in the project metadata.
///
/// With a fabric index the container is keyed `{name}_fabric_{index}` so the
/// same fabric product can be loaded into several slots.
pub fn containerise(
    registry: &MetadataRegistry,
    context: &LoadContext,
    loader: &str,
    fabric_index: Option<FabricIndex>,
) -> Result<Container, MetadataError> {
    let mut container = Container::new(
        &context.name,
        context.namespace.as_deref(),
        loader,
        &context.representation_id,
        &context.project_name,
    );
    if let Some(index) = fabric_index {
        container = container.with_fabric_index(index);
    }
    registry.add_container(&container)?;
    Ok(container)
}

/// Loads representations of matching products into the project.
pub trait Loader: Send + Sync {
    /// Name stored in the container's `loader` field.
    fn name(&self) -> &str;

    fn label(&self) -> &str;

    /// Product types this loader accepts; `*` accepts all.
    fn product_types(&self) -> &[&'static str];

    fn representations(&self) -> &[&'static str];

    fn is_compatible(&self, product_type: &str, representation: &str) -> bool {
        let product_ok = self
            .product_types()
            .iter()
            .any(|accepted| *accepted == "*" || *accepted == product_type);
        product_ok
            && self
                .representations()
                .iter()
                .any(|accepted| *accepted == representation)
    }

    fn load(
        &self,
        host: &MarvelousDesignerHost,
        context: &LoadContext,
    ) -> Result<Container, LoadError>;

    fn update(
        &self,
        _host: &MarvelousDesignerHost,
        _container: &Container,
        _context: &LoadContext,
    ) -> Result<(), LoadError> {
        Err(LoadError::NotSupported {
            loader: self.name().to_string(),
            operation: "update",
        })
    }

    fn remove(
        &self,
        _host: &MarvelousDesignerHost,
        _container: &Container,
    ) -> Result<(), LoadError> {
        Err(LoadError::NotSupported {
            loader: self.name().to_string(),
            operation: "remove",
        })
    }
}

/// Imports Alembic, FBX and OBJ caches of any product type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointcacheLoader;

impl Loader for PointcacheLoader {
    fn name(&self) -> &str {
        "LoadPointCache"
    }

    fn label(&self) -> &str {
        "Load Pointcache"
    }

    fn product_types(&self) -> &[&'static str] {
        &["*"]
    }

    fn representations(&self) -> &[&'static str] {
        &["abc", "fbx", "obj"]
    }

    fn load(
        &self,
        host: &MarvelousDesignerHost,
        context: &LoadContext,
    ) -> Result<Container, LoadError> {
        let extension = extension_of(&context.filepath);
        let handler = select_handler(&extension)?;
        if handler.format() == MeshFormat::Zfab {
            return Err(FormatError::Unsupported { extension }.into());
        }

        handler.import(host.api(), &context.filepath)?;
        let container = containerise(host.registry(), context, self.name(), None)?;
        tracing::info!(
            object_name = %container.object_name,
            path = %context.filepath.display(),
            "Loaded pointcache"
        );
        Ok(container)
    }

    // Imported geometry cannot be removed through the application API; only
    // the tracking record goes away.
    fn remove(
        &self,
        host: &MarvelousDesignerHost,
        container: &Container,
    ) -> Result<(), LoadError> {
        host.registry().remove_container(&container.object_name)?;
        Ok(())
    }
}

/// Loads `.zfab` fabrics into fabric slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZfabLoader;

impl Loader for ZfabLoader {
    fn name(&self) -> &str {
        "LoadZfab"
    }

    fn label(&self) -> &str {
        "Load ZFab"
    }

    fn product_types(&self) -> &[&'static str] {
        &["zfab"]
    }

    fn representations(&self) -> &[&'static str] {
        &["zfab"]
    }

    fn load(
        &self,
        host: &MarvelousDesignerHost,
        context: &LoadContext,
    ) -> Result<Container, LoadError> {
        let fabric_index = host.api().add_fabric(&context.filepath)?;
        let container =
            containerise(host.registry(), context, self.name(), Some(fabric_index))?;
        tracing::info!(
            object_name = %container.object_name,
            fabric_index,
            "Loaded fabric"
        );
        Ok(container)
    }

    fn update(
        &self,
        host: &MarvelousDesignerHost,
        container: &Container,
        context: &LoadContext,
    ) -> Result<(), LoadError> {
        if let Some(index) = container.fabric_index {
            host.api().replace_fabric(index, &context.filepath)?;
        }

        let filename = context
            .filepath
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut patch = Map::new();
        patch.insert("filename".into(), Value::String(filename));
        patch.insert(
            "representation".into(),
            Value::String(context.representation_id.clone()),
        );
        host.registry()
            .update_container_fields(&container.object_name, patch)?;
        Ok(())
    }

    fn remove(
        &self,
        host: &MarvelousDesignerHost,
        container: &Container,
    ) -> Result<(), LoadError> {
        if let Some(index) = container.fabric_index {
            host.api().delete_fabric(index)?;
        }
        host.registry().remove_container(&container.object_name)?;
        Ok(())
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}
