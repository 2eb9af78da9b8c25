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

//! # AYON Marvelous Designer
//!
//! Host integration connecting Marvelous Designer to the AYON pipeline.
//!
//! The integration keeps all pipeline state inside the current project file.
//! Marvelous Designer exposes a single metadata string per project; this crate
//! stores one JSON document in it and layers three logical stores on top:
//!
//! - **containers**: assets loaded into the project (`ayon_containers`)
//! - **instances**: products to be published (`ayon_instances`)
//! - **context data**: publish session context (`ayon_context_data`)
//!
//! ## Key Components
//!
//! - [`metadata`]: the [`MetadataRegistry`] and the [`MetadataAccessor`] seam
//! - [`format`]: closed import/export dispatch for `.abc`, `.fbx`, `.obj`, `.zfab`
//! - [`host`]: capability traits and the [`MarvelousDesignerHost`]
//! - [`plugins`]: creators, loaders and publish plugins
//! - [`hooks`]: launch-time workfile resolution
//! - [`session`]: the tools dialog session
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ayon_marvelousdesigner::metadata::{InMemoryAccessor, MetadataRegistry};
//! use serde_json::json;
//!
//! let registry = MetadataRegistry::new(Arc::new(InMemoryAccessor::new()));
//! let data = json!({"productType": "model"}).as_object().cloned().unwrap();
//! registry.set_instance("abc", data, false).unwrap();
//! assert_eq!(registry.get_instances().unwrap().len(), 1);
//! ```

pub mod api;
pub mod container;
pub mod error;
pub mod format;
pub mod hooks;
pub mod host;
pub mod instance;
pub mod metadata;
pub mod plugins;
pub mod session;
pub mod settings;
pub mod testing;

pub use api::{FabricIndex, GarmentApi};
pub use container::{Container, AYON_CONTAINER_ID, CONTAINER_SCHEMA};
pub use error::{
    AccessorError, ApiError, CreateError, FormatError, HookError, LoadError, MetadataError,
    PublishError,
};
pub use format::{select_handler, FormatHandler, MeshFormat};
pub use host::{HostBase, LoadHost, MarvelousDesignerHost, PublishHost, WorkfileHost};
pub use instance::{InstanceData, InstanceMap};
pub use metadata::{
    FileAccessor, ImprintOutcome, InMemoryAccessor, MetadataAccessor, MetadataDocument,
    MetadataRegistry,
};
pub use settings::MdSettings;

/// Host name used when registering with the pipeline.
pub const HOST_NAME: &str = "marvelousdesigner";

/// Workfile extensions handled by the host.
pub const WORKFILE_EXTENSIONS: &[&str] = &[".zprj"];
