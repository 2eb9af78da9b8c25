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

//! # Metadata Registry
//!
//! Pipeline state persisted inside the current project file.
//!
//! The application only offers "get string" / "set string" on the project
//! metadata, so every logical update round-trips the whole document:
//!
//! ```text
//! accessor.get_raw_metadata() -> parse -> mutate one section -> serialize -> accessor.set_raw_metadata()
//! ```
//!
//! The registry never caches the document between calls. Concurrent writers
//! race (last writer wins); callers rely on the host running pipeline actions
//! on a single thread.
//!
//! ## Key Components
//!
//! - [`MetadataAccessor`]: the persistence boundary
//! - [`MetadataDocument`]: the parsed JSON object
//! - [`MetadataRegistry`]: container, instance and context operations

mod accessor;
mod document;
mod registry;

pub use accessor::{FileAccessor, InMemoryAccessor, MetadataAccessor};
pub use document::MetadataDocument;
pub use registry::{ImprintOutcome, MetadataRegistry};

/// Section holding the ordered list of loaded containers.
pub const AYON_CONTAINERS: &str = "ayon_containers";

/// Section holding publishable instances keyed by instance id.
pub const AYON_INSTANCES: &str = "ayon_instances";

/// Section holding free-form publish context data.
pub const AYON_CONTEXT_DATA: &str = "ayon_context_data";
