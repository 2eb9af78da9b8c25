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

//! # Plugins
//!
//! Pipeline plugins for Marvelous Designer products.
//!
//! - [`create`]: creators persisting publish instances (`model`, `pointcache`,
//!   `zfab`, `workfile`)
//! - [`load`]: loaders importing representations and recording containers
//! - [`publish`]: collectors, validators, extractors and integrators, plus a
//!   small runner ordering them
//! - [`registry`]: global plugin lookup filled by the host on install
//!
//! Plugins are stateless; every call receives the
//! [`MarvelousDesignerHost`](crate::MarvelousDesignerHost) it works against.

pub mod create;
pub mod load;
pub mod publish;
pub mod registry;

pub use create::{
    get_product_name, CreateContext, CreateRequest, CreatedInstance, Creator, PreCreateOptions,
    ProductCreator, WorkfileCreator, ZfabCreator,
};
pub use load::{containerise, LoadContext, Loader, PointcacheLoader, ZfabLoader};
pub use publish::{
    run_publish, version_up, ContextData, PluginResult, PublishContext, PublishInstance,
    PublishPlugin, Representation,
};
