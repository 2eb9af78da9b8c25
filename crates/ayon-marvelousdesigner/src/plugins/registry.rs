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

//! # Plugin Registry
//!
//! Global registry of creator, loader and publish plugin constructors.
//! [`crate::MarvelousDesignerHost::install`] fills it with the built-in
//! plugins; the pipeline looks plugins up here by identifier or name.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::create::{Creator, ProductCreator, WorkfileCreator, ZfabCreator};
use super::load::{Loader, PointcacheLoader, ZfabLoader};
use super::publish::{
    CollectCurrentFile, CollectExportOption, CollectWorkfile, ExtractModel, ExtractPointCache,
    ExtractZfab, IncrementWorkfileVersion, PublishPlugin, SaveCurrentWorkfile, ValidateNoFabric,
};

type CreatorConstructor = Box<dyn Fn() -> Arc<dyn Creator> + Send + Sync>;
type LoaderConstructor = Box<dyn Fn() -> Arc<dyn Loader> + Send + Sync>;
type PublishConstructor = Box<dyn Fn() -> Arc<dyn PublishPlugin> + Send + Sync>;

static CREATORS: Lazy<RwLock<HashMap<String, CreatorConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static LOADERS: Lazy<RwLock<HashMap<String, LoaderConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static PUBLISH_PLUGINS: Lazy<RwLock<HashMap<String, PublishConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a creator constructor under `identifier`.
pub fn register_creator_constructor<F>(identifier: impl Into<String>, constructor: F)
where
    F: Fn() -> Arc<dyn Creator> + Send + Sync + 'static,
{
    let identifier = identifier.into();
    CREATORS
        .write()
        .insert(identifier.clone(), Box::new(constructor));
    tracing::debug!("Registered creator: {}", identifier);
}

/// Register a creator instance directly.
pub fn register_creator<C: Creator + Clone + 'static>(creator: C) {
    let identifier = creator.identifier().to_string();
    register_creator_constructor(identifier, move || Arc::new(creator.clone()));
}

pub fn register_loader<L: Loader + Clone + 'static>(loader: L) {
    let name = loader.name().to_string();
    LOADERS.write().insert(
        name.clone(),
        Box::new(move || Arc::new(loader.clone()) as Arc<dyn Loader>),
    );
    tracing::debug!("Registered loader: {}", name);
}

pub fn register_publish_plugin<P: PublishPlugin + Clone + 'static>(plugin: P) {
    let name = plugin.name().to_string();
    PUBLISH_PLUGINS.write().insert(
        name.clone(),
        Box::new(move || Arc::new(plugin.clone()) as Arc<dyn PublishPlugin>),
    );
    tracing::debug!("Registered publish plugin: {}", name);
}

pub fn get_creator(identifier: &str) -> Option<Arc<dyn Creator>> {
    CREATORS.read().get(identifier).map(|constructor| constructor())
}

pub fn get_loader(name: &str) -> Option<Arc<dyn Loader>> {
    LOADERS.read().get(name).map(|constructor| constructor())
}

pub fn get_publish_plugin(name: &str) -> Option<Arc<dyn PublishPlugin>> {
    PUBLISH_PLUGINS.read().get(name).map(|constructor| constructor())
}

pub fn list_creators() -> Vec<String> {
    CREATORS.read().keys().cloned().collect()
}

pub fn list_loaders() -> Vec<String> {
    LOADERS.read().keys().cloned().collect()
}

pub fn list_publish_plugins() -> Vec<String> {
    PUBLISH_PLUGINS.read().keys().cloned().collect()
}

pub fn get_all_creators() -> Vec<Arc<dyn Creator>> {
    CREATORS.read().values().map(|constructor| constructor()).collect()
}

pub fn get_all_loaders() -> Vec<Arc<dyn Loader>> {
    LOADERS.read().values().map(|constructor| constructor()).collect()
}

/// All publish plugins, in no particular order; the runner sorts them.
pub fn get_all_publish_plugins() -> Vec<Arc<dyn PublishPlugin>> {
    PUBLISH_PLUGINS
        .read()
        .values()
        .map(|constructor| constructor())
        .collect()
}

pub fn is_creator_registered(identifier: &str) -> bool {
    CREATORS.read().contains_key(identifier)
}

pub fn is_loader_registered(name: &str) -> bool {
    LOADERS.read().contains_key(name)
}

pub fn is_publish_plugin_registered(name: &str) -> bool {
    PUBLISH_PLUGINS.read().contains_key(name)
}

/// Register every plugin shipped with the integration.
pub fn register_builtin_plugins() {
    register_creator(ProductCreator::model());
    register_creator(ProductCreator::pointcache());
    register_creator(ZfabCreator);
    register_creator(WorkfileCreator::default());

    register_loader(PointcacheLoader);
    register_loader(ZfabLoader);

    register_publish_plugin(CollectCurrentFile);
    register_publish_plugin(CollectWorkfile);
    register_publish_plugin(CollectExportOption);
    register_publish_plugin(ValidateNoFabric);
    register_publish_plugin(SaveCurrentWorkfile);
    register_publish_plugin(ExtractModel::alembic());
    register_publish_plugin(ExtractModel::obj());
    register_publish_plugin(ExtractModel::fbx());
    register_publish_plugin(ExtractPointCache::alembic());
    register_publish_plugin(ExtractPointCache::obj());
    register_publish_plugin(ExtractPointCache::fbx());
    register_publish_plugin(ExtractZfab);
    register_publish_plugin(IncrementWorkfileVersion);
}

/// Clear all registered plugins.
#[cfg(test)]
pub fn clear_plugins() {
    CREATORS.write().clear();
    LOADERS.write().clear();
    PUBLISH_PLUGINS.write().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_builtin_registration() {
        clear_plugins();
        register_builtin_plugins();

        assert_eq!(list_creators().len(), 4);
        assert!(is_loader_registered("LoadZfab"));
        assert!(!is_loader_registered("LoadAlembic"));
        assert_eq!(list_publish_plugins().len(), 13);

        let creator = get_creator("io.ayon.creators.marvelousdesigner.zfab").unwrap();
        assert_eq!(creator.product_base_type(), "zfab");
        assert_eq!(
            get_publish_plugin("ExtractObj").unwrap().label(),
            "Extract OBJ"
        );
    }

    #[test]
    #[serial]
    fn test_registration_is_idempotent() {
        clear_plugins();
        register_builtin_plugins();
        register_builtin_plugins();

        assert_eq!(get_all_creators().len(), 4);
        assert_eq!(get_all_loaders().len(), 2);
        assert_eq!(get_all_publish_plugins().len(), 13);
    }

    #[test]
    #[serial]
    fn test_unknown_lookups() {
        clear_plugins();
        assert!(get_creator("missing").is_none());
        assert!(get_loader("missing").is_none());
        assert!(get_publish_plugin("missing").is_none());
    }
}
