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

//! # Creators
//!
//! Creators turn an artist's "publish this" request into an instance record
//! stored in the project metadata, and adopt stored records back into a
//! [`CreateContext`] when the publisher opens.
//!
//! A stored record belongs to a creator when its `creator_identifier` matches,
//! or, for records written by older integrations, when its `productType`
//! equals the creator's base product type.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::CreateError;
use crate::host::MarvelousDesignerHost;
use crate::instance::{keys, str_field, InstanceData, AYON_INSTANCE_ID};

/// Product name for a type and variant, e.g. `workfileMain`.
pub fn get_product_name(product_type: &str, variant: &str) -> String {
    let mut chars = variant.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", product_type, first.to_uppercase(), chars.as_str()),
        None => product_type.to_string(),
    }
}

/// An instance as seen by the publisher session.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedInstance {
    instance_id: String,
    data: InstanceData,
}

impl CreatedInstance {
    /// Build a new instance, filling the identity keys and a fresh id.
    pub fn new(
        creator_identifier: &str,
        product_base_type: &str,
        product_type: &str,
        product_name: &str,
        mut data: InstanceData,
    ) -> Self {
        let instance_id = Uuid::new_v4().to_string();
        data.insert(keys::ID.into(), AYON_INSTANCE_ID.into());
        data.insert(keys::INSTANCE_ID.into(), instance_id.clone().into());
        data.insert(keys::CREATOR_IDENTIFIER.into(), creator_identifier.into());
        data.insert(keys::PRODUCT_TYPE.into(), product_type.into());
        data.insert(keys::PRODUCT_BASE_TYPE.into(), product_base_type.into());
        data.insert(keys::PRODUCT_NAME.into(), product_name.into());
        data.entry(keys::ACTIVE).or_insert(Value::Bool(true));
        Self { instance_id, data }
    }

    /// Wrap a stored record.
    ///
    /// # Errors
    ///
    /// [`CreateError::MissingField`] if the record has no `instance_id`.
    pub fn from_existing(data: InstanceData) -> Result<Self, CreateError> {
        let instance_id = str_field(&data, keys::INSTANCE_ID)
            .ok_or(CreateError::MissingField {
                key: keys::INSTANCE_ID,
            })?
            .to_string();
        Ok(Self { instance_id, data })
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn creator_identifier(&self) -> Option<&str> {
        str_field(&self.data, keys::CREATOR_IDENTIFIER)
    }

    pub fn product_name(&self) -> Option<&str> {
        str_field(&self.data, keys::PRODUCT_NAME)
    }

    pub fn product_base_type(&self) -> Option<&str> {
        str_field(&self.data, keys::PRODUCT_BASE_TYPE)
    }

    pub fn folder_path(&self) -> Option<&str> {
        str_field(&self.data, keys::FOLDER_PATH)
    }

    pub fn task(&self) -> Option<&str> {
        str_field(&self.data, keys::TASK)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.data.insert(key.to_string(), value.into());
    }

    pub fn is_active(&self) -> bool {
        self.data
            .get(keys::ACTIVE)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Data persisted in the project metadata.
    pub fn data_to_store(&self) -> InstanceData {
        self.data.clone()
    }
}

/// Artist choices made before creating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreCreateOptions {
    pub use_selection: bool,
}

/// A request to create one instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateRequest {
    pub product_name: String,
    pub variant: String,
    /// Extra instance data; `folderPath` and `task` default to the context
    pub data: InstanceData,
    pub pre_create: PreCreateOptions,
}

impl CreateRequest {
    pub fn new(product_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            variant: variant.into(),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: InstanceData) -> Self {
        self.data = data;
        self
    }

    pub fn use_selection(mut self, use_selection: bool) -> Self {
        self.pre_create.use_selection = use_selection;
        self
    }
}

/// Instances of one publisher session and the context they were created in.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateContext {
    pub project_name: String,
    pub folder_path: String,
    pub task_name: String,
    instances: Vec<CreatedInstance>,
}

impl CreateContext {
    pub fn new(
        project_name: impl Into<String>,
        folder_path: impl Into<String>,
        task_name: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            folder_path: folder_path.into(),
            task_name: task_name.into(),
            instances: Vec::new(),
        }
    }

    pub fn instances(&self) -> &[CreatedInstance] {
        &self.instances
    }

    pub fn get(&self, instance_id: &str) -> Option<&CreatedInstance> {
        self.instances
            .iter()
            .find(|instance| instance.instance_id() == instance_id)
    }

    pub fn get_mut(&mut self, instance_id: &str) -> Option<&mut CreatedInstance> {
        self.instances
            .iter_mut()
            .find(|instance| instance.instance_id() == instance_id)
    }

    /// Add an instance. Returns `false` if one with the same id is present.
    pub fn creator_adds_instance(&mut self, instance: CreatedInstance) -> bool {
        if self.get(instance.instance_id()).is_some() {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn remove_instance(&mut self, instance_id: &str) -> Option<CreatedInstance> {
        let index = self
            .instances
            .iter()
            .position(|instance| instance.instance_id() == instance_id)?;
        Some(self.instances.remove(index))
    }

    /// Drop session instances and let every creator collect stored ones.
    pub fn reset(
        &mut self,
        host: &MarvelousDesignerHost,
        creators: &[Arc<dyn Creator>],
    ) -> Result<(), CreateError> {
        self.instances.clear();
        for creator in creators {
            creator.collect_instances(host, self)?;
        }
        Ok(())
    }

    /// Run every auto creator.
    pub fn create_auto(
        &mut self,
        host: &MarvelousDesignerHost,
        creators: &[Arc<dyn Creator>],
    ) -> Result<(), CreateError> {
        for creator in creators.iter().filter(|creator| creator.is_auto()) {
            creator.create(host, self, &CreateRequest::default())?;
        }
        Ok(())
    }
}

/// Creates and manages instances of one product type.
pub trait Creator: Send + Sync {
    fn identifier(&self) -> &str;

    fn label(&self) -> &str;

    fn product_base_type(&self) -> &str;

    fn icon(&self) -> &str;

    /// Auto creators run without artist input.
    fn is_auto(&self) -> bool {
        false
    }

    /// Create an instance, store it and add it to `context`. Returns its id.
    fn create(
        &self,
        host: &MarvelousDesignerHost,
        context: &mut CreateContext,
        request: &CreateRequest,
    ) -> Result<String, CreateError>;

    /// Adopt stored records belonging to this creator. Returns how many.
    fn collect_instances(
        &self,
        host: &MarvelousDesignerHost,
        context: &mut CreateContext,
    ) -> Result<usize, CreateError> {
        let mut adopted = 0;
        for data in host.registry().get_instance_values()? {
            if !belongs_to(self.identifier(), self.product_base_type(), &data) {
                continue;
            }
            match CreatedInstance::from_existing(data) {
                Ok(instance) => {
                    if context.creator_adds_instance(instance) {
                        adopted += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(creator = %self.identifier(), "Skipping stored instance: {}", e);
                }
            }
        }
        Ok(adopted)
    }

    /// Persist changed instances with a single merge write.
    fn update_instances(
        &self,
        host: &MarvelousDesignerHost,
        instances: &[&CreatedInstance],
    ) -> Result<(), CreateError> {
        let batch: BTreeMap<String, InstanceData> = instances
            .iter()
            .map(|instance| (instance.instance_id().to_string(), instance.data_to_store()))
            .collect();
        host.registry().set_instances(batch, true)?;
        Ok(())
    }

    fn remove_instances(
        &self,
        host: &MarvelousDesignerHost,
        context: &mut CreateContext,
        instance_ids: &[String],
    ) -> Result<(), CreateError> {
        for instance_id in instance_ids {
            host.registry().remove_instance(instance_id)?;
            context.remove_instance(instance_id);
        }
        Ok(())
    }
}

fn belongs_to(identifier: &str, product_base_type: &str, data: &Map<String, Value>) -> bool {
    str_field(data, keys::CREATOR_IDENTIFIER) == Some(identifier)
        || str_field(data, keys::PRODUCT_TYPE) == Some(product_base_type)
}

/// Store a new instance and add it to the session.
fn store_new(
    host: &MarvelousDesignerHost,
    context: &mut CreateContext,
    instance: CreatedInstance,
) -> Result<String, CreateError> {
    let instance_id = instance.instance_id().to_string();
    host.registry()
        .set_instance(&instance_id, instance.data_to_store(), false)?;
    tracing::info!(
        instance_id = %instance_id,
        product_name = instance.product_name().unwrap_or_default(),
        "Created instance"
    );
    context.creator_adds_instance(instance);
    Ok(instance_id)
}

fn instance_from_request(
    identifier: &str,
    product_base_type: &str,
    context: &CreateContext,
    request: &CreateRequest,
    mut data: InstanceData,
) -> CreatedInstance {
    data.insert(keys::VARIANT.into(), request.variant.clone().into());
    data.entry(keys::FOLDER_PATH)
        .or_insert_with(|| context.folder_path.clone().into());
    data.entry(keys::TASK)
        .or_insert_with(|| context.task_name.clone().into());
    let product_type = str_field(&data, keys::PRODUCT_TYPE)
        .unwrap_or(product_base_type)
        .to_string();
    CreatedInstance::new(
        identifier,
        product_base_type,
        &product_type,
        &request.product_name,
        data,
    )
}

/// Creator for plain geometry products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCreator {
    identifier: &'static str,
    label: &'static str,
    product_base_type: &'static str,
    icon: &'static str,
}

impl ProductCreator {
    pub fn model() -> Self {
        Self {
            identifier: "io.ayon.creators.marvelousdesigner.model",
            label: "Model",
            product_base_type: "model",
            icon: "cube",
        }
    }

    pub fn pointcache() -> Self {
        Self {
            identifier: "io.ayon.creators.marvelousdesigner.pointcache",
            label: "Point Cache",
            product_base_type: "pointcache",
            icon: "pagelines",
        }
    }
}

impl Creator for ProductCreator {
    fn identifier(&self) -> &str {
        self.identifier
    }

    fn label(&self) -> &str {
        self.label
    }

    fn product_base_type(&self) -> &str {
        self.product_base_type
    }

    fn icon(&self) -> &str {
        self.icon
    }

    fn create(
        &self,
        host: &MarvelousDesignerHost,
        context: &mut CreateContext,
        request: &CreateRequest,
    ) -> Result<String, CreateError> {
        let instance = instance_from_request(
            self.identifier,
            self.product_base_type,
            context,
            request,
            request.data.clone(),
        );
        store_new(host, context, instance)
    }
}

/// Creator for fabric products; the instance points at a fabric slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZfabCreator;

impl ZfabCreator {
    pub const IDENTIFIER: &'static str = "io.ayon.creators.marvelousdesigner.zfab";

    /// Slot used when the artist did not pick a fabric.
    pub const DEFAULT_FABRIC_INDEX: i64 = 1;
}

impl Creator for ZfabCreator {
    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn label(&self) -> &str {
        "Zfab"
    }

    fn product_base_type(&self) -> &str {
        "zfab"
    }

    fn icon(&self) -> &str {
        "picture-o"
    }

    fn create(
        &self,
        host: &MarvelousDesignerHost,
        context: &mut CreateContext,
        request: &CreateRequest,
    ) -> Result<String, CreateError> {
        let fabric_index = if request.pre_create.use_selection {
            host.api().current_fabric_index()?
        } else {
            Self::DEFAULT_FABRIC_INDEX
        };

        let mut data = request.data.clone();
        data.insert(keys::FABRIC_INDEX.into(), fabric_index.into());
        if let Some(fabric_name) = host.api().fabric_name(fabric_index)? {
            data.insert(keys::FABRIC_NAME.into(), fabric_name.into());
        }

        let instance =
            instance_from_request(Self::IDENTIFIER, "zfab", context, request, data);
        store_new(host, context, instance)
    }
}

/// Auto creator keeping exactly one workfile instance per project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkfileCreator {
    pub default_variant: String,
}

impl Default for WorkfileCreator {
    fn default() -> Self {
        Self {
            default_variant: "Main".to_string(),
        }
    }
}

impl WorkfileCreator {
    pub const IDENTIFIER: &'static str = "io.ayon.creators.marvelousdesigner.workfile";
}

impl Creator for WorkfileCreator {
    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn label(&self) -> &str {
        "Workfile"
    }

    fn product_base_type(&self) -> &str {
        "workfile"
    }

    fn icon(&self) -> &str {
        "document"
    }

    fn is_auto(&self) -> bool {
        true
    }

    fn create(
        &self,
        host: &MarvelousDesignerHost,
        context: &mut CreateContext,
        _request: &CreateRequest,
    ) -> Result<String, CreateError> {
        let variant = self.default_variant.as_str();
        let product_name = get_product_name("workfile", variant);
        let folder_path = context.folder_path.clone();
        let task_name = context.task_name.clone();

        let existing = context
            .instances()
            .iter()
            .find(|instance| instance.creator_identifier() == Some(Self::IDENTIFIER))
            .map(|instance| instance.instance_id().to_string());

        let Some(instance_id) = existing else {
            tracing::info!("Auto-creating workfile instance...");
            let mut data = Map::new();
            data.insert(keys::FOLDER_PATH.into(), folder_path.into());
            data.insert(keys::TASK.into(), task_name.into());
            data.insert(keys::VARIANT.into(), variant.into());
            let instance =
                CreatedInstance::new(Self::IDENTIFIER, "workfile", "workfile", &product_name, data);
            return store_new(host, context, instance);
        };

        let instance = context
            .get_mut(&instance_id)
            .ok_or(CreateError::MissingField {
                key: keys::INSTANCE_ID,
            })?;
        if instance.folder_path() != Some(folder_path.as_str())
            || instance.task() != Some(task_name.as_str())
        {
            tracing::debug!(folder_path = %folder_path, task = %task_name, "Updating workfile instance context");
            instance.set(keys::FOLDER_PATH, folder_path);
            instance.set(keys::TASK, task_name);
            instance.set(keys::PRODUCT_NAME, product_name);
        }
        host.registry()
            .set_instance(&instance_id, instance.data_to_store(), false)?;
        Ok(instance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{InMemoryAccessor, MetadataRegistry};
    use crate::testing::RecordingGarmentApi;
    use serde_json::json;

    fn host_with(api: RecordingGarmentApi) -> MarvelousDesignerHost {
        let registry = MetadataRegistry::new(Arc::new(InMemoryAccessor::new()));
        MarvelousDesignerHost::new(registry, Arc::new(api))
    }

    fn context() -> CreateContext {
        CreateContext::new("demo", "/chars/hero", "cloth")
    }

    fn obj(value: Value) -> InstanceData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_product_name() {
        assert_eq!(get_product_name("workfile", "Main"), "workfileMain");
        assert_eq!(get_product_name("model", "shirt"), "modelShirt");
        assert_eq!(get_product_name("model", ""), "model");
    }

    #[test]
    fn test_model_create_persists_instance() {
        let host = host_with(RecordingGarmentApi::new());
        let mut ctx = context();

        let id = ProductCreator::model()
            .create(&host, &mut ctx, &CreateRequest::new("modelShirt", "shirt"))
            .unwrap();

        let stored = &host.registry().get_instances().unwrap()[&id];
        assert_eq!(stored["id"], json!("ayon.create.instance"));
        assert_eq!(stored["instance_id"], json!(id));
        assert_eq!(stored["productType"], json!("model"));
        assert_eq!(stored["productBaseType"], json!("model"));
        assert_eq!(stored["productName"], json!("modelShirt"));
        assert_eq!(stored["creator_identifier"], json!("io.ayon.creators.marvelousdesigner.model"));
        assert_eq!(stored["folderPath"], json!("/chars/hero"));
        assert_eq!(stored["task"], json!("cloth"));
        assert_eq!(stored["variant"], json!("shirt"));
        assert_eq!(stored["active"], json!(true));
        assert_eq!(ctx.instances().len(), 1);
    }

    #[test]
    fn test_collect_adopts_by_identifier_or_product_type() {
        let host = host_with(RecordingGarmentApi::new());
        let registry = host.registry();
        registry
            .set_instance(
                "a",
                obj(json!({"instance_id": "a", "creator_identifier": "io.ayon.creators.marvelousdesigner.model"})),
                false,
            )
            .unwrap();
        registry
            .set_instance("b", obj(json!({"instance_id": "b", "productType": "model"})), false)
            .unwrap();
        registry
            .set_instance("c", obj(json!({"instance_id": "c", "productType": "zfab"})), false)
            .unwrap();
        registry
            .set_instance("d", obj(json!({"productType": "model"})), false)
            .unwrap();

        let mut ctx = context();
        let adopted = ProductCreator::model()
            .collect_instances(&host, &mut ctx)
            .unwrap();

        assert_eq!(adopted, 2);
        let ids: Vec<_> = ctx.instances().iter().map(|i| i.instance_id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_zfab_uses_selected_fabric() {
        let api = RecordingGarmentApi::new()
            .with_fabric(1, "Default")
            .with_fabric(3, "Denim");
        api.set_current_fabric(3);
        let host = host_with(api);
        let mut ctx = context();

        let selected = ZfabCreator
            .create(
                &host,
                &mut ctx,
                &CreateRequest::new("zfabDenim", "denim").use_selection(true),
            )
            .unwrap();
        let unselected = ZfabCreator
            .create(&host, &mut ctx, &CreateRequest::new("zfabDefault", "default"))
            .unwrap();

        let instances = host.registry().get_instances().unwrap();
        assert_eq!(instances[&selected]["fabricIndex"], json!(3));
        assert_eq!(instances[&selected]["fabricName"], json!("Denim"));
        assert_eq!(instances[&unselected]["fabricIndex"], json!(1));
        assert_eq!(instances[&unselected]["fabricName"], json!("Default"));
    }

    #[test]
    fn test_workfile_instance_created_once() {
        let host = host_with(RecordingGarmentApi::new());
        let creators: Vec<Arc<dyn Creator>> = vec![
            Arc::new(ProductCreator::model()),
            Arc::new(WorkfileCreator::default()),
        ];
        let mut ctx = context();

        ctx.create_auto(&host, &creators).unwrap();
        ctx.create_auto(&host, &creators).unwrap();

        let instances = host.registry().get_instances().unwrap();
        assert_eq!(instances.len(), 1);
        let stored = instances.values().next().unwrap();
        assert_eq!(stored["productName"], json!("workfileMain"));
        assert_eq!(stored["variant"], json!("Main"));
    }

    #[test]
    fn test_workfile_instance_follows_context() {
        let host = host_with(RecordingGarmentApi::new());
        let creator = WorkfileCreator::default();
        let mut ctx = context();
        let id = creator
            .create(&host, &mut ctx, &CreateRequest::default())
            .unwrap();

        let mut moved = CreateContext::new("demo", "/chars/villain", "cloth");
        let creators: Vec<Arc<dyn Creator>> = vec![Arc::new(creator.clone())];
        moved.reset(&host, &creators).unwrap();
        let same_id = creator
            .create(&host, &mut moved, &CreateRequest::default())
            .unwrap();

        assert_eq!(same_id, id);
        let stored = &host.registry().get_instances().unwrap()[&id];
        assert_eq!(stored["folderPath"], json!("/chars/villain"));
    }

    #[test]
    fn test_update_and_remove_instances() {
        let host = host_with(RecordingGarmentApi::new());
        let creator = ProductCreator::pointcache();
        let mut ctx = context();
        let id = creator
            .create(&host, &mut ctx, &CreateRequest::new("pointcacheShirt", "shirt"))
            .unwrap();

        ctx.get_mut(&id).unwrap().set(keys::ACTIVE, false);
        let changed = ctx.get(&id).unwrap().clone();
        creator.update_instances(&host, &[&changed]).unwrap();
        assert_eq!(
            host.registry().get_instances().unwrap()[&id]["active"],
            json!(false)
        );

        creator
            .remove_instances(&host, &mut ctx, &[id.clone()])
            .unwrap();
        assert!(host.registry().get_instances().unwrap().is_empty());
        assert!(ctx.get(&id).is_none());
    }
}
