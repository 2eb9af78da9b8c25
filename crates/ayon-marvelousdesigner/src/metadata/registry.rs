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

use serde_json::{Map, Value};
use std::sync::Arc;

use super::{
    MetadataAccessor, MetadataDocument, AYON_CONTAINERS, AYON_CONTEXT_DATA, AYON_INSTANCES,
};
use crate::container::Container;
use crate::error::MetadataError;
use crate::instance::{merge_into, InstanceData, InstanceMap};

/// Result of patching a container by object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImprintOutcome {
    /// The first matching container was patched and the document written
    Applied,
    /// No container had that object name; nothing was written
    Missing,
}

impl ImprintOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ImprintOutcome::Applied)
    }
}

/// Read-modify-write store over the project metadata document.
///
/// Every operation reads the whole document through the accessor, changes one
/// section and writes the whole document back via [`MetadataRegistry::set_section`].
/// Nothing is cached between calls, so the project file stays the single
/// source of truth.
#[derive(Clone)]
pub struct MetadataRegistry {
    accessor: Arc<dyn MetadataAccessor>,
}

impl std::fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataRegistry").finish_non_exhaustive()
    }
}

impl MetadataRegistry {
    pub fn new(accessor: Arc<dyn MetadataAccessor>) -> Self {
        Self { accessor }
    }

    pub fn accessor(&self) -> &Arc<dyn MetadataAccessor> {
        &self.accessor
    }

    /// Fetch and parse the current document.
    ///
    /// # Errors
    ///
    /// * [`MetadataError::Malformed`] if the stored string is not a JSON object
    /// * [`MetadataError::Accessor`] if the accessor fails
    pub fn get_document(&self) -> Result<MetadataDocument, MetadataError> {
        let raw = self.accessor.get_raw_metadata()?;
        MetadataDocument::parse(raw.as_deref())
    }

    /// Replace one top-level section, keeping every other key.
    ///
    /// This is the only write path of the registry.
    pub fn set_section(&self, section: &str, value: Value) -> Result<(), MetadataError> {
        let mut document = self.get_document()?;
        document.set(section, value);
        let raw = document.to_json_string()?;
        self.accessor.set_raw_metadata(&raw)?;
        tracing::debug!(section = %section, bytes = raw.len(), "Wrote metadata section");
        Ok(())
    }

    /// All containers in stored order. Records that do not parse are skipped.
    pub fn list_containers(&self) -> Result<Vec<Container>, MetadataError> {
        let containers = self
            .get_document()?
            .containers()?
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(container) => Some(container),
                Err(e) => {
                    tracing::warn!(index, "Skipping unreadable container record: {}", e);
                    None
                }
            })
            .collect();
        Ok(containers)
    }

    /// Append a container. Duplicate object names are accepted.
    pub fn add_container(&self, container: &Container) -> Result<(), MetadataError> {
        let mut containers = self.get_document()?.containers()?;
        containers.push(container.to_value()?);
        self.set_section(AYON_CONTAINERS, Value::Array(containers))?;
        tracing::debug!(object_name = %container.object_name, "Containerised");
        Ok(())
    }

    /// Merge `patch` into the first container named `object_name`.
    ///
    /// When nothing matches, a warning is logged, the document is left
    /// untouched and [`ImprintOutcome::Missing`] is returned.
    pub fn update_container_fields(
        &self,
        object_name: &str,
        patch: Map<String, Value>,
    ) -> Result<ImprintOutcome, MetadataError> {
        let mut containers = self.get_document()?.containers()?;

        let target = containers
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|container| {
                container.get("objectName").and_then(Value::as_str) == Some(object_name)
            });

        match target {
            Some(container) => {
                merge_into(container, patch);
                self.set_section(AYON_CONTAINERS, Value::Array(containers))?;
                Ok(ImprintOutcome::Applied)
            }
            None => {
                tracing::warn!(
                    object_name = %object_name,
                    "No container found for object {} to imprint data",
                    object_name
                );
                Ok(ImprintOutcome::Missing)
            }
        }
    }

    /// Drop every container named `object_name`. Returns how many were removed.
    pub fn remove_container(&self, object_name: &str) -> Result<usize, MetadataError> {
        let containers = self.get_document()?.containers()?;
        let before = containers.len();

        let kept: Vec<Value> = containers
            .into_iter()
            .filter(|container| {
                container.get("objectName").and_then(Value::as_str) != Some(object_name)
            })
            .collect();
        let removed = before - kept.len();

        self.set_section(AYON_CONTAINERS, Value::Array(kept))?;
        tracing::debug!(object_name = %object_name, removed, "Removed container data");
        Ok(removed)
    }

    pub fn get_instances(&self) -> Result<InstanceMap, MetadataError> {
        self.get_document()?.instances()
    }

    /// Instance records without their ids, skipping non-object entries.
    pub fn get_instance_values(&self) -> Result<Vec<InstanceData>, MetadataError> {
        Ok(self
            .get_instances()?
            .into_iter()
            .filter_map(|(_, value)| match value {
                Value::Object(data) => Some(data),
                _ => None,
            })
            .collect())
    }

    pub fn set_instance(
        &self,
        instance_id: &str,
        data: InstanceData,
        update: bool,
    ) -> Result<(), MetadataError> {
        self.set_instances([(instance_id.to_string(), data)], update)
    }

    /// Store a batch of instances with a single write.
    ///
    /// With `update`, each record is shallow-merged into the stored one (a
    /// missing record is inserted as given). Without it, records are replaced.
    pub fn set_instances<I>(&self, batch: I, update: bool) -> Result<(), MetadataError>
    where
        I: IntoIterator<Item = (String, InstanceData)>,
    {
        let mut instances = self.get_instances()?;

        for (instance_id, data) in batch {
            if update {
                if let Some(Value::Object(existing)) = instances.get_mut(&instance_id) {
                    merge_into(existing, data);
                    continue;
                }
            }
            instances.insert(instance_id, Value::Object(data));
        }

        self.set_section(AYON_INSTANCES, Value::Object(instances))
    }

    /// Delete an instance. Absent ids are not an error; the document is written either way.
    pub fn remove_instance(&self, instance_id: &str) -> Result<bool, MetadataError> {
        let mut instances = self.get_instances()?;
        let removed = instances.remove(instance_id).is_some();
        self.set_section(AYON_INSTANCES, Value::Object(instances))?;
        Ok(removed)
    }

    pub fn get_context_data(&self) -> Result<Map<String, Value>, MetadataError> {
        self.get_document()?.context_data()
    }

    /// Replace the whole context section. No merge.
    pub fn set_context_data(&self, data: Map<String, Value>) -> Result<(), MetadataError> {
        self.set_section(AYON_CONTEXT_DATA, Value::Object(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessorError;
    use crate::metadata::InMemoryAccessor;
    use serde_json::json;
    use tracing_test::traced_test;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn registry_with(raw: Option<&str>) -> (Arc<InMemoryAccessor>, MetadataRegistry) {
        let accessor = Arc::new(match raw {
            Some(raw) => InMemoryAccessor::with_raw(raw),
            None => InMemoryAccessor::new(),
        });
        let registry = MetadataRegistry::new(accessor.clone());
        (accessor, registry)
    }

    fn container(name: &str) -> Container {
        Container::new(name, None, "LoadPointCache", "rep", "demo")
    }

    #[test]
    fn test_empty_document_bootstrap() {
        let (accessor, registry) = registry_with(None);

        assert!(registry.list_containers().unwrap().is_empty());
        assert!(registry.get_instances().unwrap().is_empty());
        assert!(registry.get_context_data().unwrap().is_empty());
        assert_eq!(accessor.write_count(), 0);
    }

    #[test]
    fn test_malformed_document_propagates() {
        let (_, registry) = registry_with(Some("{oops"));

        assert!(matches!(
            registry.get_instances(),
            Err(MetadataError::Malformed { .. })
        ));
        assert!(registry.set_context_data(Map::new()).is_err());
    }

    #[test]
    fn test_set_section_round_trip() {
        let (_, registry) = registry_with(None);
        let value = json!([{"objectName": "a", "nested": {"list": [1, 2, 3]}}]);

        registry.set_section("custom", value.clone()).unwrap();

        assert_eq!(registry.get_document().unwrap().get("custom"), Some(&value));
    }

    #[test]
    fn test_unknown_keys_survive_writes() {
        let (accessor, registry) = registry_with(Some(r#"{"foo": 1}"#));

        registry
            .set_instance("id-1", obj(json!({"productType": "model"})), false)
            .unwrap();
        registry.add_container(&container("shirt")).unwrap();

        let raw = accessor.raw().unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["foo"], json!(1));
        assert_eq!(doc["ayon_instances"]["id-1"]["productType"], json!("model"));
    }

    #[test]
    fn test_instance_merge_semantics() {
        let (_, registry) = registry_with(None);
        registry
            .set_instance("id", obj(json!({"a": 1, "b": 2})), false)
            .unwrap();

        registry
            .set_instance("id", obj(json!({"b": 3, "c": 4})), true)
            .unwrap();
        assert_eq!(
            registry.get_instances().unwrap()["id"],
            json!({"a": 1, "b": 3, "c": 4})
        );

        registry
            .set_instance("id", obj(json!({"b": 3, "c": 4})), false)
            .unwrap();
        assert_eq!(registry.get_instances().unwrap()["id"], json!({"b": 3, "c": 4}));
    }

    #[test]
    fn test_update_inserts_missing_instance() {
        let (_, registry) = registry_with(None);
        registry
            .set_instance("new", obj(json!({"x": true})), true)
            .unwrap();

        assert_eq!(registry.get_instances().unwrap()["new"], json!({"x": true}));
    }

    #[test]
    fn test_set_instances_writes_once() {
        let (accessor, registry) = registry_with(None);
        let batch = vec![
            ("a".to_string(), obj(json!({"n": 1}))),
            ("b".to_string(), obj(json!({"n": 2}))),
            ("c".to_string(), obj(json!({"n": 3}))),
        ];

        registry.set_instances(batch, false).unwrap();

        assert_eq!(accessor.write_count(), 1);
        assert_eq!(registry.get_instances().unwrap().len(), 3);
    }

    #[test]
    fn test_remove_instance_is_idempotent() {
        let (accessor, registry) = registry_with(None);
        registry.set_instance("a", obj(json!({"n": 1})), false).unwrap();
        registry.set_instance("b", obj(json!({"n": 2})), false).unwrap();

        assert!(registry.remove_instance("a").unwrap());
        let once = accessor.raw();
        assert!(!registry.remove_instance("a").unwrap());

        assert_eq!(accessor.raw(), once);
        assert_eq!(registry.get_instances().unwrap().len(), 1);
    }

    #[test]
    fn test_instance_values_skip_non_objects() {
        let (_, registry) =
            registry_with(Some(r#"{"ayon_instances": {"a": {"n": 1}, "b": 5}}"#));

        let values = registry.get_instance_values().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["n"], json!(1));
    }

    #[test]
    fn test_duplicate_object_names_persist_and_remove_together() {
        let (_, registry) = registry_with(None);
        registry.add_container(&container("other")).unwrap();
        registry.add_container(&container("shirt")).unwrap();
        registry.add_container(&container("shirt")).unwrap();

        assert_eq!(registry.list_containers().unwrap().len(), 3);

        assert_eq!(registry.remove_container("shirt").unwrap(), 2);
        let remaining = registry.list_containers().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].object_name, "other");
    }

    #[traced_test]
    #[test]
    fn test_unreadable_container_record_is_skipped() {
        let good = container("shirt").to_value().unwrap();
        let raw = json!({
            "ayon_containers": [good, {"objectName": "bad", "representation": null}]
        })
        .to_string();
        let (accessor, registry) = registry_with(Some(&raw));

        let containers = registry.list_containers().unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].object_name, "shirt");
        assert!(logs_contain("Skipping unreadable container record"));

        // the bad record stays in the document untouched
        registry.add_container(&container("pants")).unwrap();
        let stored: Value = serde_json::from_str(&accessor.raw().unwrap()).unwrap();
        assert_eq!(stored["ayon_containers"].as_array().unwrap().len(), 3);
        assert_eq!(stored["ayon_containers"][1]["objectName"], "bad");
    }

    #[test]
    fn test_imprint_updates_first_match_only() {
        let (_, registry) = registry_with(None);
        registry.add_container(&container("shirt")).unwrap();
        registry.add_container(&container("shirt")).unwrap();

        let outcome = registry
            .update_container_fields("shirt", obj(json!({"representation": "rep-2"})))
            .unwrap();
        assert_eq!(outcome, ImprintOutcome::Applied);

        let containers = registry.list_containers().unwrap();
        assert_eq!(containers[0].representation, "rep-2");
        assert_eq!(containers[1].representation, "rep");
    }

    #[traced_test]
    #[test]
    fn test_imprint_missing_container_warns_without_writing() {
        let (accessor, registry) = registry_with(None);
        registry.add_container(&container("shirt")).unwrap();
        let before = accessor.raw();
        let writes = accessor.write_count();

        let outcome = registry
            .update_container_fields("nonexistent", obj(json!({"representation": "x"})))
            .unwrap();

        assert_eq!(outcome, ImprintOutcome::Missing);
        assert!(!outcome.is_applied());
        assert_eq!(accessor.raw(), before);
        assert_eq!(accessor.write_count(), writes);
        assert!(logs_contain("No container found for object nonexistent"));
    }

    #[test]
    fn test_context_data_is_replaced_not_merged() {
        let (_, registry) = registry_with(None);
        registry
            .set_context_data(obj(json!({"a": 1, "b": 2})))
            .unwrap();
        registry.set_context_data(obj(json!({"c": 3}))).unwrap();

        assert_eq!(
            Value::Object(registry.get_context_data().unwrap()),
            json!({"c": 3})
        );
    }

    struct FailingAccessor;

    impl MetadataAccessor for FailingAccessor {
        fn get_raw_metadata(&self) -> Result<Option<String>, AccessorError> {
            Ok(None)
        }

        fn set_raw_metadata(&self, _raw: &str) -> Result<(), AccessorError> {
            Err(AccessorError::Host("project is read-only".to_string()))
        }
    }

    #[test]
    fn test_accessor_failure_propagates() {
        let registry = MetadataRegistry::new(Arc::new(FailingAccessor));

        let err = registry.add_container(&container("shirt")).unwrap_err();
        assert!(matches!(err, MetadataError::Accessor(AccessorError::Host(_))));
        assert!(err.to_string().contains("read-only"));
    }
}
