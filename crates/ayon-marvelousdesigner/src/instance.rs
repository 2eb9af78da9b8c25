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

//! Instance records for publishable products.
//!
//! Instance data is free-form: creators own its shape. The keys below are the
//! ones this crate reads back.

use serde_json::{Map, Value};

/// Data of one instance as produced by its creator.
pub type InstanceData = Map<String, Value>;

/// Instances keyed by instance id.
pub type InstanceMap = Map<String, Value>;

/// Marker identifying a record as a publish instance.
pub const AYON_INSTANCE_ID: &str = "ayon.create.instance";

pub mod keys {
    pub const ID: &str = "id";
    pub const INSTANCE_ID: &str = "instance_id";
    pub const CREATOR_IDENTIFIER: &str = "creator_identifier";
    pub const PRODUCT_TYPE: &str = "productType";
    pub const PRODUCT_BASE_TYPE: &str = "productBaseType";
    pub const PRODUCT_NAME: &str = "productName";
    pub const FOLDER_PATH: &str = "folderPath";
    pub const TASK: &str = "task";
    pub const VARIANT: &str = "variant";
    pub const ACTIVE: &str = "active";
    pub const FABRIC_INDEX: &str = "fabricIndex";
    pub const FABRIC_NAME: &str = "fabricName";
    pub const EXPORT_OPTIONS: &str = "exportOptions";
    pub const PUBLISH_ATTRIBUTES: &str = "publish_attributes";
}

/// Shallow merge: keys in `patch` overwrite, other keys in `target` survive.
pub fn merge_into(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

/// String field of an instance record.
pub fn str_field<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut target = obj(json!({"a": 1, "b": {"x": 1, "y": 2}}));
        merge_into(&mut target, obj(json!({"b": {"x": 5}, "c": 3})));

        assert_eq!(
            Value::Object(target),
            json!({"a": 1, "b": {"x": 5}, "c": 3})
        );
    }

    #[test]
    fn test_str_field_ignores_non_strings() {
        let data = obj(json!({"productType": "model", "fabricIndex": 2}));
        assert_eq!(str_field(&data, keys::PRODUCT_TYPE), Some("model"));
        assert_eq!(str_field(&data, keys::FABRIC_INDEX), None);
        assert_eq!(str_field(&data, keys::TASK), None);
    }
}
