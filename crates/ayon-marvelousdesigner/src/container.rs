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

//! Container records for assets loaded into the project.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::FabricIndex;
use crate::error::MetadataError;

/// Schema tag written on every container.
pub const CONTAINER_SCHEMA: &str = "ayon:container-3.0";

/// Marker identifying a record as a loaded container.
pub const AYON_CONTAINER_ID: &str = "ayon.load.container";

/// One loaded asset reference.
///
/// `object_name` is the lookup key for update and removal. It is not unique:
/// loading the same product twice yields two records with the same name, and
/// lookups match the first. Fields imprinted later (e.g. `filename`) are kept
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub schema: String,
    pub id: String,
    pub name: String,
    pub namespace: Option<String>,
    pub loader: String,
    /// Representation id in the asset backend; opaque here
    pub representation: String,
    pub project_name: String,
    #[serde(rename = "objectName")]
    pub object_name: String,
    #[serde(rename = "fabricIndex", skip_serializing_if = "Option::is_none")]
    pub fabric_index: Option<FabricIndex>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            schema: CONTAINER_SCHEMA.to_string(),
            id: AYON_CONTAINER_ID.to_string(),
            name: String::new(),
            namespace: None,
            loader: String::new(),
            representation: String::new(),
            project_name: String::new(),
            object_name: String::new(),
            fabric_index: None,
            extra: Map::new(),
        }
    }
}

impl Container {
    /// Build a container record. An empty namespace is stored as `null`.
    pub fn new(
        name: &str,
        namespace: Option<&str>,
        loader: &str,
        representation: &str,
        project_name: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            loader: loader.to_string(),
            representation: representation.to_string(),
            project_name: project_name.to_string(),
            object_name: name.to_string(),
            ..Self::default()
        }
    }

    /// Attach a fabric slot; the object name becomes `{name}_fabric_{index}`.
    pub fn with_fabric_index(mut self, index: FabricIndex) -> Self {
        self.object_name = fabric_object_name(&self.name, index);
        self.fabric_index = Some(index);
        self
    }

    /// String value of an imprinted field.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    pub fn to_value(&self) -> Result<Value, MetadataError> {
        serde_json::to_value(self).map_err(|source| MetadataError::Serialize { source })
    }
}

pub fn fabric_object_name(name: &str, index: FabricIndex) -> String {
    format!("{}_fabric_{}", name, index)
}
