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

use super::{AYON_CONTAINERS, AYON_CONTEXT_DATA, AYON_INSTANCES};
use crate::error::MetadataError;

/// The parsed metadata document.
///
/// Keeps every top-level key it was parsed with, known or not, so writing one
/// section never drops another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataDocument {
    root: Map<String, Value>,
}

impl MetadataDocument {
    /// Parse a raw metadata string. Absent or blank input is an empty document.
    pub fn parse(raw: Option<&str>) -> Result<Self, MetadataError> {
        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Self::default()),
        };

        let value: Value =
            serde_json::from_str(raw).map_err(|e| MetadataError::Malformed {
                reason: e.to_string(),
            })?;

        match value {
            Value::Object(root) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            other => Err(MetadataError::Malformed {
                reason: format!("expected a JSON object, found {}", json_type(&other)),
            }),
        }
    }

    pub fn to_json_string(&self) -> Result<String, MetadataError> {
        serde_json::to_string(&self.root).map_err(|source| MetadataError::Serialize { source })
    }

    pub fn get(&self, section: &str) -> Option<&Value> {
        self.root.get(section)
    }

    pub fn set(&mut self, section: &str, value: Value) {
        self.root.insert(section.to_string(), value);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }

    /// Container records, in stored order.
    pub fn containers(&self) -> Result<Vec<Value>, MetadataError> {
        match self.root.get(AYON_CONTAINERS) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(_) => Err(MetadataError::InvalidSection {
                section: AYON_CONTAINERS.to_string(),
                expected: "an array",
            }),
        }
    }

    /// Instance records keyed by instance id.
    pub fn instances(&self) -> Result<Map<String, Value>, MetadataError> {
        self.object_section(AYON_INSTANCES)
    }

    pub fn context_data(&self) -> Result<Map<String, Value>, MetadataError> {
        self.object_section(AYON_CONTEXT_DATA)
    }

    fn object_section(&self, section: &str) -> Result<Map<String, Value>, MetadataError> {
        match self.root.get(section) {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(MetadataError::InvalidSection {
                section: section.to_string(),
                expected: "an object",
            }),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_and_blank_input_are_empty() {
        assert!(MetadataDocument::parse(None).unwrap().as_map().is_empty());
        assert!(MetadataDocument::parse(Some("")).unwrap().as_map().is_empty());
        assert!(MetadataDocument::parse(Some("  \n")).unwrap().as_map().is_empty());
        assert!(MetadataDocument::parse(Some("null")).unwrap().as_map().is_empty());
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = MetadataDocument::parse(Some("{not json")).unwrap_err();
        assert!(matches!(err, MetadataError::Malformed { .. }));
    }

    #[test]
    fn test_non_object_root_is_malformed() {
        let err = MetadataDocument::parse(Some("[1, 2]")).unwrap_err();
        assert!(err.to_string().contains("found an array"));
    }

    #[test]
    fn test_wrong_section_type_is_reported() {
        let doc = MetadataDocument::parse(Some(r#"{"ayon_containers": {"a": 1}}"#)).unwrap();
        let err = doc.containers().unwrap_err();
        assert!(matches!(err, MetadataError::InvalidSection { .. }));

        let doc = MetadataDocument::parse(Some(r#"{"ayon_instances": []}"#)).unwrap();
        assert!(doc.instances().is_err());
    }

    #[test]
    fn test_serialization_keeps_key_order() {
        let doc =
            MetadataDocument::parse(Some(r#"{"zeta": 1, "ayon_instances": {}, "alpha": 2}"#))
                .unwrap();
        let out = doc.to_json_string().unwrap();
        assert_eq!(out, r#"{"zeta":1,"ayon_instances":{},"alpha":2}"#);
    }

    #[test]
    fn test_set_overwrites_single_section() {
        let mut doc = MetadataDocument::parse(Some(r#"{"foo": 1}"#)).unwrap();
        doc.set(AYON_CONTEXT_DATA, json!({"k": "v"}));

        assert_eq!(doc.get("foo"), Some(&json!(1)));
        assert_eq!(doc.context_data().unwrap().get("k"), Some(&json!("v")));
    }
}
