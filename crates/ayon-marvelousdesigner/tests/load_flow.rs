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

//! Loading through the plugin registry against a sidecar-backed project.

use std::fs;
use std::sync::Arc;

use ayon_marvelousdesigner::plugins::registry;
use ayon_marvelousdesigner::plugins::LoadContext;
use ayon_marvelousdesigner::testing::{ApiCall, RecordingGarmentApi};
use ayon_marvelousdesigner::{
    FileAccessor, LoadHost, MarvelousDesignerHost, MetadataRegistry, AYON_CONTAINER_ID,
};
use serde_json::{json, Value};
use serial_test::serial;
use tempfile::TempDir;

fn sidecar_host(dir: &TempDir) -> (Arc<RecordingGarmentApi>, MarvelousDesignerHost) {
    let workfile = dir.path().join("shirt_v001.zprj");
    let api = Arc::new(RecordingGarmentApi::new().with_project(&workfile));
    let registry = MetadataRegistry::new(Arc::new(FileAccessor::for_workfile(&workfile)));
    let host = MarvelousDesignerHost::new(registry, api.clone());
    host.install();
    (api, host)
}

#[test]
#[serial]
fn test_load_update_remove_persists_to_sidecar() {
    let dir = TempDir::new().unwrap();
    let (api, host) = sidecar_host(&dir);
    let sidecar = dir.path().join("shirt_v001.zprj.ayon.json");

    let abc = registry::get_loader("LoadPointCache").unwrap();
    let zfab = registry::get_loader("LoadZfab").unwrap();
    abc.load(
        &host,
        &LoadContext::new("shirtCache", "demo", "rep-abc", "/pub/shirt.abc"),
    )
    .unwrap();
    let fabric = zfab
        .load(
            &host,
            &LoadContext::new("denimMain", "demo", "rep-1", "/pub/v001/denim.zfab"),
        )
        .unwrap();

    let stored: Value = serde_json::from_str(&fs::read_to_string(&sidecar).unwrap()).unwrap();
    assert_eq!(stored["ayon_containers"].as_array().unwrap().len(), 2);
    assert_eq!(stored["ayon_containers"][1]["objectName"], "denimMain_fabric_0");
    assert_eq!(stored["ayon_containers"][1]["id"], AYON_CONTAINER_ID);

    zfab.update(
        &host,
        &fabric,
        &LoadContext::new("denimMain", "demo", "rep-2", "/pub/v002/denim.zfab"),
    )
    .unwrap();

    // a fresh registry over the same file sees the update
    let reopened = MetadataRegistry::new(Arc::new(FileAccessor::new(&sidecar)));
    let containers = reopened.list_containers().unwrap();
    assert_eq!(containers[1].representation, "rep-2");
    assert_eq!(containers[1].extra_str("filename"), Some("denim.zfab"));

    zfab.remove(&host, &containers[1]).unwrap();
    let remaining = host.get_containers().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].loader, "LoadPointCache");
    assert_eq!(api.fabric(0), None);
    assert!(api.calls().contains(&ApiCall::DeleteFabric(0)));
}

#[test]
#[serial]
fn test_unknown_sections_survive_loader_writes() {
    let dir = TempDir::new().unwrap();
    let sidecar = dir.path().join("shirt_v001.zprj.ayon.json");
    fs::write(
        &sidecar,
        json!({"studio_notes": {"owner": "cfx"}, "ayon_context_data": {"frameStart": 1001}})
            .to_string(),
    )
    .unwrap();
    let (_, host) = sidecar_host(&dir);

    registry::get_loader("LoadPointCache")
        .unwrap()
        .load(
            &host,
            &LoadContext::new("shirtCache", "demo", "rep-obj", "/pub/shirt.obj"),
        )
        .unwrap();

    let stored: Value = serde_json::from_str(&fs::read_to_string(&sidecar).unwrap()).unwrap();
    assert_eq!(stored["studio_notes"]["owner"], "cfx");
    assert_eq!(stored["ayon_context_data"]["frameStart"], 1001);
    let keys: Vec<&String> = stored.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["studio_notes", "ayon_context_data", "ayon_containers"]);
}

#[test]
#[serial]
fn test_incompatible_representation_leaves_no_record() {
    let dir = TempDir::new().unwrap();
    let (api, host) = sidecar_host(&dir);

    let loader = registry::get_loader("LoadPointCache").unwrap();
    assert!(!loader.is_compatible("zfab", "zfab"));
    assert!(loader
        .load(
            &host,
            &LoadContext::new("denim", "demo", "rep", "/pub/denim.zfab"),
        )
        .is_err());

    assert!(host.get_containers().unwrap().is_empty());
    assert!(api.calls().is_empty());
    assert!(!dir.path().join("shirt_v001.zprj.ayon.json").exists());
}
