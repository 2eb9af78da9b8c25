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

//! # Publish Plugins
//!
//! Publishing runs plugins in ascending [`PublishPlugin::order`]: collectors
//! gather data, validators check it, extractors write representations to a
//! staging directory and integrators finish up. A plugin with no families is
//! a context plugin and runs once; any other plugin runs once per instance
//! whose family it lists.
//!
//! Plugin failures are recorded in [`PublishContext::results`] rather than
//! aborting the run, except that nothing past validation runs once a
//! collector or validator has failed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{FabricIndex, ImportExportOptions};
use crate::error::PublishError;
use crate::format::{select_exporter, MeshFormat};
use crate::host::{MarvelousDesignerHost, PublishHost, WorkfileHost};
use crate::instance::{keys, str_field, InstanceData};
use crate::settings::MdSettings;

/// Order anchors; plugins offset from these.
pub mod order {
    pub const COLLECTOR: f64 = 0.0;
    pub const VALIDATOR: f64 = 1.0;
    pub const EXTRACTOR: f64 = 2.0;
    pub const INTEGRATOR: f64 = 3.0;
}

/// One file (or file set) produced for an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Representation {
    pub name: String,
    pub ext: String,
    pub files: String,
    #[serde(rename = "stagingDir")]
    pub staging_dir: PathBuf,
}

impl Representation {
    pub fn new(
        name: impl Into<String>,
        ext: impl Into<String>,
        files: impl Into<String>,
        staging_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            ext: ext.into(),
            files: files.into(),
            staging_dir: staging_dir.into(),
        }
    }
}

/// A product going through publishing.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishInstance {
    pub name: String,
    pub family: String,
    pub data: InstanceData,
    pub representations: Vec<Representation>,
    /// Instances switched off here are skipped by later plugins
    pub publish: bool,
}

impl PublishInstance {
    /// Build from a stored instance record.
    pub fn from_data(data: InstanceData) -> Self {
        let name = str_field(&data, keys::PRODUCT_NAME)
            .or_else(|| str_field(&data, keys::INSTANCE_ID))
            .unwrap_or_default()
            .to_string();
        let family = str_field(&data, keys::PRODUCT_BASE_TYPE)
            .or_else(|| str_field(&data, keys::PRODUCT_TYPE))
            .unwrap_or_default()
            .to_string();
        let publish = data
            .get(keys::ACTIVE)
            .and_then(Value::as_bool)
            .unwrap_or(true);
        Self {
            name,
            family,
            data,
            representations: Vec::new(),
            publish,
        }
    }

    pub fn fabric_index(&self) -> Result<FabricIndex, PublishError> {
        self.data
            .get(keys::FABRIC_INDEX)
            .and_then(Value::as_i64)
            .ok_or_else(|| self.missing(keys::FABRIC_INDEX))
    }

    fn missing(&self, key: &'static str) -> PublishError {
        PublishError::MissingData {
            instance: self.name.clone(),
            key,
        }
    }
}

/// Session-wide publish data.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextData {
    pub current_file: Option<PathBuf>,
    /// Instances stage their output in `<staging_root>/<instance name>`
    pub staging_root: PathBuf,
    /// Directory holding unsaved launch-time workfiles
    pub temp_dir: Option<PathBuf>,
    pub values: Map<String, Value>,
}

impl ContextData {
    /// Context staging under `staging_root`; the temp dir comes from `AYON_TEMP_DIR`.
    pub fn new(staging_root: impl Into<PathBuf>) -> Self {
        let temp_dir = std::env::var_os("AYON_TEMP_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        Self {
            current_file: None,
            staging_root: staging_root.into(),
            temp_dir,
            values: Map::new(),
        }
    }

    /// Create and return the staging directory of `instance`.
    pub fn staging_dir(&self, instance: &PublishInstance) -> Result<PathBuf, PublishError> {
        let dir = self.staging_root.join(&instance.name);
        fs::create_dir_all(&dir).map_err(|source| PublishError::Staging {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }
}

/// Outcome of one plugin run on the context or on one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginResult {
    pub plugin: String,
    /// Order of the plugin that produced the result
    pub order: f64,
    pub instance: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishContext {
    pub data: ContextData,
    pub instances: Vec<PublishInstance>,
    pub results: Vec<PluginResult>,
}

impl PublishContext {
    pub fn new(data: ContextData) -> Self {
        Self {
            data,
            instances: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Load the stored context data and instances of the open project.
    pub fn collect(
        host: &MarvelousDesignerHost,
        staging_root: impl Into<PathBuf>,
    ) -> Result<Self, PublishError> {
        let mut data = ContextData::new(staging_root);
        data.values = host.get_context_data()?;
        let instances = host
            .registry()
            .get_instance_values()?
            .into_iter()
            .map(PublishInstance::from_data)
            .collect();
        Ok(Self {
            data,
            instances,
            results: Vec::new(),
        })
    }

    pub fn succeeded(&self) -> bool {
        self.results.iter().all(|result| result.success)
    }

    /// True once a collector or validator has failed.
    pub fn blocked(&self) -> bool {
        self.results
            .iter()
            .any(|result| !result.success && result.order < EXTRACTION_GATE)
    }

    pub fn instance(&self, name: &str) -> Option<&PublishInstance> {
        self.instances.iter().find(|instance| instance.name == name)
    }

    fn record(
        &mut self,
        plugin: &dyn PublishPlugin,
        instance: Option<&str>,
        outcome: Result<(), PublishError>,
    ) {
        let error = match outcome {
            Ok(()) => {
                tracing::debug!(plugin = plugin.name(), instance, "Plugin finished");
                None
            }
            Err(e) => {
                tracing::error!(plugin = plugin.name(), instance, "{}: {}", plugin.label(), e);
                Some(e.to_string())
            }
        };
        self.results.push(PluginResult {
            plugin: plugin.name().to_string(),
            order: plugin.order(),
            instance: instance.map(str::to_string),
            success: error.is_none(),
            error,
        });
    }
}

/// A collector, validator, extractor or integrator.
pub trait PublishPlugin: Send + Sync {
    /// Settings key and result label.
    fn name(&self) -> &str;

    fn label(&self) -> &str;

    fn order(&self) -> f64;

    /// Families processed; empty for context plugins.
    fn families(&self) -> &[&'static str] {
        &[]
    }

    /// Optional plugins can be switched off by the artist.
    fn optional(&self) -> bool {
        false
    }

    fn process_context(
        &self,
        _host: &MarvelousDesignerHost,
        _context: &mut PublishContext,
    ) -> Result<(), PublishError> {
        Ok(())
    }

    fn process_instance(
        &self,
        _host: &MarvelousDesignerHost,
        _context: &ContextData,
        _instance: &mut PublishInstance,
    ) -> Result<(), PublishError> {
        Ok(())
    }
}

fn handles_family(plugin: &dyn PublishPlugin, family: &str) -> bool {
    plugin.families().iter().any(|accepted| *accepted == family)
}

/// Whether an optional plugin is switched on for the given data.
///
/// Settings decide whether the plugin is optional and its default state; the
/// artist's choice lives in `publish_attributes.<PluginName>.active`.
fn is_active(plugin: &dyn PublishPlugin, settings: &MdSettings, data: &Map<String, Value>) -> bool {
    let toggle = settings.plugin(plugin.name());
    let optional = toggle.map_or(plugin.optional(), |toggle| toggle.optional);
    if !optional {
        return true;
    }
    let default = toggle.map_or(true, |toggle| toggle.active);
    data.get(keys::PUBLISH_ATTRIBUTES)
        .and_then(|attributes| attributes.get(plugin.name()))
        .and_then(|values| values.get("active"))
        .and_then(Value::as_bool)
        .unwrap_or(default)
}

/// Plugins ordered at or past this point do not run after a failed
/// collector or validator.
const EXTRACTION_GATE: f64 = order::VALIDATOR + 0.5;

/// Run `plugins` against `context` in order.
pub fn run_publish(
    host: &MarvelousDesignerHost,
    context: &mut PublishContext,
    plugins: &[Arc<dyn PublishPlugin>],
) {
    let settings = host.settings();
    let mut ordered: Vec<&dyn PublishPlugin> = plugins.iter().map(|plugin| plugin.as_ref()).collect();
    ordered.sort_by(|a, b| a.order().total_cmp(&b.order()));

    for plugin in ordered {
        if !settings.is_enabled(plugin.name()) {
            tracing::debug!(plugin = plugin.name(), "Plugin disabled in settings");
            continue;
        }
        if plugin.order() >= EXTRACTION_GATE && context.blocked() {
            tracing::warn!("Stopping publish: collection or validation failed");
            break;
        }

        if plugin.families().is_empty() {
            if !is_active(plugin, settings, &context.data.values) {
                continue;
            }
            let outcome = plugin.process_context(host, context);
            context.record(plugin, None, outcome);
            continue;
        }

        let mut outcomes = Vec::new();
        for instance in context.instances.iter_mut() {
            if !instance.publish || !handles_family(plugin, &instance.family) {
                continue;
            }
            if !is_active(plugin, settings, &instance.data) {
                tracing::debug!(plugin = plugin.name(), instance = %instance.name, "Plugin switched off");
                continue;
            }
            let outcome = plugin.process_instance(host, &context.data, instance);
            outcomes.push((instance.name.clone(), outcome));
        }
        for (instance, outcome) in outcomes {
            context.record(plugin, Some(&instance), outcome);
        }
    }
}

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^A-Za-z])[vV](\d+)").expect("Failed to compile regex"));

/// Next version of a workfile path.
///
/// The last `v<digits>` token of the file stem is incremented keeping its
/// zero padding; a stem without one gets `_v001`.
pub fn version_up(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let next_stem = match VERSION_PATTERN
        .captures_iter(&stem)
        .filter_map(|captures| captures.get(1))
        .last()
    {
        Some(digits) => format!(
            "{}{}{}",
            &stem[..digits.start()],
            increment_digits(digits.as_str()),
            &stem[digits.end()..]
        ),
        None => format!("{}_v001", stem),
    };

    let file_name = match path.extension() {
        Some(ext) => format!("{}.{}", next_stem, ext.to_string_lossy()),
        None => next_stem,
    };
    path.with_file_name(file_name)
}

/// Add one to a decimal string, keeping its width unless it carries over.
fn increment_digits(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

fn ensure_produced(output: &Path) -> Result<(), PublishError> {
    if output.exists() {
        return Ok(());
    }
    Err(PublishError::KnownPublish(format!(
        "File {} wasn't produced by Marvelous Designer, please check the logs.",
        output.display()
    )))
}

/// Stores the open workfile path on the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectCurrentFile;

impl PublishPlugin for CollectCurrentFile {
    fn name(&self) -> &str {
        "CollectCurrentFile"
    }

    fn label(&self) -> &str {
        "Current Workfile"
    }

    fn order(&self) -> f64 {
        order::COLLECTOR - 0.49
    }

    fn process_context(
        &self,
        host: &MarvelousDesignerHost,
        context: &mut PublishContext,
    ) -> Result<(), PublishError> {
        let path = host.current_workfile()?;
        match &path {
            Some(path) => tracing::debug!("Current workfile: {}", path.display()),
            None => tracing::error!("Scene is not saved."),
        }
        context.data.current_file = path;
        Ok(())
    }
}

/// Turns the open workfile into the workfile instance's representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectWorkfile;

impl PublishPlugin for CollectWorkfile {
    fn name(&self) -> &str {
        "CollectWorkfile"
    }

    fn label(&self) -> &str {
        "Collect Workfile"
    }

    fn order(&self) -> f64 {
        order::COLLECTOR - 0.01
    }

    fn families(&self) -> &[&'static str] {
        &["workfile"]
    }

    fn process_instance(
        &self,
        _host: &MarvelousDesignerHost,
        context: &ContextData,
        instance: &mut PublishInstance,
    ) -> Result<(), PublishError> {
        let current = context.current_file.as_deref();
        let parent = current.and_then(Path::parent);
        let unsaved = match (parent, context.temp_dir.as_deref()) {
            (Some(parent), Some(temp_dir)) => parent == temp_dir,
            (None, _) => true,
            _ => false,
        };
        let (Some(current), Some(parent), false) = (current, parent, unsaved) else {
            tracing::warn!(
                "Deactivating workfile instance because no current filepath is found. \
                 Please save your workfile."
            );
            instance.publish = false;
            return Ok(());
        };

        let ext = current
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = current
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let frame = |key: &str| context.values.get(key).cloned().unwrap_or(json!(1));
        instance.data.insert(
            "setMembers".into(),
            json!([current.to_string_lossy().replace('\\', "/")]),
        );
        instance.data.insert("frameStart".into(), frame("frameStart"));
        instance.data.insert("frameEnd".into(), frame("frameEnd"));
        instance.data.insert("handleStart".into(), frame("handleStart"));
        instance.data.insert("handleEnd".into(), frame("handleEnd"));
        instance
            .representations
            .push(Representation::new(&ext, &ext, file_name, parent));
        Ok(())
    }
}

/// Copies the artist's export switches into `exportOptions` of pointcache
/// instances. Model extraction always uses the default options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectExportOption;

impl PublishPlugin for CollectExportOption {
    fn name(&self) -> &str {
        "CollectExportOption"
    }

    fn label(&self) -> &str {
        "Collect Export Option"
    }

    fn order(&self) -> f64 {
        order::COLLECTOR - 0.01
    }

    fn families(&self) -> &[&'static str] {
        &["pointcache"]
    }

    fn process_instance(
        &self,
        _host: &MarvelousDesignerHost,
        _context: &ContextData,
        instance: &mut PublishInstance,
    ) -> Result<(), PublishError> {
        let attributes = instance
            .data
            .get(keys::PUBLISH_ATTRIBUTES)
            .and_then(|attributes| attributes.get(self.name()))
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let options: ImportExportOptions = serde_json::from_value(attributes).map_err(|e| {
            PublishError::KnownPublish(format!(
                "Invalid export options on '{}': {}",
                instance.name, e
            ))
        })?;

        instance.data.insert(
            keys::EXPORT_OPTIONS.into(),
            json!({
                "bExportGarment": options.export_garment,
                "bExportAvatar": options.export_avatar,
                "bSingleObject": options.single_object,
                "bThin": options.thin,
                "bMetaData": options.metadata,
            }),
        );
        Ok(())
    }
}

/// Checks that the instance's fabric slot still holds the recorded fabric.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateNoFabric;

impl ValidateNoFabric {
    /// Point the instance at the currently selected fabric.
    pub fn repair(
        &self,
        host: &MarvelousDesignerHost,
        instance: &mut PublishInstance,
    ) -> Result<(), PublishError> {
        let index = host.api().current_fabric_index()?;
        let name = host.api().fabric_name(index)?;
        instance
            .data
            .insert(keys::FABRIC_INDEX.into(), Value::from(index));
        instance.data.insert(
            keys::FABRIC_NAME.into(),
            name.clone().map_or(Value::Null, Value::String),
        );
        tracing::info!(
            "Reset fabric to '{}' in the instance data.",
            name.unwrap_or_default()
        );
        Ok(())
    }
}

impl PublishPlugin for ValidateNoFabric {
    fn name(&self) -> &str {
        "ValidateNoFabric"
    }

    fn label(&self) -> &str {
        "Validate No Fabric"
    }

    fn order(&self) -> f64 {
        order::VALIDATOR
    }

    fn families(&self) -> &[&'static str] {
        &["zfab"]
    }

    fn process_instance(
        &self,
        host: &MarvelousDesignerHost,
        _context: &ContextData,
        instance: &mut PublishInstance,
    ) -> Result<(), PublishError> {
        let index = instance.fabric_index()?;
        let expected = str_field(&instance.data, keys::FABRIC_NAME);
        let actual = host.api().fabric_name(index)?;

        if expected.is_none() || actual.as_deref() != expected {
            return Err(PublishError::Validation {
                message: format!(
                    "Fabric '{}' does not exist in the scene. Please reselect any fabric \
                     you want to publish and click 'Repair' action so that Ayon can reset \
                     for you.",
                    expected.unwrap_or_default()
                ),
            });
        }
        Ok(())
    }
}

/// Saves the workfile before extraction when it has unsaved changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveCurrentWorkfile;

impl PublishPlugin for SaveCurrentWorkfile {
    fn name(&self) -> &str {
        "SaveCurrentWorkfile"
    }

    fn label(&self) -> &str {
        "Save current workfile"
    }

    fn order(&self) -> f64 {
        order::EXTRACTOR - 0.49
    }

    fn process_context(
        &self,
        host: &MarvelousDesignerHost,
        context: &mut PublishContext,
    ) -> Result<(), PublishError> {
        let current = host.current_workfile()?;
        if context.data.current_file != current {
            return Err(PublishError::KnownPublish(
                "Workfile has changed during publishing!".to_string(),
            ));
        }

        if !host.workfile_has_unsaved_changes()? {
            tracing::debug!("No unsaved changes, skipping file save.");
            return Ok(());
        }
        let current = current
            .ok_or_else(|| PublishError::KnownPublish("Scene is not saved.".to_string()))?;
        tracing::info!("Saving current file: {}", current.display());
        host.save_workfile(&current)?;
        Ok(())
    }
}

/// Exports model geometry with default options.
#[derive(Debug, Clone, Copy)]
pub struct ExtractModel {
    format: MeshFormat,
    name: &'static str,
    label: &'static str,
}

impl ExtractModel {
    pub fn alembic() -> Self {
        Self {
            format: MeshFormat::Alembic,
            name: "ExtractModel",
            label: "Extract Model (Alembic)",
        }
    }

    pub fn obj() -> Self {
        Self {
            format: MeshFormat::Obj,
            name: "ExtractModelObj",
            label: "Extract Model (OBJ)",
        }
    }

    pub fn fbx() -> Self {
        Self {
            format: MeshFormat::Fbx,
            name: "ExtractModelFbx",
            label: "Extract Model (FBX)",
        }
    }
}

impl PublishPlugin for ExtractModel {
    fn name(&self) -> &str {
        self.name
    }

    fn label(&self) -> &str {
        self.label
    }

    fn order(&self) -> f64 {
        order::EXTRACTOR - 0.05
    }

    fn families(&self) -> &[&'static str] {
        &["model"]
    }

    fn optional(&self) -> bool {
        true
    }

    fn process_instance(
        &self,
        host: &MarvelousDesignerHost,
        context: &ContextData,
        instance: &mut PublishInstance,
    ) -> Result<(), PublishError> {
        let extension = self.format.extension();
        let staging_dir = context.staging_dir(instance)?;
        let file_name = format!("{}.{}", instance.name, extension);
        let filepath = staging_dir.join(&file_name);

        let output = select_exporter(extension)?.export(
            host.api(),
            &filepath,
            &ImportExportOptions::default(),
        )?;
        ensure_produced(&output)?;

        instance.representations.push(Representation::new(
            extension,
            extension,
            file_name,
            staging_dir,
        ));
        tracing::info!(
            "Extracted instance '{}' to: {}",
            instance.name,
            filepath.display()
        );
        Ok(())
    }
}

/// Exports pointcache geometry with the collected export options.
///
/// Animation is exported for `pointcache` products. When the application
/// writes XML metadata next to the cache it becomes an extra representation.
#[derive(Debug, Clone, Copy)]
pub struct ExtractPointCache {
    format: MeshFormat,
    name: &'static str,
    label: &'static str,
}

impl ExtractPointCache {
    pub fn alembic() -> Self {
        Self {
            format: MeshFormat::Alembic,
            name: "ExtractPointCache",
            label: "Extract PointCache (Alembic)",
        }
    }

    pub fn obj() -> Self {
        Self {
            format: MeshFormat::Obj,
            name: "ExtractObj",
            label: "Extract OBJ",
        }
    }

    pub fn fbx() -> Self {
        Self {
            format: MeshFormat::Fbx,
            name: "ExtractFbx",
            label: "Extract FBX",
        }
    }

    fn export_options(&self, instance: &PublishInstance) -> Result<ImportExportOptions, PublishError> {
        let collected = instance
            .data
            .get(keys::EXPORT_OPTIONS)
            .cloned()
            .ok_or_else(|| instance.missing(keys::EXPORT_OPTIONS))?;
        let mut options: ImportExportOptions = serde_json::from_value(collected).map_err(|e| {
            PublishError::KnownPublish(format!(
                "Invalid export options on '{}': {}",
                instance.name, e
            ))
        })?;
        options.export_animation =
            str_field(&instance.data, keys::PRODUCT_BASE_TYPE) == Some("pointcache");
        Ok(options)
    }
}

impl PublishPlugin for ExtractPointCache {
    fn name(&self) -> &str {
        self.name
    }

    fn label(&self) -> &str {
        self.label
    }

    fn order(&self) -> f64 {
        order::EXTRACTOR - 0.05
    }

    fn families(&self) -> &[&'static str] {
        &["pointcache"]
    }

    fn optional(&self) -> bool {
        true
    }

    fn process_instance(
        &self,
        host: &MarvelousDesignerHost,
        context: &ContextData,
        instance: &mut PublishInstance,
    ) -> Result<(), PublishError> {
        let extension = self.format.extension();
        let options = self.export_options(instance)?;
        let staging_dir = context.staging_dir(instance)?;
        let file_name = format!("{}.{}", instance.name, extension);
        let xml_name = format!("{}.xml", instance.name);
        let filepath = staging_dir.join(&file_name);

        let output = select_exporter(extension)?.export(host.api(), &filepath, &options)?;
        ensure_produced(&output)?;

        instance.representations.push(Representation::new(
            extension,
            extension,
            file_name,
            &staging_dir,
        ));
        tracing::info!(
            "Extracted instance '{}' to: {}",
            instance.name,
            filepath.display()
        );

        let has_xml = instance.representations.iter().any(|rep| rep.name == "xml");
        if !has_xml && staging_dir.join(&xml_name).exists() {
            instance
                .representations
                .push(Representation::new("xml", "xml", xml_name, &staging_dir));
            tracing::debug!(instance = %instance.name, "Added XML metadata representation");
        }
        Ok(())
    }
}

/// Exports the instance's fabric slot as `.zfab`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractZfab;

impl PublishPlugin for ExtractZfab {
    fn name(&self) -> &str {
        "ExtractZfab"
    }

    fn label(&self) -> &str {
        "Extract Zfab"
    }

    fn order(&self) -> f64 {
        order::EXTRACTOR - 0.05
    }

    fn families(&self) -> &[&'static str] {
        &["zfab"]
    }

    fn process_instance(
        &self,
        host: &MarvelousDesignerHost,
        context: &ContextData,
        instance: &mut PublishInstance,
    ) -> Result<(), PublishError> {
        let index = instance.fabric_index()?;
        let staging_dir = context.staging_dir(instance)?;
        let file_name = format!("{}.zfab", instance.name);
        let filepath = staging_dir.join(&file_name);

        host.api().export_zfab(&filepath, index)?;

        instance
            .representations
            .push(Representation::new("zfab", "zfab", file_name, staging_dir));
        tracing::info!(
            "Extracted instance '{}' to: {}",
            instance.name,
            filepath.display()
        );
        Ok(())
    }
}

/// Saves the workfile as the next version after a successful publish.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementWorkfileVersion;

impl PublishPlugin for IncrementWorkfileVersion {
    fn name(&self) -> &str {
        "IncrementWorkfileVersion"
    }

    fn label(&self) -> &str {
        "Increment Workfile Version"
    }

    fn order(&self) -> f64 {
        order::INTEGRATOR + 1.0
    }

    fn optional(&self) -> bool {
        true
    }

    fn process_context(
        &self,
        host: &MarvelousDesignerHost,
        context: &mut PublishContext,
    ) -> Result<(), PublishError> {
        if !context.succeeded() {
            return Err(PublishError::KnownPublish(
                "Publishing not successful so version is not increased.".to_string(),
            ));
        }
        let current = context
            .data
            .current_file
            .clone()
            .ok_or_else(|| PublishError::KnownPublish("Scene is not saved.".to_string()))?;

        let next = version_up(&current);
        host.save_workfile(&next)?;
        tracing::info!("Incrementing current workfile to: {}", next.display());
        Ok(())
    }
}
