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

//! Configuration discovery, parsing and `config` subcommands.

use clap::Parser;
use md_ctl::config::loader::CONFIG_ENV;
use md_ctl::{run, Cli, ConfigError, ConfigLoader, MdConfig, Validate};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_load_toml_with_substitution() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("md-ctl.toml");
    fs::write(
        &path,
        r#"
[metadata]
sidecar = "${MD_CTL_TEST_ROOT:-/projects}/shirt.zprj.ayon.json"

[logging]
level = "debug"

[publish.ExtractFbx]
enabled = false
"#,
    )
    .unwrap();
    env::set_var("MD_CTL_TEST_ROOT", "/mnt/work");

    let config = ConfigLoader::new().load_config(Some(&path)).unwrap();
    env::remove_var("MD_CTL_TEST_ROOT");

    assert_eq!(
        config.metadata.sidecar,
        Some(PathBuf::from("/mnt/work/shirt.zprj.ayon.json"))
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.workfile, MdConfig::default().workfile);
    let settings = config.settings();
    assert!(!settings.is_enabled("ExtractFbx"));
    assert!(settings.plugin("ExtractObj").is_none());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_env_var_names_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();
    env::set_var(CONFIG_ENV, &path);

    let loader = ConfigLoader::with_search_paths(vec![]);
    let config = loader.load_config(None);
    env::remove_var(CONFIG_ENV);

    assert_eq!(config.unwrap().logging.level, "warn");
}

#[test]
#[serial]
fn test_search_path_order() {
    env::remove_var(CONFIG_ENV);
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.toml");
    let second = dir.path().join("second.toml");
    fs::write(&second, "[logging]\nlevel = \"trace\"\n").unwrap();

    let loader = ConfigLoader::with_search_paths(vec![first.clone(), second.clone()]);
    assert_eq!(loader.find_config_file(), Some(second.clone()));

    fs::write(&first, "[logging]\nlevel = \"error\"\n").unwrap();
    assert_eq!(loader.load_config(None).unwrap().logging.level, "error");
}

#[test]
#[serial]
fn test_explicit_file_errors() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new();

    let missing = loader.load_config(Some(&dir.path().join("missing.toml")));
    assert!(matches!(missing, Err(ConfigError::ReadError { .. })));

    let yaml = dir.path().join("config.yaml");
    fs::write(&yaml, "logging: {}").unwrap();
    assert!(matches!(
        loader.load_config(Some(&yaml)),
        Err(ConfigError::UnsupportedFormat { .. })
    ));

    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "[logging\nlevel =").unwrap();
    assert!(matches!(
        loader.load_config(Some(&broken)),
        Err(ConfigError::TomlParseError(_))
    ));
}

#[test]
fn test_config_init_writes_parseable_defaults() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("config.toml");
    let target_arg = target.to_string_lossy().into_owned();
    let config = MdConfig::default();

    let cli = Cli::try_parse_from(["md-ctl", "config", "init", "--output", target_arg.as_str()]).unwrap();
    let mut out = Vec::new();
    run(&cli, &config, &mut out).unwrap();

    let written = ConfigLoader::new().load_config_from_file(&target).unwrap();
    assert_eq!(written, MdConfig::default());

    let again = run(&cli, &config, &mut Vec::new()).unwrap_err();
    assert!(again.to_string().contains("already exists"));

    let forced = Cli::try_parse_from(["md-ctl", "config", "init", "--output", target_arg.as_str(), "--force"])
        .unwrap();
    run(&forced, &config, &mut Vec::new()).unwrap();
}

#[test]
fn test_config_init_stdout() {
    let cli = Cli::try_parse_from(["md-ctl", "config", "init", "--stdout"]).unwrap();
    let mut out = Vec::new();
    run(&cli, &MdConfig::default(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[logging]"));
    assert!(text.contains("[publish.ExtractPointCache]"));
}
