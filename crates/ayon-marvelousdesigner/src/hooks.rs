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

//! # Launch Hook
//!
//! Decides which `.zprj` Marvelous Designer opens on launch. The last
//! workfile is reopened when requested and still on disk; otherwise the
//! bundled default project is copied into a per-project temp directory so the
//! artist never edits the template itself.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::HookError;

/// File name of the bundled default project.
pub const DEFAULT_TEMPLATE_NAME: &str = "Default_MD.zprj";

/// Environment variable carrying the workfile the application opens.
pub const CURRENT_WORKFILE_ENV: &str = "AYON_CURRENT_WORKFILE";

/// Variables stripped from the launch environment.
pub const REMOVED_ENV_VARS: &[&str] = &["QT_AUTO_SCREEN_SCALE_FACTOR"];

/// Inputs for resolving the launch workfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub start_last_workfile: bool,
    pub last_workfile: Option<PathBuf>,
    pub project_name: String,
    /// Default `.zprj` copied when no last workfile is used
    pub template: PathBuf,
    /// Local temp root; the copy lands in `<temp_root>/<project_name>`
    pub temp_root: PathBuf,
}

impl LaunchRequest {
    pub fn new(
        project_name: impl Into<String>,
        template: impl Into<PathBuf>,
        temp_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            start_last_workfile: false,
            last_workfile: None,
            project_name: project_name.into(),
            template: template.into(),
            temp_root: temp_root.into(),
        }
    }

    pub fn with_last_workfile(mut self, path: impl Into<PathBuf>, start: bool) -> Self {
        self.last_workfile = Some(path.into());
        self.start_last_workfile = start;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub workfile: PathBuf,
    /// True when the workfile is a fresh copy of the template
    pub from_template: bool,
    pub launch_args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

/// Pick the workfile to open and build the launch arguments.
pub fn resolve_launch_workfile(request: &LaunchRequest) -> Result<LaunchPlan, HookError> {
    let last = request
        .last_workfile
        .as_ref()
        .filter(|path| request.start_last_workfile && path.exists());

    let (workfile, from_template) = match last {
        Some(path) => {
            tracing::info!("It is set to start last workfile on start.");
            (path.clone(), false)
        }
        None => (copy_template(request)?, true),
    };

    let workfile_arg = workfile.to_string_lossy().into_owned();
    let mut env = BTreeMap::new();
    env.insert(CURRENT_WORKFILE_ENV.to_string(), workfile_arg.clone());

    Ok(LaunchPlan {
        workfile,
        from_template,
        launch_args: vec![workfile_arg],
        env,
    })
}

fn copy_template(request: &LaunchRequest) -> Result<PathBuf, HookError> {
    if !request.template.is_file() {
        return Err(HookError::TemplateMissing(request.template.clone()));
    }

    let staging_dir = request.temp_root.join(&request.project_name);
    fs::create_dir_all(&staging_dir).map_err(|source| HookError::Copy {
        path: staging_dir.clone(),
        source,
    })?;

    let file_name = request
        .template
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_NAME));
    let destination = staging_dir.join(file_name);
    fs::copy(&request.template, &destination).map_err(|source| HookError::Copy {
        path: destination.clone(),
        source,
    })?;

    tracing::debug!(
        template = %request.template.display(),
        destination = %destination.display(),
        "Copied default workfile template"
    );
    Ok(destination)
}

/// Strip variables that break the application's UI scaling.
pub fn add_implementation_envs(env: &mut BTreeMap<String, String>) {
    for name in REMOVED_ENV_VARS {
        env.remove(*name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn template_in(dir: &TempDir) -> PathBuf {
        let template = dir.path().join("default_zprj").join(DEFAULT_TEMPLATE_NAME);
        fs::create_dir_all(template.parent().unwrap()).unwrap();
        fs::write(&template, b"template").unwrap();
        template
    }

    #[test]
    fn test_reopens_existing_last_workfile() {
        let dir = TempDir::new().unwrap();
        let last = dir.path().join("shirt_v003.zprj");
        fs::write(&last, b"work").unwrap();
        let request = LaunchRequest::new("demo", template_in(&dir), dir.path().join("tmp"))
            .with_last_workfile(&last, true);

        let plan = resolve_launch_workfile(&request).unwrap();

        assert_eq!(plan.workfile, last);
        assert!(!plan.from_template);
        assert_eq!(plan.launch_args, vec![last.to_string_lossy().into_owned()]);
        assert!(!dir.path().join("tmp").exists());
    }

    #[test]
    fn test_copies_template_when_last_workfile_unusable() {
        let dir = TempDir::new().unwrap();
        let template = template_in(&dir);
        let temp_root = dir.path().join("tmp");
        let existing = dir.path().join("shirt_v003.zprj");
        fs::write(&existing, b"work").unwrap();

        let requests = [
            LaunchRequest::new("demo", &template, &temp_root),
            LaunchRequest::new("demo", &template, &temp_root)
                .with_last_workfile(dir.path().join("missing.zprj"), true),
            LaunchRequest::new("demo", &template, &temp_root).with_last_workfile(&existing, false),
        ];

        for request in requests {
            let plan = resolve_launch_workfile(&request).unwrap();
            let expected = temp_root.join("demo").join(DEFAULT_TEMPLATE_NAME);
            assert_eq!(plan.workfile, expected);
            assert!(plan.from_template);
            assert_eq!(fs::read(&expected).unwrap(), b"template");
            assert_eq!(
                plan.env.get(CURRENT_WORKFILE_ENV).map(String::as_str),
                Some(expected.to_string_lossy().as_ref())
            );
        }
    }

    #[test]
    fn test_missing_template() {
        let dir = TempDir::new().unwrap();
        let request = LaunchRequest::new("demo", dir.path().join("nope.zprj"), dir.path());

        let err = resolve_launch_workfile(&request).unwrap_err();
        assert!(matches!(err, HookError::TemplateMissing(_)));
    }

    #[test]
    fn test_implementation_envs() {
        let mut env = BTreeMap::new();
        env.insert("QT_AUTO_SCREEN_SCALE_FACTOR".to_string(), "1".to_string());
        env.insert("AYON_PROJECT_NAME".to_string(), "demo".to_string());

        add_implementation_envs(&mut env);

        assert_eq!(env.len(), 1);
        assert!(env.contains_key("AYON_PROJECT_NAME"));
    }
}
