//! Reusable build presets stored as JSON documents next to the project.
//!
//! A template pins down target, mode, phase and increment policy the way the
//! editor-side build assets did, so a channel build is one tool call instead
//! of a hand-assembled request.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::defines::BuildMode;
use crate::platform::BuildTarget;
use crate::request::{BuildOptions, BuildPhase, BuildRequest};
use crate::version::IncrementKind;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse template {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Standalone list of scene paths, shareable between templates.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SceneTemplate {
    pub scenes: Vec<String>,
}

impl SceneTemplate {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        load_json(path)
    }
}

/// One build preset.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildTemplate {
    pub target: BuildTarget,
    #[serde(default)]
    pub mode: BuildMode,
    #[serde(default)]
    pub phase: BuildPhase,
    #[serde(default)]
    pub increment: IncrementKind,
    #[serde(default)]
    pub development: bool,
    #[serde(default)]
    pub scripts_only: bool,
    /// Scenes baked into the preset; when absent the caller's scene list is
    /// used, mirroring the optional scene asset of the editor version.
    #[serde(default)]
    pub scenes: Option<Vec<String>>,
    /// Path of a shared scene template, resolved relative to this file.
    #[serde(default)]
    pub scene_template: Option<PathBuf>,
}

impl BuildTemplate {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        load_json(path)
    }

    /// Resolves the preset into a concrete request.
    ///
    /// Scene precedence: inline scenes, then the referenced scene template,
    /// then `fallback_scenes` (the editor's build-settings list).
    pub fn into_request(
        self,
        template_dir: &Path,
        output_root: PathBuf,
        fallback_scenes: Vec<String>,
    ) -> Result<BuildRequest, TemplateError> {
        let scenes = match (self.scenes, &self.scene_template) {
            (Some(scenes), _) => scenes,
            (None, Some(reference)) => SceneTemplate::load(&template_dir.join(reference))?.scenes,
            (None, None) => fallback_scenes,
        };

        Ok(BuildRequest {
            target: self.target,
            mode: self.mode,
            phase: self.phase,
            scenes,
            output_root,
            options: BuildOptions {
                development: self.development,
                scripts_only: self.scripts_only,
                show_built_player: true,
            },
            increment: self.increment,
        })
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, TemplateError> {
    let raw = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| TemplateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
