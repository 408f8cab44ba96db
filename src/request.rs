//! Description of one build invocation.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::defines::BuildMode;
use crate::platform::BuildTarget;
use crate::version::IncrementKind;

/// Release stage label carried by templates. Only non-release phases show up
/// in build folder names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
pub enum BuildPhase {
    Alpha,
    Beta,
    #[default]
    Release,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Alpha => "Alpha",
            Self::Beta => "Beta",
            Self::Release => "Release",
        };
        f.write_str(name)
    }
}

/// Pipeline switches, spelled out instead of packed into a flag word.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BuildOptions {
    pub development: bool,
    pub scripts_only: bool,
    pub show_built_player: bool,
}

/// One build to run: where to put it, what to compile, how to stamp it.
/// Created per invocation and discarded afterwards.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub target: BuildTarget,
    pub mode: BuildMode,
    pub phase: BuildPhase,
    pub scenes: Vec<String>,
    pub output_root: PathBuf,
    pub options: BuildOptions,
    pub increment: IncrementKind,
}

impl BuildRequest {
    /// Folder the build lands in: `"{product} v{version} {target}"`, with
    /// the mode, a non-release phase and a dev marker appended when present.
    pub fn folder_name(&self, product: &str, version: &str) -> String {
        let mut name = format!("{} v{} {}", product, version, self.target);
        if self.mode != BuildMode::None {
            name.push_str(&format!(" {}", self.mode));
        }
        if self.phase != BuildPhase::Release {
            name.push_str(&format!(" [{}]", self.phase));
        }
        if self.options.development {
            name.push_str(" [Dev]");
        }
        name
    }

    /// Full path handed to the pipeline: build folder plus the player file,
    /// with the platform extension where one is required.
    pub fn location_path(&self, product: &str, version: &str) -> PathBuf {
        let file = format!("{}{}", product, self.target.file_suffix());
        self.output_root
            .join(self.folder_name(product, version))
            .join(file)
    }
}
