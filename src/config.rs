use std::env;
use std::path::PathBuf;

use crate::bridge::path::IpcConfig;

/// Layout of the Unity project this server automates builds for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Project root, the folder that contains `Assets`.
    pub root: PathBuf,
    /// Folder under `Assets` whose files are copied next to finished builds.
    pub extras_dir: String,
    /// Readme file rewritten in the build folder after every build.
    pub readme_name: String,
    /// Folder under the project root where builds land by default.
    pub builds_dir: String,
    /// File extensions never copied out of the extras folder.
    pub ignored_extensions: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extras_dir: "Include".to_string(),
            readme_name: "READ ME.txt".to_string(),
            builds_dir: "Builds".to_string(),
            ignored_extensions: vec![".meta".to_string()],
        }
    }
}

impl ProjectConfig {
    pub const ENV_ROOT: &'static str = "UNITY_PROJECT_ROOT";
    pub const ENV_EXTRAS_DIR: &'static str = "UNITY_BUILD_EXTRAS_DIR";
    pub const ENV_README: &'static str = "UNITY_BUILD_README";
    pub const ENV_OUTPUT_DIR: &'static str = "UNITY_BUILD_OUTPUT_DIR";

    /// Construct from real process environment variables.
    pub fn from_env() -> Self {
        Self::from_reader(|k| env::var(k).ok())
    }

    /// Construct from an arbitrary key/value source (for tests).
    pub fn from_map<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        use std::collections::HashMap;
        let map: HashMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_reader(|k| map.get(k).cloned())
    }

    fn from_reader<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(root) = get(Self::ENV_ROOT) {
            cfg.root = PathBuf::from(root);
        }
        if let Some(dir) = get(Self::ENV_EXTRAS_DIR) {
            cfg.extras_dir = dir;
        }
        if let Some(name) = get(Self::ENV_README) {
            cfg.readme_name = name;
        }
        if let Some(dir) = get(Self::ENV_OUTPUT_DIR) {
            cfg.builds_dir = dir;
        }
        cfg
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("Assets")
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.assets_dir().join("Plugins")
    }

    pub fn extras_path(&self) -> PathBuf {
        self.assets_dir().join(&self.extras_dir)
    }

    pub fn default_output_root(&self) -> PathBuf {
        self.root.join(&self.builds_dir)
    }

    pub fn should_copy(&self, file_name: &str) -> bool {
        !self
            .ignored_extensions
            .iter()
            .any(|ext| file_name.ends_with(ext.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub project: ProjectConfig,
    pub ipc: IpcConfig,
}

impl ServerConfig {
    pub fn load() -> Self {
        Self {
            project: ProjectConfig::from_env(),
            ipc: IpcConfig::default(),
        }
    }
}
