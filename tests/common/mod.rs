//! In-memory editor used by the orchestrator and post-build tests.

use std::collections::HashMap;
use std::sync::Mutex;

use unity_build_tools::bridge::proto::{BuildPlayerSpec, EditorState, PipelineReport};
use unity_build_tools::bridge::{EditorBridge, IpcError};
use unity_build_tools::defines::BuildMode;
use unity_build_tools::platform::{BuildTarget, TargetGroup};
use unity_build_tools::report::BuildClassification;
use unity_build_tools::version::VersionBump;

/// Mutable editor world backing the fake bridge.
pub struct EditorWorld {
    pub product_name: String,
    pub company_name: String,
    pub version: String,
    pub target: BuildTarget,
    pub group: TargetGroup,
    pub mode: BuildMode,
    pub defines: HashMap<TargetGroup, String>,
    pub scenes: Vec<String>,
    pub build_result: BuildClassification,
    pub switch_accepted: bool,
    pub fail_build_ipc: bool,
    pub builds: Vec<BuildPlayerSpec>,
    pub defines_at_build: Vec<String>,
    pub applied_versions: Vec<VersionBump>,
    pub target_switches: Vec<(TargetGroup, BuildTarget)>,
}

impl Default for EditorWorld {
    fn default() -> Self {
        let mut defines = HashMap::new();
        defines.insert(TargetGroup::Standalone, "POST_FX".to_string());
        Self {
            product_name: "Rogue".to_string(),
            company_name: "NBROS".to_string(),
            version: "1.2.3b4".to_string(),
            target: BuildTarget::StandaloneWindows64,
            group: TargetGroup::Standalone,
            mode: BuildMode::None,
            defines,
            scenes: vec!["Assets/Scenes/Main.unity".to_string()],
            build_result: BuildClassification::Succeeded,
            switch_accepted: true,
            fail_build_ipc: false,
            builds: Vec::new(),
            defines_at_build: Vec::new(),
            applied_versions: Vec::new(),
            target_switches: Vec::new(),
        }
    }
}

pub struct FakeEditor {
    pub world: Mutex<EditorWorld>,
}

impl FakeEditor {
    pub fn new(world: EditorWorld) -> Self {
        Self {
            world: Mutex::new(world),
        }
    }
}

impl EditorBridge for FakeEditor {
    async fn editor_state(&self) -> Result<EditorState, IpcError> {
        let world = self.world.lock().unwrap();
        Ok(EditorState {
            product_name: world.product_name.clone(),
            company_name: world.company_name.clone(),
            version: world.version.clone(),
            target: world.target,
            group: world.group,
            mode: world.mode,
        })
    }

    async fn defines(&self, group: TargetGroup) -> Result<String, IpcError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .defines
            .get(&group)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_defines(&self, group: TargetGroup, defines: &str) -> Result<(), IpcError> {
        self.world
            .lock()
            .unwrap()
            .defines
            .insert(group, defines.to_string());
        Ok(())
    }

    async fn apply_version(&self, bump: &VersionBump) -> Result<(), IpcError> {
        let mut world = self.world.lock().unwrap();
        world.version = bump.version.clone();
        world.applied_versions.push(bump.clone());
        Ok(())
    }

    async fn switch_target(
        &self,
        group: TargetGroup,
        target: BuildTarget,
    ) -> Result<bool, IpcError> {
        let mut world = self.world.lock().unwrap();
        world.target_switches.push((group, target));
        if world.switch_accepted {
            world.group = group;
            world.target = target;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn refresh_assets(&self) -> Result<(), IpcError> {
        Ok(())
    }

    async fn scene_list(&self) -> Result<Vec<String>, IpcError> {
        Ok(self.world.lock().unwrap().scenes.clone())
    }

    async fn build_player(&self, spec: &BuildPlayerSpec) -> Result<PipelineReport, IpcError> {
        let mut world = self.world.lock().unwrap();
        if world.fail_build_ipc {
            return Err(IpcError::Closed);
        }
        let active = world.defines.get(&spec.group).cloned().unwrap_or_default();
        world.defines_at_build.push(active);
        world.builds.push(spec.clone());
        Ok(PipelineReport {
            result: world.build_result,
            build_time_ms: 42_000,
            total_size: 128 * 1024 * 1024,
            output_path: spec.location_path.clone(),
            warnings: 1,
            errors: if world.build_result == BuildClassification::Succeeded {
                0
            } else {
                3
            },
            message: String::new(),
        })
    }
}
