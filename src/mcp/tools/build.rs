use std::path::PathBuf;

use rmcp::{model::CallToolResult, model::Content, ErrorData as McpError};
use serde::{Deserialize, Serialize};

use crate::bridge::{EditorBridge, EditorClient};
use crate::defines::BuildMode;
use crate::mcp::service::BuildService;
use crate::mcp::tools::{
    UnityBuildAllDesktopRequest, UnityBuildFromTemplateRequest, UnityBuildPlayerRequest,
};
use crate::orchestrator::BuildOrchestrator;
use crate::platform::BuildTarget;
use crate::report::{format_size, BuildOutcome, SizeUnit};
use crate::request::{BuildOptions, BuildPhase, BuildRequest};
use crate::state::PriorState;
use crate::template::BuildTemplate;
use crate::version::IncrementKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlayerOutput {
    pub result: String,
    #[serde(rename = "outputPath")]
    pub output_path: String,
    #[serde(rename = "buildTimeMs")]
    pub build_time_ms: u64,
    #[serde(rename = "sizeBytes")]
    pub size_bytes: u64,
    pub size: String,
    pub warnings: u32,
    pub errors: u32,
}

impl From<BuildOutcome> for BuildPlayerOutput {
    fn from(outcome: BuildOutcome) -> Self {
        Self {
            result: outcome.classification.to_string(),
            output_path: outcome.output_path,
            build_time_ms: outcome.duration.as_millis() as u64,
            size: format_size(outcome.total_size, SizeUnit::Mb),
            size_bytes: outcome.total_size,
            warnings: outcome.warnings,
            errors: outcome.errors,
        }
    }
}

impl BuildService {
    pub(super) async fn do_unity_build_player(
        &self,
        req: UnityBuildPlayerRequest,
    ) -> Result<CallToolResult, McpError> {
        let (bridge, gate) = self
            .require_bridge()
            .await
            .map_err(|e| McpError::internal_error(format!("Bridge error: {}", e), None))?;

        let target = parse_target(&req.platform)?;
        let mode = parse_mode(req.mode.as_deref())?;
        let increment = parse_increment(req.increment.as_deref())?;
        let output_root = self.resolve_output_root(req.output_root)?;
        let scenes = self.resolve_scenes(&bridge, req.scenes).await?;

        let request = BuildRequest {
            target,
            mode,
            phase: BuildPhase::Release,
            scenes,
            output_root,
            options: BuildOptions {
                development: req.development.unwrap_or(false),
                scripts_only: req.scripts_only.unwrap_or(false),
                show_built_player: true,
            },
            increment,
        };

        let prior = gate
            .try_begin()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let outcome = self.run_build(&bridge, &prior, &request).await?;

        to_result(&BuildPlayerOutput::from(outcome))
    }

    pub(super) async fn do_unity_build_all_desktop(
        &self,
        req: UnityBuildAllDesktopRequest,
    ) -> Result<CallToolResult, McpError> {
        let (bridge, gate) = self
            .require_bridge()
            .await
            .map_err(|e| McpError::internal_error(format!("Bridge error: {}", e), None))?;

        let output_root = self.resolve_output_root(req.output_root)?;
        let scenes = self.resolve_scenes(&bridge, None).await?;
        let development = req.development.unwrap_or(false);

        let prior = gate
            .try_begin()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let mut outputs = Vec::new();
        for target in [
            BuildTarget::StandaloneOsx,
            BuildTarget::StandaloneWindows64,
            BuildTarget::StandaloneLinux64,
        ] {
            let request = BuildRequest {
                target,
                mode: BuildMode::None,
                phase: BuildPhase::Release,
                scenes: scenes.clone(),
                output_root: output_root.clone(),
                options: BuildOptions {
                    development,
                    scripts_only: false,
                    show_built_player: true,
                },
                increment: IncrementKind::BuildNumber,
            };
            let outcome = self.run_build(&bridge, &prior, &request).await?;
            outputs.push(BuildPlayerOutput::from(outcome));
        }

        to_result(&outputs)
    }

    pub(super) async fn do_unity_build_from_template(
        &self,
        req: UnityBuildFromTemplateRequest,
    ) -> Result<CallToolResult, McpError> {
        let (bridge, gate) = self
            .require_bridge()
            .await
            .map_err(|e| McpError::internal_error(format!("Bridge error: {}", e), None))?;

        let template_path = PathBuf::from(&req.template_path);
        let template = BuildTemplate::load(&template_path)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let output_root = self.resolve_output_root(req.output_root)?;
        let fallback_scenes = self.resolve_scenes(&bridge, None).await?;
        let template_dir = template_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let request = template
            .into_request(&template_dir, output_root, fallback_scenes)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let prior = gate
            .try_begin()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let outcome = self.run_build(&bridge, &prior, &request).await?;

        to_result(&BuildPlayerOutput::from(outcome))
    }

    async fn run_build(
        &self,
        bridge: &EditorClient,
        prior: &PriorState,
        request: &BuildRequest,
    ) -> Result<BuildOutcome, McpError> {
        let orchestrator = BuildOrchestrator::new(bridge, self.registry(), self.staging());
        orchestrator
            .run(prior, request)
            .await
            .map_err(|e| McpError::internal_error(format!("Build error: {}", e), None))
    }

    fn resolve_output_root(&self, requested: Option<String>) -> Result<PathBuf, McpError> {
        let root = requested
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config().project.default_output_root());
        std::fs::create_dir_all(&root).map_err(|e| {
            McpError::internal_error(format!("Cannot create output folder: {}", e), None)
        })?;
        Ok(root)
    }

    async fn resolve_scenes(
        &self,
        bridge: &EditorClient,
        requested: Option<Vec<String>>,
    ) -> Result<Vec<String>, McpError> {
        match requested {
            Some(scenes) if !scenes.is_empty() => Ok(scenes),
            _ => bridge.scene_list().await.map_err(|e| {
                McpError::internal_error(format!("Scene list IPC error: {}", e), None)
            }),
        }
    }
}

pub(super) fn parse_target(name: &str) -> Result<BuildTarget, McpError> {
    BuildTarget::from_str_name(name)
        .ok_or_else(|| McpError::invalid_params(format!("invalid platform: {}", name), None))
}

pub(super) fn parse_mode(name: Option<&str>) -> Result<BuildMode, McpError> {
    match name {
        None => Ok(BuildMode::None),
        Some(name) => BuildMode::from_str_name(name)
            .ok_or_else(|| McpError::invalid_params(format!("invalid build mode: {}", name), None)),
    }
}

pub(super) fn parse_increment(name: Option<&str>) -> Result<IncrementKind, McpError> {
    match name {
        None => Ok(IncrementKind::BuildNumber),
        Some(name) => IncrementKind::from_str_name(name).ok_or_else(|| {
            McpError::invalid_params(format!("invalid increment kind: {}", name), None)
        }),
    }
}

pub(super) fn to_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let content = serde_json::to_string(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(content)]))
}
