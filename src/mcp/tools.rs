pub mod build;
pub mod health;
pub mod modes;

use std::future::Future;

use rmcp::{
    handler::server::tool::Parameters, model::CallToolResult, tool, tool_router,
    ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::service::BuildService;

#[tool_router]
impl BuildService {
    #[tool(description = "Editor bridge connection status (always available)")]
    pub async fn unity_bridge_status(&self) -> Result<CallToolResult, McpError> {
        self.do_unity_bridge_status().await
    }

    #[tool(description = "Editor bridge health check")]
    pub async fn unity_health(&self) -> Result<CallToolResult, McpError> {
        self.do_unity_health().await
    }

    #[tool(
        description = "Build a player for one platform and distribution mode; editor state is restored afterwards"
    )]
    pub async fn unity_build_player(
        &self,
        Parameters(req): Parameters<UnityBuildPlayerRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.do_unity_build_player(req).await
    }

    #[tool(description = "Build DRM-free players for macOS, Windows x64 and Linux x64 in sequence")]
    pub async fn unity_build_all_desktop(
        &self,
        Parameters(req): Parameters<UnityBuildAllDesktopRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.do_unity_build_all_desktop(req).await
    }

    #[tool(description = "Build a player from a JSON build template")]
    pub async fn unity_build_from_template(
        &self,
        Parameters(req): Parameters<UnityBuildFromTemplateRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.do_unity_build_from_template(req).await
    }

    #[tool(description = "Swap the standalone scripting defines to a distribution mode")]
    pub async fn unity_switch_build_mode(
        &self,
        Parameters(req): Parameters<UnitySwitchBuildModeRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.do_unity_switch_build_mode(req).await
    }

    #[tool(description = "Switch the editor's active build target")]
    pub async fn unity_switch_active_target(
        &self,
        Parameters(req): Parameters<UnitySwitchActiveTargetRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.do_unity_switch_active_target(req).await
    }

    #[tool(description = "Increment the player version (build number by default)")]
    pub async fn unity_increment_version(
        &self,
        Parameters(req): Parameters<UnityIncrementVersionRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.do_unity_increment_version(req).await
    }
}

// Helper to expose the router across modules while the generated
// associated function `tool_router()` remains private to this module.
pub(crate) fn make_tool_router() -> rmcp::handler::server::tool::ToolRouter<BuildService> {
    BuildService::tool_router()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UnityBuildPlayerRequest {
    /// Target platform, e.g. "StandaloneWindows64".
    pub platform: String,
    /// Distribution mode: "None", "Steam", "GOG", "Arcade" or "Switch".
    pub mode: Option<String>,
    /// Scene paths; the editor build-settings list is used when omitted.
    pub scenes: Option<Vec<String>>,
    #[serde(rename = "outputRoot")]
    pub output_root: Option<String>,
    pub development: Option<bool>,
    #[serde(rename = "scriptsOnly")]
    pub scripts_only: Option<bool>,
    /// Version increment policy: "none", "buildNumber", "patch", "minor" or
    /// "major".
    pub increment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UnityBuildAllDesktopRequest {
    pub development: Option<bool>,
    #[serde(rename = "outputRoot")]
    pub output_root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UnityBuildFromTemplateRequest {
    #[serde(rename = "templatePath")]
    pub template_path: String,
    #[serde(rename = "outputRoot")]
    pub output_root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UnitySwitchBuildModeRequest {
    pub mode: String,
    /// Record the swapped defines as the new baseline instead of a
    /// transient change.
    pub perpetual: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UnitySwitchActiveTargetRequest {
    pub platform: String,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UnityIncrementVersionRequest {
    pub kind: Option<String>,
}
