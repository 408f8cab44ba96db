use rmcp::{model::CallToolResult, ErrorData as McpError};
use serde::{Deserialize, Serialize};

use crate::bridge::EditorBridge;
use crate::mcp::service::BuildService;
use crate::mcp::tools::build::{parse_increment, parse_mode, parse_target, to_result};
use crate::mcp::tools::{
    UnityIncrementVersionRequest, UnitySwitchActiveTargetRequest, UnitySwitchBuildModeRequest,
};
use crate::platform::TargetGroup;
use crate::version::{self, IncrementKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchBuildModeOutput {
    pub mode: String,
    pub defines: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchActiveTargetOutput {
    pub ok: bool,
}

impl BuildService {
    pub(super) async fn do_unity_switch_build_mode(
        &self,
        req: UnitySwitchBuildModeRequest,
    ) -> Result<CallToolResult, McpError> {
        let (bridge, gate) = self
            .require_bridge()
            .await
            .map_err(|e| McpError::internal_error(format!("Bridge error: {}", e), None))?;
        let mode = parse_mode(Some(&req.mode))?;

        let mut prior = gate
            .try_begin()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let group = TargetGroup::Standalone;
        let current = bridge
            .defines(group)
            .await
            .map_err(|e| McpError::internal_error(format!("Defines IPC error: {}", e), None))?;
        let swapped = self.registry().swap(&current, mode);
        bridge
            .set_defines(group, &swapped)
            .await
            .map_err(|e| McpError::internal_error(format!("Defines IPC error: {}", e), None))?;

        if req.perpetual.unwrap_or(true) {
            prior.defines = swapped.clone();
            prior.mode = mode;
        }
        tracing::info!(mode = %mode, defines = %swapped, "switched standalone build mode");

        to_result(&SwitchBuildModeOutput {
            mode: mode.to_string(),
            defines: swapped,
        })
    }

    pub(super) async fn do_unity_switch_active_target(
        &self,
        req: UnitySwitchActiveTargetRequest,
    ) -> Result<CallToolResult, McpError> {
        let (bridge, gate) = self
            .require_bridge()
            .await
            .map_err(|e| McpError::internal_error(format!("Bridge error: {}", e), None))?;
        let target = parse_target(&req.platform)?;
        let mode = parse_mode(req.mode.as_deref())?;
        let group = target.group();

        let mut prior = gate
            .try_begin()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let ok = bridge
            .switch_target(group, target)
            .await
            .map_err(|e| McpError::internal_error(format!("Target switch IPC error: {}", e), None))?;

        if ok {
            prior.target = target;
            prior.group = group;
            prior.mode = mode;
        } else {
            tracing::warn!(target = %target, "editor refused the target switch");
        }

        to_result(&SwitchActiveTargetOutput { ok })
    }

    pub(super) async fn do_unity_increment_version(
        &self,
        req: UnityIncrementVersionRequest,
    ) -> Result<CallToolResult, McpError> {
        let (bridge, _gate) = self
            .require_bridge()
            .await
            .map_err(|e| McpError::internal_error(format!("Bridge error: {}", e), None))?;
        let kind = parse_increment(req.kind.as_deref())?;

        let state = bridge
            .editor_state()
            .await
            .map_err(|e| McpError::internal_error(format!("Editor state IPC error: {}", e), None))?;

        let bump = version::increment(&state.version, kind)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        if kind != IncrementKind::None {
            bridge.apply_version(&bump).await.map_err(|e| {
                McpError::internal_error(format!("Version IPC error: {}", e), None)
            })?;
            tracing::info!(old = %state.version, new = %bump.version, "incremented player version");
        }

        to_result(&bump)
    }
}
