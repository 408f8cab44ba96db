use std::time::Duration;

use rmcp::{model::CallToolResult, ErrorData as McpError};
use serde::{Deserialize, Serialize};

use crate::mcp::service::BuildService;
use crate::mcp::tools::build::to_result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeStatusOut {
    pub connected: bool,
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthOut {
    pub ready: bool,
    pub version: String,
}

impl BuildService {
    pub(super) async fn do_unity_bridge_status(&self) -> Result<CallToolResult, McpError> {
        to_result(&BridgeStatusOut {
            connected: self.is_connected().await,
            endpoint: self.endpoint_description(),
        })
    }

    pub(super) async fn do_unity_health(&self) -> Result<CallToolResult, McpError> {
        let (bridge, _gate) = self
            .require_bridge()
            .await
            .map_err(|e| McpError::internal_error(format!("Bridge error: {}", e), None))?;

        let health = bridge
            .health(Duration::from_millis(1500))
            .await
            .map_err(|e| McpError::internal_error(format!("Bridge IPC error: {}", e), None))?;

        to_result(&HealthOut {
            ready: health.ready,
            version: health.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_output_serializes_cleanly() {
        let health = HealthOut {
            ready: true,
            version: "6000.0.0f1".to_string(),
        };

        let content = serde_json::to_string(&health).expect("serialization should succeed");
        let parsed: HealthOut =
            serde_json::from_str(&content).expect("deserialization should succeed");

        assert!(parsed.ready);
        assert_eq!(parsed.version, "6000.0.0f1");
    }
}
