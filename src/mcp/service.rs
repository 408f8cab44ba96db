use std::path::Path;
use std::sync::Arc;

use rmcp::{
    handler::server::tool::ToolRouter, model::*, tool_handler, transport::stdio, ServerHandler,
    ServiceExt,
};
use tokio::sync::{broadcast, Mutex, OnceCell};

use crate::bridge::{proto, EditorClient, IpcError};
use crate::config::ServerConfig;
use crate::defines::DefineRegistry;
use crate::postbuild::PostBuildFinisher;
use crate::staging::StagingPlan;
use crate::state::{PriorState, TransactionGate};

#[derive(Clone)]
pub struct BuildService {
    tool_router: ToolRouter<Self>,
    state: Arc<ServiceState>,
}

struct ServiceState {
    config: ServerConfig,
    registry: DefineRegistry,
    staging: StagingPlan,
    bridge: Mutex<Option<EditorClient>>,
    // Prior editor state, captured on first connect; doubles as the
    // single-flight gate for build transactions.
    gate: OnceCell<TransactionGate>,
}

impl BuildService {
    pub fn new(config: ServerConfig) -> Self {
        let staging = StagingPlan::for_project(config.project.plugins_dir());
        Self {
            tool_router: super::tools::make_tool_router(),
            state: Arc::new(ServiceState {
                config,
                registry: DefineRegistry::default(),
                staging,
                bridge: Mutex::new(None),
                gate: OnceCell::new(),
            }),
        }
    }

    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }

    pub(crate) fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    pub(crate) fn registry(&self) -> &DefineRegistry {
        &self.state.registry
    }

    pub(crate) fn staging(&self) -> &StagingPlan {
        &self.state.staging
    }

    pub(crate) async fn is_connected(&self) -> bool {
        self.state.bridge.lock().await.is_some()
    }

    pub(crate) fn endpoint_description(&self) -> String {
        self.state
            .config
            .ipc
            .endpoint
            .clone()
            .unwrap_or_else(|| "tcp://127.0.0.1:7777".to_string())
    }

    /// Connects to the editor bridge on first use. The first successful
    /// connection also captures the prior editor state and starts the
    /// post-build event pump.
    pub(crate) async fn require_bridge(
        &self,
    ) -> Result<(EditorClient, &TransactionGate), IpcError> {
        let mut slot = self.state.bridge.lock().await;

        let client = match slot.as_ref() {
            Some(client) => client.clone(),
            None => {
                let root = self
                    .state
                    .config
                    .project
                    .root
                    .to_string_lossy()
                    .into_owned();
                let client = EditorClient::connect(self.state.config.ipc.clone(), root).await?;
                self.spawn_event_pump(client.clone());
                *slot = Some(client.clone());
                client
            }
        };

        let gate = self
            .state
            .gate
            .get_or_try_init(|| async {
                PriorState::capture(&client).await.map(TransactionGate::new)
            })
            .await?;

        Ok((client, gate))
    }

    fn spawn_event_pump(&self, client: EditorClient) {
        let state = self.state.clone();
        let mut events = client.events();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(proto::Event::BuildFinished {
                        target,
                        output_path,
                    }) => {
                        let finisher = PostBuildFinisher::new(&client, &state.config.project);
                        if let Err(e) = finisher
                            .on_build_complete(target, Path::new(&output_path))
                            .await
                        {
                            tracing::error!(error = %e, "post-build processing failed");
                        }
                    }
                    Ok(proto::Event::Log { message }) => {
                        tracing::debug!(editor = %message, "editor log");
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "editor event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

#[tool_handler]
impl ServerHandler for BuildService {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            server_info: Implementation {
                name: "unity-build-tools".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::default(),
            instructions: None,
        }
    }
}
