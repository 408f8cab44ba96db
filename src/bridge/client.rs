use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net,
    sync::{broadcast, mpsc, oneshot, Mutex},
    time,
};

use super::{
    codec, framing,
    path::{default_endpoint, parse_endpoint, Endpoint, IpcConfig},
    proto::{self, Envelope, EnvelopeKind},
    EditorBridge,
};
use crate::platform::{BuildTarget, TargetGroup};
use crate::version::VersionBump;

// Trait for stream types that can be used with the bridge connection
trait BridgeStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> BridgeStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

#[derive(Debug, Error)]
pub enum IpcError {
    #[error("connect timeout")]
    ConnectTimeout,
    #[error("handshake failed: {0}")]
    Handshake(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec: {0}")]
    Codec(#[from] codec::CodecError),
    #[error("request timeout")]
    RequestTimeout,
    #[error("connection closed")]
    Closed,
    #[error("editor rejected request: {0}")]
    Editor(String),
    #[error("unexpected response type")]
    UnexpectedResponse,
}

/// Connection to the editor-side bridge plugin.
///
/// Cheap to clone; all clones share one socket, one pending-request table
/// and one event stream.
#[derive(Clone)]
pub struct EditorClient {
    inner: Arc<Inner>,
}

struct Inner {
    cfg: IpcConfig,
    corr: AtomicU64,
    pending: Mutex<HashMap<String, oneshot::Sender<proto::Response>>>,
    events_tx: broadcast::Sender<proto::Event>,
    // Write side: an mpsc channel serializes outgoing frames
    tx: mpsc::Sender<Bytes>,
}

impl EditorClient {
    pub async fn connect(cfg: IpcConfig, project_root: String) -> Result<Self, IpcError> {
        let endpoint = cfg
            .endpoint
            .as_deref()
            .map(parse_endpoint)
            .unwrap_or_else(default_endpoint);
        let (writer_tx, writer_rx) = mpsc::channel::<Bytes>(1024);
        let (events_tx, _events_rx) = broadcast::channel(1024);

        let inner = Arc::new(Inner {
            cfg,
            corr: AtomicU64::new(rand::random()),
            pending: Mutex::new(HashMap::new()),
            events_tx,
            tx: writer_tx,
        });

        Self::spawn_io(inner.clone(), endpoint, project_root, writer_rx).await?;
        Ok(Self { inner })
    }

    /// Subscribe to events pushed by the editor (post-build notifications,
    /// log lines).
    pub fn events(&self) -> broadcast::Receiver<proto::Event> {
        self.inner.events_tx.subscribe()
    }

    fn next_cid(&self) -> String {
        format!("{:016x}", self.inner.corr.fetch_add(1, Ordering::Relaxed))
    }

    pub async fn request(
        &self,
        req: proto::Request,
        timeout: Duration,
    ) -> Result<proto::Response, IpcError> {
        let cid = self.next_cid();
        let env = Envelope {
            correlation_id: cid.clone(),
            kind: EnvelopeKind::Request(req),
        };
        let bytes = codec::encode_envelope(&env)?;

        let (tx, rx) = oneshot::channel();
        self.inner.pending.lock().await.insert(cid.clone(), tx);
        self.inner
            .tx
            .send(bytes)
            .await
            .map_err(|_| IpcError::Closed)?;

        match time::timeout(timeout, rx).await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(_canceled)) => Err(IpcError::Closed),
            Err(_elapsed) => {
                self.inner.pending.lock().await.remove(&cid);
                Err(IpcError::RequestTimeout)
            }
        }
    }

    pub async fn health(&self, timeout: Duration) -> Result<proto::HealthInfo, IpcError> {
        match self.request(proto::Request::Health, timeout).await? {
            proto::Response::Health(h) => Ok(h),
            other => Err(unexpected(other)),
        }
    }

    fn call_timeout(&self) -> Duration {
        self.inner.cfg.call_timeout
    }

    async fn spawn_io(
        inner: Arc<Inner>,
        endpoint: Endpoint,
        project_root: String,
        mut writer_rx: mpsc::Receiver<Bytes>,
    ) -> Result<(), IpcError> {
        // 1) connect
        let io = connect_endpoint(&endpoint, inner.cfg.connect_timeout).await?;
        let mut framed = framing::into_framed(io);

        // 2) handshake
        let hello = proto::Hello {
            token: inner.cfg.token.clone().unwrap_or_default(),
            client_name: env!("CARGO_PKG_NAME").to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            project_root,
        };
        let env = Envelope {
            correlation_id: String::new(),
            kind: EnvelopeKind::Request(proto::Request::Hello(hello)),
        };
        let hello_bytes = codec::encode_envelope(&env)?;
        framed.send(hello_bytes).await.map_err(IpcError::Io)?;

        // Wait for the welcome before any regular traffic
        let welcome = time::timeout(inner.cfg.handshake_timeout, async {
            while let Some(frame) = framed.next().await {
                let bytes = frame.map_err(IpcError::Io)?;
                let env = codec::decode_envelope(bytes.freeze())?;
                if let EnvelopeKind::Response(proto::Response::Welcome(w)) = env.kind {
                    return Ok::<_, IpcError>(w);
                }
            }
            Err(IpcError::Handshake("no welcome".into()))
        })
        .await
        .map_err(|_| IpcError::ConnectTimeout)??;
        if !welcome.ok {
            return Err(IpcError::Handshake(welcome.error));
        }
        tracing::info!(editor = %welcome.editor_version, "connected to editor bridge");

        // 3) spawn writer
        let (mut writer, mut reader) = framed.split();
        tokio::spawn(async move {
            while let Some(bytes) = writer_rx.recv().await {
                if writer.send(bytes).await.is_err() {
                    break;
                }
            }
        });

        // 4) spawn reader (responses/events)
        tokio::spawn(async move {
            while let Some(frame) = reader.next().await {
                let Ok(bytes) = frame else {
                    break;
                };
                let Ok(env) = codec::decode_envelope(bytes.freeze()) else {
                    continue;
                };
                match env.kind {
                    EnvelopeKind::Response(resp) => {
                        let mut pending = inner.pending.lock().await;
                        if let Some(tx) = pending.remove(&env.correlation_id) {
                            let _ = tx.send(resp);
                        }
                    }
                    EnvelopeKind::Event(ev) => {
                        let _ = inner.events_tx.send(ev);
                    }
                    EnvelopeKind::Request(_) => {}
                }
            }
            // Drop every waiter so callers see Closed instead of hanging
            inner.pending.lock().await.clear();
        });

        Ok(())
    }
}

impl EditorBridge for EditorClient {
    async fn editor_state(&self) -> Result<proto::EditorState, IpcError> {
        match self
            .request(proto::Request::EditorState, self.call_timeout())
            .await?
        {
            proto::Response::EditorState(state) => Ok(state),
            other => Err(unexpected(other)),
        }
    }

    async fn defines(&self, group: TargetGroup) -> Result<String, IpcError> {
        match self
            .request(proto::Request::GetDefines { group }, self.call_timeout())
            .await?
        {
            proto::Response::Defines { defines } => Ok(defines),
            other => Err(unexpected(other)),
        }
    }

    async fn set_defines(&self, group: TargetGroup, defines: &str) -> Result<(), IpcError> {
        let req = proto::Request::SetDefines {
            group,
            defines: defines.to_string(),
        };
        expect_ack(self.request(req, self.call_timeout()).await?)
    }

    async fn apply_version(&self, bump: &VersionBump) -> Result<(), IpcError> {
        let req = proto::Request::ApplyVersion(bump.clone());
        expect_ack(self.request(req, self.call_timeout()).await?)
    }

    async fn switch_target(
        &self,
        group: TargetGroup,
        target: BuildTarget,
    ) -> Result<bool, IpcError> {
        match self
            .request(
                proto::Request::SwitchTarget { group, target },
                self.call_timeout(),
            )
            .await?
        {
            proto::Response::SwitchTarget { ok } => Ok(ok),
            other => Err(unexpected(other)),
        }
    }

    async fn refresh_assets(&self) -> Result<(), IpcError> {
        expect_ack(
            self.request(proto::Request::RefreshAssets, self.call_timeout())
                .await?,
        )
    }

    async fn scene_list(&self) -> Result<Vec<String>, IpcError> {
        match self
            .request(proto::Request::SceneList, self.call_timeout())
            .await?
        {
            proto::Response::Scenes { scenes } => Ok(scenes),
            other => Err(unexpected(other)),
        }
    }

    async fn build_player(
        &self,
        spec: &proto::BuildPlayerSpec,
    ) -> Result<proto::PipelineReport, IpcError> {
        let req = proto::Request::BuildPlayer(spec.clone());
        match self.request(req, self.inner.cfg.build_timeout).await? {
            proto::Response::Build(report) => Ok(report),
            other => Err(unexpected(other)),
        }
    }
}

fn expect_ack(response: proto::Response) -> Result<(), IpcError> {
    match response {
        proto::Response::Ack { ok: true } => Ok(()),
        proto::Response::Ack { ok: false } => Err(IpcError::Editor("request rejected".into())),
        other => Err(unexpected(other)),
    }
}

fn unexpected(response: proto::Response) -> IpcError {
    match response {
        proto::Response::Error { message } => IpcError::Editor(message),
        _ => IpcError::UnexpectedResponse,
    }
}

async fn connect_endpoint(
    endpoint: &Endpoint,
    timeout: Duration,
) -> Result<Box<dyn BridgeStream>, IpcError> {
    use tokio::time::timeout as tokio_timeout;
    match endpoint {
        #[cfg(unix)]
        Endpoint::Unix(path) => {
            let fut = net::UnixStream::connect(path);
            let stream = tokio_timeout(timeout, fut)
                .await
                .map_err(|_| IpcError::ConnectTimeout)??;
            Ok(Box::new(stream))
        }
        #[cfg(windows)]
        Endpoint::Pipe(name) => {
            use tokio::net::windows::named_pipe::ClientOptions;
            let fut = ClientOptions::new().open(name);
            let stream = tokio_timeout(timeout, fut)
                .await
                .map_err(|_| IpcError::ConnectTimeout)??;
            Ok(Box::new(stream))
        }
        Endpoint::Tcp(addr) => {
            let fut = net::TcpStream::connect(addr);
            let stream = tokio_timeout(timeout, fut)
                .await
                .map_err(|_| IpcError::ConnectTimeout)??;
            Ok(Box::new(stream))
        }
    }
}
