//! Wire types exchanged with the editor-side bridge plugin.
//!
//! Every frame is one JSON [`Envelope`]: a correlation id plus a request,
//! response or event payload. Responses echo the id of the request they
//! answer; events carry an empty id.

use serde::{Deserialize, Serialize};

use crate::defines::BuildMode;
use crate::platform::{BuildTarget, TargetGroup};
use crate::report::BuildClassification;
use crate::version::VersionBump;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub correlation_id: String,
    #[serde(flatten)]
    pub kind: EnvelopeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum EnvelopeKind {
    Request(Request),
    Response(Response),
    Event(Event),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum Request {
    Hello(Hello),
    Health,
    EditorState,
    GetDefines { group: TargetGroup },
    SetDefines { group: TargetGroup, defines: String },
    ApplyVersion(VersionBump),
    SwitchTarget { group: TargetGroup, target: BuildTarget },
    RefreshAssets,
    /// Scene paths currently listed in the editor build settings.
    SceneList,
    BuildPlayer(BuildPlayerSpec),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum Response {
    Welcome(Welcome),
    Health(HealthInfo),
    EditorState(EditorState),
    Defines { defines: String },
    Ack { ok: bool },
    SwitchTarget { ok: bool },
    Scenes { scenes: Vec<String> },
    Build(PipelineReport),
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum Event {
    /// Sent by the editor's post-process-build callback once a player has
    /// been written to disk.
    BuildFinished {
        target: BuildTarget,
        output_path: String,
    },
    Log {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    pub token: String,
    pub client_name: String,
    pub client_version: String,
    pub project_root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub ok: bool,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub editor_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    pub ready: bool,
    pub version: String,
    #[serde(default)]
    pub status: String,
}

/// Snapshot of the player settings and active target, as the editor sees
/// them right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub product_name: String,
    pub company_name: String,
    pub version: String,
    pub target: BuildTarget,
    pub group: TargetGroup,
    #[serde(default)]
    pub mode: BuildMode,
}

/// Fully prepared pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlayerSpec {
    pub target: BuildTarget,
    pub group: TargetGroup,
    pub scenes: Vec<String>,
    pub location_path: String,
    pub development: bool,
    pub scripts_only: bool,
    pub show_built_player: bool,
}

/// What the pipeline reported back, success or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub result: BuildClassification,
    pub build_time_ms: u64,
    pub total_size: u64,
    pub output_path: String,
    pub warnings: u32,
    pub errors: u32,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_round_trips() {
        let envelope = Envelope {
            correlation_id: "00000000000000a1".to_string(),
            kind: EnvelopeKind::Request(Request::GetDefines {
                group: TargetGroup::Standalone,
            }),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let back: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.correlation_id, envelope.correlation_id);
        assert!(matches!(
            back.kind,
            EnvelopeKind::Request(Request::GetDefines {
                group: TargetGroup::Standalone
            })
        ));
    }

    #[test]
    fn event_envelope_uses_the_expected_wire_shape() {
        let envelope = Envelope {
            correlation_id: String::new(),
            kind: EnvelopeKind::Event(Event::BuildFinished {
                target: BuildTarget::StandaloneWindows64,
                output_path: "/builds/app/Rogue.exe".to_string(),
            }),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["kind"], "event");
        assert_eq!(value["payload"]["type"], "buildFinished");
        assert_eq!(value["payload"]["body"]["target"], "StandaloneWindows64");
    }
}
