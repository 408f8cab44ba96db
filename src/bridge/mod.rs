//! Transport and contract for talking to the editor.
//!
//! Everything the build tools need from the host editor goes through the
//! [`EditorBridge`] trait; the real implementation is [`EditorClient`],
//! speaking length-delimited JSON envelopes over a local socket. Tests swap
//! in in-memory fakes.

pub mod client;
pub mod codec;
pub mod framing;
pub mod path;
pub mod proto;

pub use client::{EditorClient, IpcError};

use crate::platform::{BuildTarget, TargetGroup};
use crate::version::VersionBump;

/// The host editor as the build tools see it: a handful of settings
/// accessors, a target switcher and the player build pipeline itself.
#[allow(async_fn_in_trait)]
pub trait EditorBridge {
    /// Player settings plus the currently active target.
    async fn editor_state(&self) -> Result<proto::EditorState, IpcError>;

    /// Scripting define symbols of a settings group, semicolon-joined.
    async fn defines(&self, group: TargetGroup) -> Result<String, IpcError>;

    async fn set_defines(&self, group: TargetGroup, defines: &str) -> Result<(), IpcError>;

    /// Persists a new version string together with the per-platform build
    /// numbers and the Android version code derived from it.
    async fn apply_version(&self, bump: &VersionBump) -> Result<(), IpcError>;

    /// Asks the editor to switch its active build target. May be deferred on
    /// the editor side; the flag only reports whether the switch was
    /// accepted.
    async fn switch_target(&self, group: TargetGroup, target: BuildTarget)
        -> Result<bool, IpcError>;

    /// Re-imports assets after files were moved under the project root.
    async fn refresh_assets(&self) -> Result<(), IpcError>;

    /// Scene paths from the editor build settings, used when a request does
    /// not pin its own list.
    async fn scene_list(&self) -> Result<Vec<String>, IpcError>;

    /// Runs the player build pipeline. Blocks until the editor reports a
    /// definitive result, however long that takes.
    async fn build_player(
        &self,
        spec: &proto::BuildPlayerSpec,
    ) -> Result<proto::PipelineReport, IpcError>;
}
