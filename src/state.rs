//! Snapshot of the editor state a build transaction must put back.

use tokio::sync::{Mutex, MutexGuard};

use crate::bridge::{EditorBridge, IpcError};
use crate::defines::BuildMode;
use crate::orchestrator::BuildError;
use crate::platform::{BuildTarget, TargetGroup};

/// What was active before the current operation: build target, settings
/// group, define string and build mode. Captured once when the bridge comes
/// up and overwritten by perpetual swaps; a build transaction restores the
/// editor to exactly this.
#[derive(Debug, Clone)]
pub struct PriorState {
    pub target: BuildTarget,
    pub group: TargetGroup,
    pub defines: String,
    pub mode: BuildMode,
}

impl PriorState {
    /// Reads the live editor state through the bridge.
    pub async fn capture<B: EditorBridge>(bridge: &B) -> Result<Self, IpcError> {
        let state = bridge.editor_state().await?;
        let defines = bridge.defines(state.group).await?;
        tracing::info!(
            target = %state.target,
            defines = %defines,
            "captured editor build state"
        );
        Ok(Self {
            target: state.target,
            group: state.group,
            defines,
            mode: state.mode,
        })
    }
}

/// Single-flight gate around the prior-state record.
///
/// Whoever holds the guard owns the build transaction; a second caller is
/// turned away immediately instead of queueing, so two builds can never
/// interleave their staging and revert phases.
#[derive(Debug)]
pub struct TransactionGate {
    inner: Mutex<PriorState>,
}

impl TransactionGate {
    pub fn new(prior: PriorState) -> Self {
        Self {
            inner: Mutex::new(prior),
        }
    }

    /// Claims the transaction slot, failing fast when a build is running.
    pub fn try_begin(&self) -> Result<MutexGuard<'_, PriorState>, BuildError> {
        self.inner
            .try_lock()
            .map_err(|_| BuildError::BuildInProgress)
    }
}
