//! Sequencing of one build transaction.
//!
//! A build temporarily rewrites global editor state: plugin folders are
//! hidden, scripting defines swapped, and possibly the active target moved.
//! Whatever the pipeline reports, every one of those mutations is undone
//! before the transaction returns, so the editor is left as it was found.

use std::time::Duration;

use thiserror::Error;

use crate::bridge::proto::{BuildPlayerSpec, PipelineReport};
use crate::bridge::{EditorBridge, IpcError};
use crate::defines::DefineRegistry;
use crate::platform::TargetGroup;
use crate::report::{format_size, BuildOutcome, SizeUnit};
use crate::request::BuildRequest;
use crate::staging::StagingPlan;
use crate::state::PriorState;
use crate::version::{self, IncrementKind, VersionError};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid build output path")]
    InvalidOutputPath,
    #[error("another build is already in progress")]
    BuildInProgress,
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error("editor bridge: {0}")]
    Bridge(#[from] IpcError),
    #[error("filesystem: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs build requests against an editor bridge, one at a time.
pub struct BuildOrchestrator<'a, B> {
    bridge: &'a B,
    registry: &'a DefineRegistry,
    staging: &'a StagingPlan,
}

impl<'a, B: EditorBridge> BuildOrchestrator<'a, B> {
    pub fn new(bridge: &'a B, registry: &'a DefineRegistry, staging: &'a StagingPlan) -> Self {
        Self {
            bridge,
            registry,
            staging,
        }
    }

    /// Runs one build transaction and reports its outcome.
    ///
    /// Validation happens before anything is touched; from the moment the
    /// exclusion folders are staged, the revert phase runs on every exit
    /// path. `prior` is the state the editor is restored to.
    pub async fn run(
        &self,
        prior: &PriorState,
        request: &BuildRequest,
    ) -> Result<BuildOutcome, BuildError> {
        if request.output_root.as_os_str().is_empty() {
            tracing::error!(target = %request.target, "build failed, invalid path");
            return Err(BuildError::InvalidOutputPath);
        }
        if request.scenes.is_empty() {
            tracing::error!("building with no scenes in the request");
        }

        let editor = self.bridge.editor_state().await?;
        let location = request
            .location_path(&editor.product_name, &editor.version)
            .to_string_lossy()
            .into_owned();
        let group = request.target.group();

        tracing::info!(
            target = %request.target,
            mode = %request.mode,
            location = %location,
            "starting build transaction"
        );

        // Idle -> Staged: hide excluded folders, then swap defines.
        let staging = self.staging.stage(request.mode)?;
        if staging.staged_count() > 0 {
            if let Err(e) = self.bridge.refresh_assets().await {
                tracing::warn!(error = %e, "asset refresh after staging failed");
            }
        }

        let staged = {
            let result = self.bridge.defines(group).await;
            match result {
                Ok(current) => {
                    let swapped = self.registry.swap(&current, request.mode);
                    tracing::info!(group = %group, defines = %swapped, "compiling with defines");
                    self.bridge.set_defines(group, &swapped).await
                }
                Err(e) => Err(e),
            }
        };

        // Staged -> Built: hand over to the pipeline, unless staging already
        // went wrong.
        let built: Result<PipelineReport, IpcError> = match staged {
            Ok(()) => {
                let spec = BuildPlayerSpec {
                    target: request.target,
                    group,
                    scenes: request.scenes.clone(),
                    location_path: location,
                    development: request.options.development,
                    scripts_only: request.options.scripts_only,
                    show_built_player: request.options.show_built_player,
                };
                self.bridge.build_player(&spec).await
            }
            Err(e) => Err(e),
        };

        if let Ok(report) = &built {
            log_report(report);
        }

        // Built -> Reverted: runs whatever happened above.
        let mut deferred: Option<BuildError> = None;

        if let Ok(report) = &built {
            if report.result.is_success() {
                match self.bump_version(&editor.version, request.increment).await {
                    Ok(()) => {}
                    Err(e) => deferred = Some(e),
                }
            }
        }

        self.revert_defines(group, prior).await;
        self.revert_target(prior).await;
        if let Err(e) = staging.restore() {
            tracing::warn!(error = %e, "failed to unstage excluded folders");
        } else if let Err(e) = self.bridge.refresh_assets().await {
            tracing::debug!(error = %e, "asset refresh after unstaging failed");
        }

        if let Some(e) = deferred {
            return Err(e);
        }
        match built {
            Ok(report) => Ok(outcome_from(report)),
            Err(e) => Err(BuildError::Bridge(e)),
        }
    }

    /// Applies the semantic version bumps; the per-build number is handled
    /// separately by the post-build step.
    async fn bump_version(&self, current: &str, kind: IncrementKind) -> Result<(), BuildError> {
        match kind {
            IncrementKind::None | IncrementKind::BuildNumber => Ok(()),
            _ => {
                let bump = version::increment(current, kind)?;
                tracing::info!(
                    old = %current,
                    new = %bump.version,
                    code = bump.version_code,
                    "incremented player version"
                );
                self.bridge.apply_version(&bump).await?;
                Ok(())
            }
        }
    }

    /// Puts the define string of the group the transaction touched back to
    /// the recorded snapshot.
    async fn revert_defines(&self, group: TargetGroup, prior: &PriorState) {
        let result = match self.bridge.defines(group).await {
            Ok(current) => {
                let restored = self.registry.restore(&current, &prior.defines);
                self.bridge.set_defines(group, &restored).await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to restore scripting defines");
        }
    }

    async fn revert_target(&self, prior: &PriorState) {
        match self.bridge.switch_target(prior.group, prior.target).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(target = %prior.target, "failed to revert active build target");
            }
            Err(e) => {
                tracing::warn!(target = %prior.target, error = %e, "failed to revert active build target");
            }
        }
    }
}

fn outcome_from(report: PipelineReport) -> BuildOutcome {
    BuildOutcome {
        classification: report.result,
        duration: Duration::from_millis(report.build_time_ms),
        total_size: report.total_size,
        output_path: report.output_path,
        warnings: report.warnings,
        errors: report.errors,
    }
}

fn log_report(report: &PipelineReport) {
    if report.result.is_success() {
        tracing::info!(
            result = %report.result,
            duration_ms = report.build_time_ms,
            size = %format_size(report.total_size, SizeUnit::Mb),
            output = %report.output_path,
            warnings = report.warnings,
            "build succeeded"
        );
    } else {
        tracing::error!(
            result = %report.result,
            errors = report.errors,
            warnings = report.warnings,
            "build failed"
        );
    }
}
