//! Finishing touches applied once the editor reports a completed build.
//!
//! Runs off the editor's post-process-build notification, independent of the
//! build transaction: auxiliary files are copied next to the player, the
//! readme gets a fresh header, and the build number is bumped so the next
//! build is distinguishable even without an explicit version change.

use std::fs;
use std::path::Path;

use chrono::Datelike;

use crate::bridge::EditorBridge;
use crate::config::ProjectConfig;
use crate::orchestrator::BuildError;
use crate::platform::BuildTarget;
use crate::version::{self, IncrementKind};

pub struct PostBuildFinisher<'a, B> {
    bridge: &'a B,
    project: &'a ProjectConfig,
}

impl<'a, B: EditorBridge> PostBuildFinisher<'a, B> {
    pub fn new(bridge: &'a B, project: &'a ProjectConfig) -> Self {
        Self { bridge, project }
    }

    pub async fn on_build_complete(
        &self,
        target: BuildTarget,
        output_path: &Path,
    ) -> Result<(), BuildError> {
        tracing::info!(target = %target, path = %output_path.display(), "post-build processing");

        let build_folder = output_path
            .parent()
            .ok_or(BuildError::InvalidOutputPath)?;

        self.copy_extras(build_folder)?;

        let state = self.bridge.editor_state().await?;
        let year = chrono::Local::now().year();
        update_readme(
            &build_folder.join(&self.project.readme_name),
            &state.product_name,
            &state.company_name,
            &state.version,
            year,
        )?;

        // +1 to the build number, so the next build will be different
        let bump = version::increment(&state.version, IncrementKind::BuildNumber)?;
        tracing::info!(old = %state.version, new = %bump.version, "bumped build number");
        self.bridge.apply_version(&bump).await?;

        Ok(())
    }

    /// Copies every file of the extras folder into the build folder, minus
    /// the ignored sidecar extensions.
    fn copy_extras(&self, build_folder: &Path) -> Result<(), BuildError> {
        let extras = self.project.extras_path();
        if !extras.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(&extras)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !self.project.should_copy(&name) {
                continue;
            }
            fs::copy(entry.path(), build_folder.join(name.as_ref()))?;
        }
        Ok(())
    }
}

/// Rewrites the readme with a current header block.
///
/// An existing header produced by a previous build is replaced, not stacked,
/// so rebuilding into the same folder keeps exactly one header.
fn update_readme(
    path: &Path,
    product: &str,
    company: &str,
    version: &str,
    year: i32,
) -> Result<(), BuildError> {
    let current = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let header = format!("{product}\n©{company}\nv{version} ({year})\n");

    let body = strip_header(&current, product);
    fs::write(path, format!("{header}{body}"))?;
    Ok(())
}

/// Drops a leading header block (product line, © line, version line) if one
/// is present.
fn strip_header<'c>(content: &'c str, product: &str) -> &'c str {
    let mut rest = content;
    let mut lines = content.lines();
    let looks_like_header = matches!(
        (lines.next(), lines.next(), lines.next()),
        (Some(first), Some(second), Some(third))
            if first == product && second.starts_with('©') && third.starts_with('v')
    );
    if looks_like_header {
        for _ in 0..3 {
            rest = match rest.split_once('\n') {
                Some((_, tail)) => tail,
                None => "",
            };
        }
    }
    rest
}
