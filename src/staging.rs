//! Exclusion staging for channel-specific plugin folders.
//!
//! The editor imports everything under `Assets/Plugins`, so a Steam-only
//! plugin would leak into a GOG build. Before a build, folders that the
//! requested mode does not want are renamed with a trailing `~` (which the
//! asset importer skips), and renamed back once the transaction is over.

use std::fs;
use std::path::PathBuf;

use crate::defines::BuildMode;

/// Folder suffix the asset importer treats as hidden.
const HIDDEN_SUFFIX: &str = "~";

/// A folder under the plugins root that only one mode may ship.
#[derive(Debug, Clone)]
pub struct StagingRule {
    pub dir: String,
    pub keep_for: BuildMode,
}

/// The set of exclusion rules for a project.
#[derive(Debug, Clone)]
pub struct StagingPlan {
    plugins_root: PathBuf,
    rules: Vec<StagingRule>,
}

impl StagingPlan {
    pub fn new(plugins_root: PathBuf, rules: Vec<StagingRule>) -> Self {
        Self { plugins_root, rules }
    }

    /// Default rule set: the Steam plugin folder ships only in Steam builds.
    pub fn for_project(plugins_root: PathBuf) -> Self {
        Self::new(
            plugins_root,
            vec![StagingRule {
                dir: "Steam".to_string(),
                keep_for: BuildMode::Steam,
            }],
        )
    }

    /// Hides every folder the requested mode must not ship.
    ///
    /// On a mid-way failure the folders already hidden are restored before
    /// the error is returned, so a failed staging never leaves the tree
    /// half-renamed.
    pub fn stage(&self, mode: BuildMode) -> std::io::Result<StagingGuard> {
        let mut guard = StagingGuard { moved: Vec::new(), restored: false };

        for rule in &self.rules {
            if rule.keep_for == mode {
                continue;
            }
            let visible = self.plugins_root.join(&rule.dir);
            if !visible.is_dir() {
                continue;
            }
            let hidden = self.plugins_root.join(format!("{}{}", rule.dir, HIDDEN_SUFFIX));
            tracing::debug!(from = %visible.display(), to = %hidden.display(), "staging exclusion");
            if let Err(e) = fs::rename(&visible, &hidden) {
                guard.restore_now();
                return Err(e);
            }
            guard.moved.push((visible, hidden));
        }

        Ok(guard)
    }
}

/// Undo handle for a staging pass. Restores on drop as a last resort; call
/// [`StagingGuard::restore`] to observe failures.
#[derive(Debug)]
pub struct StagingGuard {
    moved: Vec<(PathBuf, PathBuf)>,
    restored: bool,
}

impl StagingGuard {
    /// Folders currently hidden by this guard.
    pub fn staged_count(&self) -> usize {
        self.moved.len()
    }

    /// Renames every hidden folder back, reporting the first failure after
    /// attempting all of them.
    pub fn restore(mut self) -> std::io::Result<()> {
        self.restore_now()
    }

    fn restore_now(&mut self) -> std::io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        let mut first_error = None;
        for (visible, hidden) in self.moved.drain(..).rev() {
            tracing::debug!(from = %hidden.display(), to = %visible.display(), "unstaging exclusion");
            if let Err(e) = fs::rename(&hidden, &visible) {
                tracing::warn!(dir = %hidden.display(), error = %e, "failed to unstage excluded folder");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        let _ = self.restore_now();
    }
}
