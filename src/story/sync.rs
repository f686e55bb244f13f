//! Best-effort mirror of story state into the static snapshot file.
//!
//! The database is the source of truth. A refresh runs after the mutation has
//! committed and every failure here is logged and reported as a
//! [`SyncOutcome`], never as an error.

use std::path::{Path, PathBuf};

use crate::{
    core::{config::AppConfig, types::StoryPayload},
    db::{repositories::stories, Database},
    story::payload::{build_payload, render_snapshot},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Written { bytes: usize },
    Unchanged,
    /// The story was gone by the time the refresh ran.
    StoryMissing,
    /// No snapshot file exists at the configured path; none is created.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SnapshotSync {
    path: PathBuf,
}

impl SnapshotSync {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.snapshot_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn sync_story(&self, db: &Database, story_id: i64) -> SyncOutcome {
        let story = match stories::find_story(db.pool(), story_id).await {
            Ok(Some(story)) => story,
            Ok(None) => {
                tracing::debug!(story_id, "story no longer exists, snapshot left untouched");
                return SyncOutcome::StoryMissing;
            }
            Err(err) => {
                tracing::warn!(story_id, "failed to load story for snapshot sync: {err}");
                return SyncOutcome::Failed(err.to_string());
            }
        };
        self.write_payload(&build_payload(&story))
    }

    pub fn write_payload(&self, payload: &StoryPayload) -> SyncOutcome {
        if !self.path.exists() {
            tracing::warn!(
                path = %self.path.display(),
                "story snapshot not found; skipping sync to avoid creating new files"
            );
            return SyncOutcome::Skipped;
        }

        let rendered = match render_snapshot(payload) {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::warn!(story_id = payload.id, "failed to render story snapshot: {err}");
                return SyncOutcome::Failed(err.to_string());
            }
        };

        if let Ok(existing) = std::fs::read(&self.path) {
            if existing == rendered.as_bytes() {
                tracing::debug!(story_id = payload.id, "story snapshot already up to date");
                return SyncOutcome::Unchanged;
            }
        }

        match std::fs::write(&self.path, rendered.as_bytes()) {
            Ok(()) => {
                tracing::info!(
                    story_id = payload.id,
                    path = %self.path.display(),
                    bytes = rendered.len(),
                    "story snapshot refreshed"
                );
                SyncOutcome::Written {
                    bytes: rendered.len(),
                }
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "failed to sync story snapshot: {err}");
                SyncOutcome::Failed(err.to_string())
            }
        }
    }
}
