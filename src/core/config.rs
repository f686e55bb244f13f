use std::path::{Path, PathBuf};

use crate::core::errors::{AppError, AppResult};

pub const SNAPSHOT_FILE_NAME: &str = "story.json";
pub const FRONTEND_DIR_NAME: &str = "frontend";

const DATA_DIR_ENV: &str = "STORYLINE_DATA_DIR";
const SNAPSHOT_PATH_ENV: &str = "STORYLINE_SNAPSHOT_PATH";

/// Process-wide settings, resolved once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub snapshot_path: PathBuf,
}

impl AppConfig {
    pub fn new(data_dir: impl Into<PathBuf>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            snapshot_path: snapshot_path.into(),
        }
    }

    pub fn from_env(app_root: &Path) -> AppResult<Self> {
        let data_dir = match non_empty_env(DATA_DIR_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_data_dir(None)?,
        };
        let snapshot_path = match non_empty_env(SNAPSHOT_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => discover_snapshot_path(app_root),
        };
        Ok(Self {
            data_dir,
            snapshot_path,
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn default_data_dir(base: Option<PathBuf>) -> AppResult<PathBuf> {
    if let Some(path) = base {
        return Ok(path);
    }
    let mut cwd = std::env::current_dir().map_err(|err| AppError::Io(err.to_string()))?;
    cwd.push(".storyline");
    Ok(cwd)
}

/// Public directories probed for the snapshot, most specific first.
pub fn candidate_public_dirs(app_root: &Path) -> Vec<PathBuf> {
    let mut dirs = vec![app_root.join("public")];
    if let Some(project_root) = app_root.parent() {
        dirs.push(project_root.join(FRONTEND_DIR_NAME).join("public"));
        if let Some(outer_root) = project_root.parent() {
            dirs.push(outer_root.join(FRONTEND_DIR_NAME).join("public"));
        }
    }
    dirs
}

/// Picks the first candidate already holding a snapshot, then the first
/// existing public directory. Falls back to the app-local candidate, in which
/// case snapshot refreshes are skipped until someone creates the file.
pub fn discover_snapshot_path(app_root: &Path) -> PathBuf {
    let candidates = candidate_public_dirs(app_root);

    if let Some(found) = candidates
        .iter()
        .map(|dir| dir.join(SNAPSHOT_FILE_NAME))
        .find(|path| path.is_file())
    {
        return found;
    }

    if let Some(dir) = candidates.iter().find(|dir| dir.is_dir()) {
        return dir.join(SNAPSHOT_FILE_NAME);
    }

    let fallback = app_root.join("public").join(SNAPSHOT_FILE_NAME);
    tracing::warn!(
        path = %fallback.display(),
        "no public directory found for the story snapshot; set {SNAPSHOT_PATH_ENV} to configure one"
    );
    fallback
}
