mod atomic;

pub use atomic::atomic_write;

use std::path::{Path, PathBuf};

/// Name of the per-user data directory under `$HOME`.
pub const HOME_FOLDER: &str = ".story-ranks";

/// Environment variable overriding the per-user data directory.
pub const HOME_ENV: &str = "STORY_RANKS_HOME";

/// File extension used for story documents.
pub const STORY_EXTENSION: &str = "md";

/// Resolve the per-user data directory (`~/.story-ranks`).
///
/// `STORY_RANKS_HOME` wins when set so tests and CI can isolate their data.
#[must_use]
pub fn data_home() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HOME_FOLDER)
}

/// Default Markdown store directory.
#[must_use]
pub fn default_store_dir() -> PathBuf {
    data_home().join("stories")
}

/// Default log directory.
#[must_use]
pub fn default_log_dir() -> PathBuf {
    data_home().join("logs")
}

/// Whether `id` can name a document directly inside a store directory.
///
/// Rejects empty ids, path separators and `..`.
#[must_use]
pub fn is_valid_story_id(id: &str) -> bool {
    !id.trim().is_empty() && !id.contains("..") && !id.contains('/') && !id.contains('\\')
}

/// Path of the document holding story `id` inside `store_dir`.
///
/// Callers must check the id with [`is_valid_story_id`] first.
#[must_use]
pub fn story_path(store_dir: &Path, id: &str) -> PathBuf {
    store_dir.join(format!("{id}.{STORY_EXTENSION}"))
}

/// Whether a directory entry name looks like a story document.
#[must_use]
pub fn is_story_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(STORY_EXTENSION))
}

/// Get current timestamp in ISO 8601 format
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
