//! JSON file persistence with corruption quarantine.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Outcome of loading a persisted JSON file.
#[derive(Debug)]
pub enum Loaded<T> {
    /// The file parsed.
    Ok(T),
    /// The file does not exist yet.
    Missing,
    /// The file was malformed and has been renamed to `moved_to`.
    Quarantined { moved_to: PathBuf, reason: String },
}

/// Load `path` as JSON. A malformed file is renamed aside to
/// `<file>.corrupt-<unix-seconds>` and never rewritten in place.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Loaded<T>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No persisted file yet");
            return Ok(Loaded::Missing);
        }
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            return quarantine(path, e.to_string());
        }
        Err(e) => return Err(StoreError::read(path, e)),
    };

    match serde_json::from_str(&content) {
        Ok(value) => Ok(Loaded::Ok(value)),
        Err(e) => quarantine(path, e.to_string()),
    }
}

fn quarantine<T>(path: &Path, reason: String) -> Result<Loaded<T>, StoreError> {
    let moved_to = quarantine_path(path);
    std::fs::rename(path, &moved_to).map_err(|e| StoreError::Write {
        path: moved_to.clone(),
        source: e,
    })?;
    warn!(
        path = %path.display(),
        moved_to = %moved_to.display(),
        reason = %reason,
        "Corrupt file moved aside"
    );
    Ok(Loaded::Quarantined { moved_to, reason })
}

fn quarantine_path(path: &Path) -> PathBuf {
    let base = format!("{}.corrupt-{}", path.display(), Utc::now().timestamp());
    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{}-{}", base, n));
        n += 1;
    }
    candidate
}

/// Write `value` as pretty JSON via a temporary file and rename, so a crash
/// never leaves a half-written file behind.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let content = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    std::fs::write(&tmp, content).map_err(|e| StoreError::Write {
        path: tmp.clone(),
        source: e,
    })?;
    std::fs::rename(&tmp, path).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), "Saved");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
