//! A single discovered screenshot or screen recording.

use crate::file_utils::is_recording_path;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use uuid::Uuid;

/// Opaque identity of one constructed [`Screenshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenshotId(Uuid);

impl ScreenshotId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ScreenshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable value describing one capture file.
///
/// Equality and hashing use only the identity: two values built from the
/// same path are different screenshots.
#[derive(Debug, Clone)]
pub struct Screenshot {
    id: ScreenshotId,
    path: PathBuf,
    display_name: String,
    captured_at: DateTime<Local>,
    is_recording: bool,
}

impl Screenshot {
    /// Builds a screenshot from a file path, reading its timestamp from disk.
    pub fn from_path(path: PathBuf) -> Self {
        let captured_at = capture_time(&path);
        Self::with_captured_at(path, captured_at)
    }

    /// Builds a screenshot with an explicit timestamp.
    pub fn with_captured_at(path: PathBuf, captured_at: DateTime<Local>) -> Self {
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_recording = is_recording_path(&path);

        Self {
            id: ScreenshotId::new(),
            path,
            display_name,
            captured_at,
            is_recording,
        }
    }

    pub fn id(&self) -> ScreenshotId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }
}

impl PartialEq for Screenshot {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Screenshot {}

impl Hash for Screenshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Creation time, then modification time where the platform has no birth time, then now.
fn capture_time(path: &Path) -> DateTime<Local> {
    let timestamp = fs::metadata(path)
        .ok()
        .and_then(|meta| meta.created().or_else(|_| meta.modified()).ok())
        .unwrap_or_else(SystemTime::now);

    DateTime::<Local>::from(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    #[test]
    fn same_path_yields_distinct_identities() {
        let path = PathBuf::from("/tmp/Screenshot 1.png");
        let a = Screenshot::from_path(path.clone());
        let b = Screenshot::from_path(path);

        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);

        let set: HashSet<Screenshot> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn recording_flag_ignores_extension_case() {
        for name in ["Screen Recording.mov", "Screen Recording.MOV", "Screen Recording.Mov"] {
            let shot = Screenshot::from_path(PathBuf::from("/tmp").join(name));
            assert!(shot.is_recording(), "{name} should be a recording");
        }
        assert!(!Screenshot::from_path(PathBuf::from("/tmp/Screenshot.png")).is_recording());
    }

    #[test]
    fn display_name_is_base_name() {
        let shot = Screenshot::from_path(PathBuf::from("/tmp/dir/Screenshot real.png"));
        assert_eq!(shot.display_name(), "Screenshot real.png");
        assert_eq!(shot.path(), Path::new("/tmp/dir/Screenshot real.png"));
    }

    #[test]
    fn unreadable_file_falls_back_to_now() {
        let before = Local::now();
        let shot = Screenshot::from_path(PathBuf::from("/definitely/missing/Screenshot.png"));
        assert!(shot.captured_at() >= before);
    }

    #[test]
    fn existing_file_uses_disk_timestamp() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("Screenshot a.png");
        std::fs::write(&path, b"x").expect("write");
        let after_write = Local::now();

        let shot = Screenshot::from_path(path);
        assert!(shot.captured_at() <= after_write);
    }
}
