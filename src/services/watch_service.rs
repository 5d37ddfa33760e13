//! Service for watching the screenshot directory.
//!
//! Wraps a debounced `notify` watcher. Bursts of events inside the debounce
//! window arrive as one batch, and each relevant batch posts exactly one
//! reload request to the store's mailbox.

use crate::config::WATCH_DEBOUNCE;
use crate::error::{AppError, Result};
use crate::file_utils::{PathExt, is_capture_file};
use crate::state::{Mailbox, StoreMessage};
use log::{debug, warn};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, DebouncedEvent, Debouncer, new_debouncer};
use std::path::{Path, PathBuf};

/// A live watch on one directory. Dropping it stops the watcher thread and releases the OS handle.
pub struct DirectoryWatch {
    directory: PathBuf,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl DirectoryWatch {
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Drop for DirectoryWatch {
    fn drop(&mut self) {
        debug!("Stopped watching {}", self.directory.display());
    }
}

/// Returns true if a change at `path` can alter the capture list of `directory`.
fn is_relevant_change(path: &Path, directory: &Path) -> bool {
    path == directory || is_capture_file(path)
}

/// Handles debounced file system events.
fn handle_debounced_events(
    events: Vec<DebouncedEvent>,
    directory: &Path,
    generation: u64,
    mailbox: &Mailbox,
) {
    let relevant: Vec<_> = events
        .into_iter()
        .filter(|event| is_relevant_change(&event.path, directory))
        .collect();

    if relevant.is_empty() {
        return;
    }

    debug!("Debounced file system events: {} events", relevant.len());
    for event in &relevant {
        debug!("  - {:?} for {}", event.kind, event.path.format_for_log());
    }

    mailbox.post(StoreMessage::DirectoryChanged { generation });
}

/// Starts watching `directory` (non-recursive).
///
/// `generation` is echoed back in every message so the store can drop
/// events that were already queued for a previous directory.
pub fn start_watching(directory: &Path, generation: u64, mailbox: Mailbox) -> Result<DirectoryWatch> {
    let watched = directory.to_path_buf();
    let mut debouncer = new_debouncer(WATCH_DEBOUNCE, move |res: DebounceEventResult| match res {
        Ok(events) => handle_debounced_events(events, &watched, generation, &mailbox),
        Err(error) => warn!("File watcher error: {}", error),
    })
    .map_err(|e| AppError::Watch(format!("Failed to create debouncer: {}", e)))?;

    debouncer
        .watcher()
        .watch(directory, RecursiveMode::NonRecursive)
        .map_err(|e| AppError::Watch(format!("Failed to watch {}: {}", directory.display(), e)))?;

    debug!("Watching {}", directory.display());
    Ok(DirectoryWatch {
        directory: directory.to_path_buf(),
        _debouncer: debouncer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn relevance_filter_matches_captures_and_directory() {
        let dir = Path::new("/shots");
        assert!(is_relevant_change(Path::new("/shots"), dir));
        assert!(is_relevant_change(Path::new("/shots/Screenshot 1.png"), dir));
        assert!(is_relevant_change(Path::new("/shots/Screen Recording 1.mov"), dir));
        assert!(!is_relevant_change(Path::new("/shots/notes.txt"), dir));
        assert!(!is_relevant_change(Path::new("/shots/vacation.png"), dir));
    }

    #[test]
    fn new_capture_posts_reload_with_generation() {
        let dir = tempdir().expect("failed to create temp dir");
        let (tx, rx) = mpsc::channel();
        let mailbox = Mailbox::new(tx, Arc::new(|| {}));

        let watch = start_watching(dir.path(), 7, mailbox).expect("watch");
        assert_eq!(watch.directory(), dir.path());

        std::fs::write(dir.path().join("Screenshot new.png"), b"x").expect("write");

        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(StoreMessage::DirectoryChanged { generation }) => assert_eq!(generation, 7),
            Ok(_) => panic!("unexpected message"),
            Err(e) => panic!("no reload posted: {e}"),
        }
    }

    #[test]
    fn one_batch_posts_one_reload() {
        use notify_debouncer_mini::DebouncedEventKind;

        let (tx, rx) = mpsc::channel();
        let mailbox = Mailbox::new(tx, Arc::new(|| {}));
        let dir = Path::new("/shots");
        let events = vec![
            DebouncedEvent {
                path: dir.join("Screenshot 1.png"),
                kind: DebouncedEventKind::Any,
            },
            DebouncedEvent {
                path: dir.join("Screenshot 2.png"),
                kind: DebouncedEventKind::Any,
            },
            DebouncedEvent {
                path: dir.to_path_buf(),
                kind: DebouncedEventKind::AnyContinuous,
            },
        ];

        handle_debounced_events(events, dir, 3, &mailbox);

        assert!(matches!(
            rx.try_recv(),
            Ok(StoreMessage::DirectoryChanged { generation: 3 })
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn irrelevant_batch_posts_nothing() {
        let (tx, rx) = mpsc::channel();
        let mailbox = Mailbox::new(tx, Arc::new(|| {}));
        let dir = Path::new("/shots");
        let events = vec![DebouncedEvent {
            path: dir.join("notes.txt"),
            kind: notify_debouncer_mini::DebouncedEventKind::Any,
        }];

        handle_debounced_events(events, dir, 0, &mailbox);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn watching_missing_directory_fails() {
        let dir = tempdir().expect("failed to create temp dir");
        let (tx, _rx) = mpsc::channel();
        let mailbox = Mailbox::new(tx, Arc::new(|| {}));

        let result = start_watching(&dir.path().join("missing"), 0, mailbox);
        assert!(matches!(result, Err(AppError::Watch(_))));
    }
}
