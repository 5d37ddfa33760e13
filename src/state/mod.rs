//! State management for the screenshot popover.
//!
//! [`StoreState`] is owned by [`ScreenshotStore`] and mutated only on the UI
//! thread. Background work talks to the store through a [`Mailbox`].

use crate::error::Result;
use crate::screenshot::{Screenshot, ScreenshotId};
use crate::thumbnail_cache::{Thumbnail, ThumbnailCache};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;

pub mod navigation;
pub mod store;

pub use navigation::NavigationKey;
pub use store::{ScreenshotStore, StoreOptions};

/// Hook called after a message is posted, so the owner can schedule a drain on its thread.
pub type Wake = Arc<dyn Fn() + Send + Sync>;

/// Work results handed from background threads to the owning thread.
#[derive(Debug)]
pub enum StoreMessage {
    /// The watched directory changed and should be reloaded.
    DirectoryChanged { generation: u64 },
    /// A thumbnail render finished.
    ThumbnailReady {
        generation: u64,
        path: PathBuf,
        result: Result<Thumbnail>,
    },
}

/// Sending half of the store's message queue.
#[derive(Clone)]
pub struct Mailbox {
    tx: Sender<StoreMessage>,
    wake: Wake,
}

impl Mailbox {
    pub fn new(tx: Sender<StoreMessage>, wake: Wake) -> Self {
        Self { tx, wake }
    }

    /// Queues a message and wakes the owner. A dropped store silently discards it.
    pub fn post(&self, message: StoreMessage) {
        if self.tx.send(message).is_ok() {
            (self.wake)();
        }
    }
}

/// What changed in the last store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// `items` was replaced or the directory switched.
    Items,
    /// A thumbnail arrived for this path.
    Thumbnail(PathBuf),
    /// The selection moved or was cleared.
    Selection,
}

/// Observable store contents.
pub struct StoreState {
    active_directory: PathBuf,
    items: Vec<Screenshot>,
    thumbnails: ThumbnailCache,
    selection: Option<ScreenshotId>,
}

impl StoreState {
    fn new(active_directory: PathBuf, cache_capacity: usize) -> Self {
        Self {
            active_directory,
            items: Vec::new(),
            thumbnails: ThumbnailCache::new(cache_capacity),
            selection: None,
        }
    }

    pub fn active_directory(&self) -> &Path {
        &self.active_directory
    }

    /// Current captures, newest first.
    pub fn items(&self) -> &[Screenshot] {
        &self.items
    }

    pub fn thumbnails(&self) -> &ThumbnailCache {
        &self.thumbnails
    }

    pub fn thumbnail(&self, path: &Path) -> Option<&Thumbnail> {
        self.thumbnails.get(path)
    }

    pub fn selection(&self) -> Option<ScreenshotId> {
        self.selection
    }

    /// Position of `id` in `items`.
    pub fn index_of(&self, id: ScreenshotId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.and_then(|id| self.index_of(id))
    }

    pub fn selected_item(&self) -> Option<&Screenshot> {
        self.selected_index().map(|index| &self.items[index])
    }
}
