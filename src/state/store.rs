//! The screenshot store: sole owner and mutator of [`StoreState`].
//!
//! Threading model:
//! - every method runs on the owning (UI) thread
//! - the directory watcher and the rayon thumbnail workers only post
//!   [`StoreMessage`]s through the [`Mailbox`]
//! - the owner drains them with `process_pending` after its wake hook fires

use crate::config::{MAX_ITEMS, THUMBNAIL_CACHE_CAPACITY, THUMBNAIL_EDGE};
use crate::error::AppError;
use crate::file_utils::{self, PathExt};
use crate::screenshot::{Screenshot, ScreenshotId};
use crate::services::thumbnail_service::ThumbnailService;
use crate::services::watch_service::{self, DirectoryWatch};
use crate::state::{Mailbox, StoreChange, StoreMessage, StoreState, Wake};
use crate::thumbnail_loader::{ImageThumbnailRenderer, ThumbnailRenderer};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

/// Callback fired after every store mutation.
pub type Observer = Box<dyn FnMut(&StoreChange, &StoreState)>;

/// Construction parameters for [`ScreenshotStore`].
pub struct StoreOptions {
    pub renderer: Arc<dyn ThumbnailRenderer>,
    pub wake: Wake,
    pub thumbnail_edge: u32,
    pub backing_scale: f32,
    pub cache_capacity: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            renderer: Arc::new(ImageThumbnailRenderer),
            wake: Arc::new(|| {}),
            thumbnail_edge: THUMBNAIL_EDGE,
            backing_scale: 1.0,
            cache_capacity: THUMBNAIL_CACHE_CAPACITY,
        }
    }
}

/// Watches one directory and keeps a bounded, newest-first list of its captures.
pub struct ScreenshotStore {
    state: StoreState,
    thumbnail_service: ThumbnailService,
    in_flight: HashSet<PathBuf>,
    /// Bumped on every directory switch; messages from older generations are dropped.
    generation: u64,
    watch: Option<DirectoryWatch>,
    mailbox: Mailbox,
    inbox: Receiver<StoreMessage>,
    observers: Vec<Observer>,
}

impl ScreenshotStore {
    /// Creates a store for `directory`, loads it, and starts watching.
    pub fn new(directory: PathBuf, options: StoreOptions) -> Self {
        let (tx, inbox) = mpsc::channel();
        let mut store = Self {
            state: StoreState::new(directory, options.cache_capacity),
            thumbnail_service: ThumbnailService::new(
                options.renderer,
                options.thumbnail_edge,
                options.backing_scale,
            ),
            in_flight: HashSet::new(),
            generation: 0,
            watch: None,
            mailbox: Mailbox::new(tx, options.wake),
            inbox,
            observers: Vec::new(),
        };
        store.load();
        store.start_watch();
        store
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Registers an observer for every subsequent change.
    pub fn subscribe(&mut self, observer: impl FnMut(&StoreChange, &StoreState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// True while a watcher is attached to the active directory.
    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Rescans the active directory and replaces `items`.
    ///
    /// A listing error is logged and leaves the previous items in place.
    /// Returns true when `items` was replaced.
    pub fn load(&mut self) -> bool {
        let start = std::time::Instant::now();
        let directory = self.state.active_directory.clone();

        let paths = match file_utils::scan_directory(&directory) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Failed to load screenshots from {}: {}", directory.display(), e);
                return false;
            }
        };

        let mut items: Vec<Screenshot> = paths.into_iter().map(Screenshot::from_path).collect();
        items.sort_by(|a, b| b.captured_at().cmp(&a.captured_at()));
        items.truncate(MAX_ITEMS);

        let previous = self.state.selected_item().map(|item| item.path().to_path_buf());
        self.state.items = items;
        self.state
            .thumbnails
            .touch(self.state.items.iter().map(|item| item.path()));

        // Follow the selected file to its new identity, or drop the selection.
        let selection = previous.and_then(|path| {
            self.state
                .items
                .iter()
                .find(|item| item.path() == path)
                .map(|item| item.id())
        });
        let selection_changed = selection.is_none() && self.state.selection.is_some();
        self.state.selection = selection;

        debug!(
            "Loaded {} screenshot(s) from {} in {:?}",
            self.state.items.len(),
            directory.display(),
            start.elapsed()
        );

        self.notify(StoreChange::Items);
        if selection_changed {
            self.notify(StoreChange::Selection);
        }
        self.schedule_missing_thumbnails();
        true
    }

    /// Switches to `directory`, dropping every cached thumbnail.
    pub fn set_directory(&mut self, directory: PathBuf) {
        info!("Switching screenshot directory to {}", directory.display());
        self.watch = None;
        self.generation += 1;
        self.in_flight.clear();
        self.state.thumbnails.clear();
        self.state.items.clear();
        let had_selection = self.state.selection.take().is_some();
        self.state.active_directory = directory;

        if had_selection {
            self.notify(StoreChange::Selection);
        }
        if !self.load() {
            self.notify(StoreChange::Items);
        }
        self.start_watch();
    }

    /// Moves every listed capture to the trash and returns how many were moved.
    ///
    /// Failures are logged per file. `items` is left alone; the watcher
    /// observes the deletions and reloads.
    pub fn trash_all(&mut self) -> usize {
        let paths: Vec<PathBuf> = self
            .state
            .items
            .iter()
            .map(|item| item.path().to_path_buf())
            .collect();

        let mut trashed = 0;
        for path in paths {
            match trash::delete(&path) {
                Ok(()) => trashed += 1,
                Err(e) => warn!("Failed to move {} to trash: {}", path.format_for_log(), e),
            }
        }
        info!("Moved {} screenshot(s) to trash", trashed);
        trashed
    }

    /// Moves one capture to the trash.
    pub fn trash(&mut self, id: ScreenshotId) -> crate::error::Result<()> {
        let path = self
            .state
            .index_of(id)
            .map(|index| self.state.items[index].path().to_path_buf())
            .ok_or_else(|| AppError::Trash(format!("No screenshot with id {}", id)))?;

        trash::delete(&path).map_err(|e| {
            warn!("Failed to move {} to trash: {}", path.format_for_log(), e);
            AppError::from(e)
        })
    }

    /// Selects `id` if it is listed. Returns false otherwise.
    pub fn select(&mut self, id: ScreenshotId) -> bool {
        if self.state.index_of(id).is_none() {
            return false;
        }
        if self.state.selection != Some(id) {
            self.state.selection = Some(id);
            self.notify(StoreChange::Selection);
        }
        true
    }

    /// Selects the item at `index` and returns it.
    pub fn select_index(&mut self, index: usize) -> Option<&Screenshot> {
        let id = self.state.items.get(index)?.id();
        self.select(id);
        self.state.items.get(index)
    }

    pub fn clear_selection(&mut self) {
        if self.state.selection.take().is_some() {
            self.notify(StoreChange::Selection);
        }
    }

    /// Applies every queued background result. Returns the number of messages handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.inbox.try_recv() {
                Ok(message) => {
                    self.apply(message);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    /// Blocks up to `timeout` for one background result and applies it.
    pub fn wait_for_message(&mut self, timeout: Duration) -> bool {
        match self.inbox.recv_timeout(timeout) {
            Ok(message) => {
                self.apply(message);
                true
            }
            Err(_) => false,
        }
    }

    fn apply(&mut self, message: StoreMessage) {
        match message {
            StoreMessage::DirectoryChanged { generation } => {
                if generation != self.generation {
                    debug!("Ignoring change event for a previous directory");
                    return;
                }
                self.load();
            }
            StoreMessage::ThumbnailReady {
                generation,
                path,
                result,
            } => {
                if generation != self.generation {
                    debug!("Ignoring stale thumbnail for {}", path.format_for_log());
                    return;
                }
                self.in_flight.remove(&path);
                match result {
                    Ok(thumbnail) => {
                        if self.state.thumbnails.insert(path.clone(), thumbnail) {
                            self.notify(StoreChange::Thumbnail(path));
                        }
                    }
                    Err(e) => debug!("No thumbnail for {}: {}", path.format_for_log(), e),
                }
            }
        }
    }

    fn schedule_missing_thumbnails(&mut self) {
        let missing: Vec<PathBuf> = self
            .state
            .items
            .iter()
            .map(|item| item.path())
            .filter(|path| !self.state.thumbnails.contains(path) && !self.in_flight.contains(*path))
            .map(|path| path.to_path_buf())
            .collect();

        self.in_flight.extend(missing.iter().cloned());
        self.thumbnail_service
            .schedule(missing, self.generation, &self.mailbox);
    }

    fn start_watch(&mut self) {
        match watch_service::start_watching(
            &self.state.active_directory,
            self.generation,
            self.mailbox.clone(),
        ) {
            Ok(watch) => self.watch = Some(watch),
            Err(e) => {
                warn!("{}", e);
                self.watch = None;
            }
        }
    }

    fn notify(&mut self, change: StoreChange) {
        for observer in self.observers.iter_mut() {
            observer(&change, &self.state);
        }
    }
}
