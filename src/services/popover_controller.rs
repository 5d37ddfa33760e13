//! Service driving the popover: keyboard navigation, the preview surface,
//! directory changes, and per-capture actions.
//!
//! The controller is the single owner of the [`ScreenshotStore`]; the host
//! calls into it from the UI thread only.

use crate::error::{AppError, Result};
use crate::preview::PreviewSurface;
use crate::screenshot::ScreenshotId;
use crate::services::clipboard_service;
use crate::services::directory_service::{DirectoryConfig, DirectoryResolver};
use crate::services::file_action_service;
use crate::state::ScreenshotStore;
use crate::state::navigation::{NavigationKey, target_index};
use log::{debug, warn};
use std::path::PathBuf;

/// Whether the popover consumed a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    Handled,
    Ignored,
}

pub struct PopoverController {
    store: ScreenshotStore,
    resolver: DirectoryResolver,
    preview: Box<dyn PreviewSurface>,
    columns: u8,
}

impl PopoverController {
    pub fn new(
        store: ScreenshotStore,
        resolver: DirectoryResolver,
        preview: Box<dyn PreviewSurface>,
    ) -> Self {
        let columns = resolver.preferences().grid_columns();
        Self {
            store,
            resolver,
            preview,
            columns,
        }
    }

    pub fn store(&self) -> &ScreenshotStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ScreenshotStore {
        &mut self.store
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Changes and persists the grid width.
    pub fn set_columns(&mut self, columns: u8) -> u8 {
        self.columns = self.resolver.preferences_mut().set_grid_columns(columns);
        self.columns
    }

    pub fn directory_config(&self) -> DirectoryConfig {
        self.resolver.current_config()
    }

    pub fn display_path(&self) -> String {
        self.resolver.display_path(&self.resolver.current_config())
    }

    pub fn is_preview_open(&self) -> bool {
        self.preview.is_open()
    }

    /// Translates a key press into selection movement or preview toggling.
    pub fn handle_key(&mut self, key: NavigationKey) -> KeyResponse {
        match key {
            NavigationKey::TogglePreview => {
                self.toggle_preview();
                KeyResponse::Handled
            }
            NavigationKey::Open => match self.open_selected() {
                Ok(()) => KeyResponse::Handled,
                Err(e) => {
                    debug!("Open key ignored: {}", e);
                    KeyResponse::Ignored
                }
            },
            NavigationKey::Left | NavigationKey::Right | NavigationKey::Up | NavigationKey::Down => {
                self.move_selection(key)
            }
            NavigationKey::Other => KeyResponse::Ignored,
        }
    }

    fn toggle_preview(&mut self) {
        if self.preview.is_open() {
            self.preview.close();
            return;
        }
        if let Some(item) = self.store.state().selected_item() {
            let path = item.path().to_path_buf();
            self.preview.open(&path);
        }
    }

    fn move_selection(&mut self, key: NavigationKey) -> KeyResponse {
        let Some(step) = key.step(self.columns) else {
            return KeyResponse::Ignored;
        };
        let state = self.store.state();
        let current = state.selected_index();
        let Some(index) = target_index(current, step, state.items().len()) else {
            return KeyResponse::Ignored;
        };
        // Clamped at an edge: keep the preview as it is.
        if current == Some(index) {
            return KeyResponse::Handled;
        }

        let path = self
            .store
            .select_index(index)
            .map(|item| item.path().to_path_buf());
        if let Some(path) = path {
            if self.preview.is_open() {
                self.preview.update(&path);
            }
        }
        KeyResponse::Handled
    }

    /// Selects a tile clicked by the user.
    pub fn select(&mut self, id: ScreenshotId) -> bool {
        let selected = self.store.select(id);
        if selected && self.preview.is_open() {
            if let Some(item) = self.store.state().selected_item() {
                let path = item.path().to_path_buf();
                self.preview.update(&path);
            }
        }
        selected
    }

    /// The popover became visible: rescan so the grid is fresh.
    pub fn popover_opened(&mut self) {
        self.refresh();
    }

    /// Rescans the active directory on request, keeping the selection and an
    /// open preview when the selected file is still there.
    pub fn refresh(&mut self) {
        self.store.load();
        self.sync_preview();
    }

    /// The popover was dismissed: drop the selection and the preview with it.
    pub fn popover_closed(&mut self) {
        self.store.clear_selection();
        if self.preview.is_open() {
            self.preview.close();
        }
    }

    /// Watches a user-picked folder from now on and remembers it.
    pub fn choose_directory(&mut self, path: PathBuf) -> DirectoryConfig {
        let config = self.resolver.set_override(path);
        self.store.set_directory(config.path.clone());
        self.sync_preview();
        config
    }

    /// Forgets the user's folder and goes back to the detected default.
    pub fn reset_directory(&mut self) -> DirectoryConfig {
        let config = self.resolver.clear_override();
        self.store.set_directory(config.path.clone());
        self.sync_preview();
        config
    }

    /// Applies queued watcher and thumbnail results.
    pub fn process_pending(&mut self) -> usize {
        let handled = self.store.process_pending();
        if handled > 0 {
            self.sync_preview();
        }
        handled
    }

    pub fn open_selected(&self) -> Result<()> {
        file_action_service::open_with_default(&self.selected_path()?)
    }

    pub fn reveal_selected(&self) -> Result<()> {
        file_action_service::reveal_in_file_manager(&self.selected_path()?)
    }

    pub fn copy_selected(&self) -> Result<()> {
        let path = self.selected_path()?;
        clipboard_service::copy_file(&path).map_err(|e| AppError::Launch(e.to_string()))
    }

    pub fn trash_selected(&mut self) -> Result<()> {
        let id = self
            .store
            .state()
            .selection()
            .ok_or_else(|| AppError::Trash("Nothing selected".to_string()))?;
        self.store.trash(id)
    }

    pub fn trash_all(&mut self) -> usize {
        self.store.trash_all()
    }

    fn selected_path(&self) -> Result<PathBuf> {
        self.store
            .state()
            .selected_item()
            .map(|item| item.path().to_path_buf())
            .ok_or_else(|| AppError::Launch("Nothing selected".to_string()))
    }

    /// Closes the preview once nothing is selected anymore.
    fn sync_preview(&mut self) {
        if self.store.state().selection().is_none() && self.preview.is_open() {
            warn!("Selected screenshot disappeared, closing preview");
            self.preview.close();
        }
    }
}
