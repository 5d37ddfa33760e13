//! Helpers that push store contents into the popover's ViewState.
//!
//! Slint images are built once per thumbnail and reused across grid rebuilds.

use crate::state::{StoreChange, StoreState};
use crate::thumbnail_cache::Thumbnail;
use log::{error, info};
use slint::{ComponentHandle, Image, Model, ModelRc, Rgba8Pixel, SharedPixelBuffer, VecModel};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Converts RGBA8 pixel data into a Slint image. Must run on the UI thread.
pub fn create_slint_image(data: &[u8], width: u32, height: u32) -> Image {
    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(data, width, height);
    Image::from_rgba8(buffer)
}

fn thumbnail_image(thumbnail: &Thumbnail) -> Image {
    create_slint_image(&thumbnail.data, thumbnail.width, thumbnail.height)
}

/// Backing model of the tile grid.
pub struct GridModel {
    tiles: Rc<VecModel<crate::Tile>>,
    images: HashMap<PathBuf, Image>,
}

impl GridModel {
    pub fn new() -> Self {
        Self {
            tiles: Rc::new(VecModel::default()),
            images: HashMap::new(),
        }
    }

    pub fn model(&self) -> ModelRc<crate::Tile> {
        ModelRc::from(self.tiles.clone())
    }

    /// Reflects one store change in the grid.
    pub fn apply(&mut self, change: &StoreChange, state: &StoreState, columns: u8) {
        match change {
            StoreChange::Thumbnail(path) => self.update_thumbnail(path, state, columns),
            StoreChange::Items | StoreChange::Selection => self.rebuild(state, columns),
        }
    }

    /// Replaces every tile, e.g. after a reload or a column change.
    pub fn rebuild(&mut self, state: &StoreState, columns: u8) {
        self.images
            .retain(|path, _| state.thumbnails().contains(path));

        let selection = state.selection();
        let mut tiles = Vec::with_capacity(state.items().len());
        for (index, item) in state.items().iter().enumerate() {
            let image = self.image_for(item.path(), state);
            tiles.push(tile(
                index,
                columns,
                item.id().to_string(),
                item.display_name(),
                image,
                item.is_recording(),
                selection == Some(item.id()),
            ));
        }
        self.tiles.set_vec(tiles);
    }

    fn update_thumbnail(&mut self, path: &Path, state: &StoreState, columns: u8) {
        let Some(index) = state.items().iter().position(|item| item.path() == path) else {
            return;
        };
        let Some(image) = self.image_for(path, state) else {
            return;
        };
        if let Some(mut row) = self.tiles.row_data(index) {
            row.thumbnail = image;
            row.has_thumbnail = true;
            self.tiles.set_row_data(index, row);
        } else {
            self.rebuild(state, columns);
        }
    }

    fn image_for(&mut self, path: &Path, state: &StoreState) -> Option<Image> {
        if let Some(image) = self.images.get(path) {
            return Some(image.clone());
        }
        let image = thumbnail_image(state.thumbnail(path)?);
        self.images.insert(path.to_path_buf(), image.clone());
        Some(image)
    }
}

impl Default for GridModel {
    fn default() -> Self {
        Self::new()
    }
}

fn tile(
    index: usize,
    columns: u8,
    id: String,
    name: &str,
    image: Option<Image>,
    is_recording: bool,
    selected: bool,
) -> crate::Tile {
    let columns = usize::from(columns.max(1));
    crate::Tile {
        id: id.into(),
        name: name.into(),
        has_thumbnail: image.is_some(),
        thumbnail: image.unwrap_or_default(),
        is_recording,
        selected,
        col: (index % columns) as i32,
        row: (index / columns) as i32,
    }
}

/// Number of grid rows needed for `count` tiles.
pub fn row_count_for(count: usize, columns: u8) -> i32 {
    let columns = usize::from(columns.max(1));
    count.div_ceil(columns) as i32
}

/// Sets grid layout properties at once.
///
/// Groups: columns, rows, has-selection
pub fn set_grid_info(ui: &crate::PopoverWindow, state: &StoreState, columns: u8) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_columns(i32::from(columns));
    view_state.set_rows(row_count_for(state.items().len(), columns));
    view_state.set_has_selection(state.selection().is_some());
}

/// Sets directory properties shown in the settings pane.
///
/// Groups: directory-display, directory-is-custom
pub fn set_directory_info(ui: &crate::PopoverWindow, display: &str, is_custom: bool) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_directory_display(display.into());
    view_state.set_directory_is_custom(is_custom);
}

/// Shows a one-line status message in the settings pane.
pub fn set_status(ui: &crate::PopoverWindow, message: &str) {
    info!("{}", message);
    ui.global::<crate::ViewState>()
        .set_status_message(message.into());
}

/// Sets an error message in the UI with a prefix.
pub fn set_error_with_prefix(ui: &crate::PopoverWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    ui.global::<crate::ViewState>()
        .set_status_message(error_message.into());
}
