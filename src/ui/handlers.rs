//! Event handlers for UI callbacks.
//!
//! Sets up all Logic callbacks (key-pressed, tile-clicked, choose-folder, etc.)
//! and the store observer that keeps the grid in sync.

use crate::services::directory_service::DirectoryOrigin;
use crate::services::popover_controller::{KeyResponse, PopoverController};
use crate::state::NavigationKey;
use crate::ui::state_helpers::{self, GridModel};
use log::{debug, info};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use slint::platform::Key;
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedController = Rc<RefCell<PopoverController>>;

/// Maps the text of a Slint key event to a navigation key.
pub fn navigation_key(text: &str) -> NavigationKey {
    let mut chars = text.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        return NavigationKey::Other;
    };
    match ch {
        ' ' => NavigationKey::TogglePreview,
        c if c == char::from(Key::LeftArrow) => NavigationKey::Left,
        c if c == char::from(Key::RightArrow) => NavigationKey::Right,
        c if c == char::from(Key::UpArrow) => NavigationKey::Up,
        c if c == char::from(Key::DownArrow) => NavigationKey::Down,
        c if c == char::from(Key::Return) => NavigationKey::Open,
        _ => NavigationKey::Other,
    }
}

fn handle_key_text(controller: &SharedController, text: &str) -> bool {
    let key = navigation_key(text);
    let response = controller.borrow_mut().handle_key(key);
    debug!("Key {:?} -> {:?}", key, response);
    response == KeyResponse::Handled
}

fn refresh_directory_info(ui: &crate::PopoverWindow, controller: &PopoverController) {
    let config = controller.directory_config();
    state_helpers::set_directory_info(
        ui,
        &controller.display_path(),
        config.origin == DirectoryOrigin::UserOverride,
    );
}

fn find_id(controller: &PopoverController, id: &str) -> Option<crate::screenshot::ScreenshotId> {
    controller
        .store()
        .state()
        .items()
        .iter()
        .map(|item| item.id())
        .find(|item_id| item_id.to_string() == id)
}

/// Sets up all UI event handlers for the application.
///
/// Takes the popover, the shared controller and the preview window, then
/// registers callbacks for keys, tiles, settings and background work.
pub fn setup_handlers(
    ui: &crate::PopoverWindow,
    controller: SharedController,
    preview_window: &crate::PreviewWindow,
) {
    let grid = Rc::new(RefCell::new(GridModel::new()));
    ui.global::<crate::ViewState>()
        .set_tiles(grid.borrow().model());

    // Store observer: runs inside controller calls, so it must not borrow the controller.
    {
        let ui_handle = ui.as_weak();
        let grid = grid.clone();
        controller
            .borrow_mut()
            .store_mut()
            .subscribe(move |change, state| {
                let Some(ui) = ui_handle.upgrade() else {
                    return;
                };
                let columns = ui.global::<crate::ViewState>().get_columns().clamp(1, 4) as u8;
                grid.borrow_mut().apply(change, state, columns);
                state_helpers::set_grid_info(&ui, state, columns);
            });
    }

    {
        let controller = controller.borrow();
        let state = controller.store().state();
        grid.borrow_mut().rebuild(state, controller.columns());
        state_helpers::set_grid_info(ui, state, controller.columns());
        refresh_directory_info(ui, &controller);
    }

    // Drains watcher and thumbnail results posted from background threads.
    ui.global::<crate::Logic>().on_process_pending({
        let controller = controller.clone();
        move || {
            controller.borrow_mut().process_pending();
        }
    });

    // Manual rescan from the header button.
    ui.global::<crate::Logic>().on_refresh({
        let controller = controller.clone();
        move || {
            controller.borrow_mut().refresh();
        }
    });

    ui.global::<crate::Logic>().on_key_pressed({
        let controller = controller.clone();
        move |text| handle_key_text(&controller, &text)
    });

    // The preview forwards its keys so navigation keeps working while it has focus.
    preview_window.on_key_pressed({
        let controller = Rc::downgrade(&controller);
        move |text| {
            controller
                .upgrade()
                .is_some_and(|controller| handle_key_text(&controller, &text))
        }
    });

    ui.global::<crate::Logic>().on_tile_clicked({
        let controller = controller.clone();
        move |id| {
            let mut controller = controller.borrow_mut();
            if let Some(id) = find_id(&controller, &id) {
                controller.select(id);
            }
        }
    });

    ui.global::<crate::Logic>().on_tile_double_clicked({
        let ui_handle = ui.as_weak();
        let controller = controller.clone();
        move |id| {
            let mut controller = controller.borrow_mut();
            let Some(id) = find_id(&controller, &id) else {
                return;
            };
            controller.select(id);
            if let Err(e) = controller.open_selected() {
                if let Some(ui) = ui_handle.upgrade() {
                    state_helpers::set_error_with_prefix(&ui, "Failed to open", e.to_string());
                }
            }
        }
    });

    ui.global::<crate::Logic>().on_open_selected({
        let ui_handle = ui.as_weak();
        let controller = controller.clone();
        move || {
            if let Err(e) = controller.borrow().open_selected() {
                if let Some(ui) = ui_handle.upgrade() {
                    state_helpers::set_error_with_prefix(&ui, "Failed to open", e.to_string());
                }
            }
        }
    });

    ui.global::<crate::Logic>().on_reveal_selected({
        let ui_handle = ui.as_weak();
        let controller = controller.clone();
        move || {
            if let Err(e) = controller.borrow().reveal_selected() {
                if let Some(ui) = ui_handle.upgrade() {
                    state_helpers::set_error_with_prefix(&ui, "Failed to reveal", e.to_string());
                }
            }
        }
    });

    ui.global::<crate::Logic>().on_copy_selected({
        let ui_handle = ui.as_weak();
        let controller = controller.clone();
        move || {
            let result = controller.borrow().copy_selected();
            if let Some(ui) = ui_handle.upgrade() {
                match result {
                    Ok(()) => state_helpers::set_status(&ui, "Copied to clipboard"),
                    Err(e) => {
                        state_helpers::set_error_with_prefix(&ui, "Failed to copy", e.to_string())
                    }
                }
            }
        }
    });

    ui.global::<crate::Logic>().on_trash_selected({
        let ui_handle = ui.as_weak();
        let controller = controller.clone();
        move || {
            if let Err(e) = controller.borrow_mut().trash_selected() {
                if let Some(ui) = ui_handle.upgrade() {
                    state_helpers::set_error_with_prefix(&ui, "Failed to trash", e.to_string());
                }
            }
        }
    });

    ui.global::<crate::Logic>().on_trash_all({
        let ui_handle = ui.as_weak();
        let controller = controller.clone();
        move || {
            let moved = controller.borrow_mut().trash_all();
            if let Some(ui) = ui_handle.upgrade() {
                state_helpers::set_status(&ui, &format!("Moved {} items to Trash", moved));
            }
        }
    });

    ui.global::<crate::Logic>().on_set_columns({
        let ui_handle = ui.as_weak();
        let controller = controller.clone();
        let grid = grid.clone();
        move |columns| {
            let mut controller = controller.borrow_mut();
            let columns = controller.set_columns(columns.clamp(1, 4) as u8);
            if let Some(ui) = ui_handle.upgrade() {
                let state = controller.store().state();
                state_helpers::set_grid_info(&ui, state, columns);
                grid.borrow_mut().rebuild(state, columns);
            }
        }
    });

    // Folder picker handler
    // Uses slint::spawn_local because AsyncFileDialog must run on the main thread
    ui.global::<crate::Logic>().on_choose_folder({
        let ui_handle = ui.as_weak();
        let controller = controller.clone();
        move || {
            let ui_handle = ui_handle.clone();
            let controller = controller.clone();
            let _ = slint::spawn_local(async move {
                // AsyncFileDialogはメインスレッドで実行する必要があるのでrayon禁止。
                let Some(folder) = AsyncFileDialog::new()
                    .set_title("Choose Screenshot Folder")
                    .pick_folder()
                    .await
                else {
                    debug!("Folder selection cancelled");
                    return;
                };

                let path = folder.path().to_path_buf();
                info!("User picked folder {}", path.display());
                let mut controller = controller.borrow_mut();
                controller.choose_directory(path);
                if let Some(ui) = ui_handle.upgrade() {
                    refresh_directory_info(&ui, &controller);
                }
            });
        }
    });

    ui.global::<crate::Logic>().on_reset_folder({
        let ui_handle = ui.as_weak();
        let controller = controller.clone();
        move || {
            let mut controller = controller.borrow_mut();
            controller.reset_directory();
            if let Some(ui) = ui_handle.upgrade() {
                refresh_directory_info(&ui, &controller);
            }
        }
    });

    ui.global::<crate::Logic>().on_quit(|| {
        info!("Quit requested");
        let _ = slint::quit_event_loop();
    });
}
