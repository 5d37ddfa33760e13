// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod config;
mod error;
mod file_utils;
mod preferences;
mod preview;
mod screenshot;
mod services;
mod startup;
mod state;
mod thumbnail_cache;
mod thumbnail_loader;
mod ui;

use preferences::Preferences;
use preview::DismissGuard;
use services::{DirectoryResolver, PopoverController};
use slint::ComponentHandle;
use state::{ScreenshotStore, StoreOptions, Wake};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let app = PopoverWindow::new()?;
    let guard = DismissGuard::new();
    let preview = ui::SlintPreview::new(guard.clone())?;
    let preview_window = preview.window();

    let resolver = DirectoryResolver::system(Preferences::open_default());
    let config = resolver.current_config();
    log::info!("Watching {}", config.path.display());

    // Background work posts into the store's mailbox; this schedules the drain on the UI thread.
    let wake: Wake = {
        let ui_handle = app.as_weak();
        Arc::new(move || {
            let _ = ui_handle.upgrade_in_event_loop(|ui| {
                ui.global::<Logic>().invoke_process_pending();
            });
        })
    };

    let store = ScreenshotStore::new(
        config.path,
        StoreOptions {
            wake,
            backing_scale: app.window().scale_factor(),
            ..StoreOptions::default()
        },
    );
    let controller = Rc::new(RefCell::new(PopoverController::new(
        store,
        resolver,
        Box::new(preview),
    )));

    ui::setup_handlers(&app, controller.clone(), &preview_window);
    startup::configure_popover_window(&app, controller, guard);

    app.run()?;

    Ok(())
}
