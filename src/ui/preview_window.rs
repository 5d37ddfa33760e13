//! Floating full-size preview backed by the `PreviewWindow` component.
//!
//! Decoding runs on `rayon::spawn`; the result comes back through
//! `upgrade_in_event_loop`. A request counter drops results for a capture the
//! user already navigated away from.

use crate::file_utils::{PathExt, is_recording_path};
use crate::preview::{DismissGuard, PreviewSurface};
use crate::thumbnail_loader;
use crate::ui::state_helpers::create_slint_image;
use log::{debug, warn};
use slint::ComponentHandle;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct SlintPreview {
    window: crate::PreviewWindow,
    open: Rc<Cell<bool>>,
    guard: DismissGuard,
    request: Arc<AtomicU64>,
}

impl SlintPreview {
    pub fn new(guard: DismissGuard) -> Result<Self, slint::PlatformError> {
        let window = crate::PreviewWindow::new()?;
        let open = Rc::new(Cell::new(false));

        // Closing from the title bar must release the popover too.
        window.window().on_close_requested({
            let open = open.clone();
            let guard = guard.clone();
            move || {
                open.set(false);
                guard.release();
                slint::CloseRequestResponse::HideWindow
            }
        });

        Ok(Self {
            window,
            open,
            guard,
            request: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Strong handle for wiring the window's own callbacks.
    pub fn window(&self) -> crate::PreviewWindow {
        self.window.clone_strong()
    }

    fn show_path(&self, path: &Path) {
        let token = self.request.fetch_add(1, Ordering::SeqCst) + 1;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.window.set_file_name(name.into());
        self.window.set_has_preview(false);
        self.window.set_message("Loading…".into());
        let is_recording = is_recording_path(path);

        let weak = self.window.as_weak();
        let request = self.request.clone();
        let path = path.to_path_buf();
        rayon::spawn(move || {
            let result = thumbnail_loader::load_rgba_blocking(&path);
            let _ = weak.upgrade_in_event_loop(move |window| {
                if request.load(Ordering::SeqCst) != token {
                    debug!("Dropping stale preview for {}", path.format_for_log());
                    return;
                }
                match result {
                    Ok((data, width, height)) => {
                        window.set_preview(create_slint_image(&data, width, height));
                        window.set_has_preview(true);
                    }
                    Err(e) if is_recording => {
                        debug!("No frame for {}: {}", path.format_for_log(), e);
                        window.set_message("Screen recording. Press Return to open it.".into());
                    }
                    Err(e) => {
                        warn!("Preview failed for {}: {}", path.format_for_log(), e);
                        window.set_message(format!("Preview unavailable: {}", e).into());
                    }
                }
            });
        });
    }
}

impl PreviewSurface for SlintPreview {
    fn open(&mut self, path: &Path) {
        self.show_path(path);
        if let Err(e) = self.window.show() {
            warn!("Failed to show preview window: {}", e);
            return;
        }
        self.open.set(true);
        self.guard.suppress();
    }

    fn update(&mut self, path: &Path) {
        if self.open.get() {
            self.show_path(path);
        }
    }

    fn close(&mut self) {
        // Invalidate any decode still in flight.
        self.request.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.window.hide() {
            warn!("Failed to hide preview window: {}", e);
        }
        self.open.set(false);
        self.guard.release();
    }

    fn is_open(&self) -> bool {
        self.open.get()
    }
}
