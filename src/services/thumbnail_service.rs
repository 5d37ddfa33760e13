//! Service for rendering thumbnails off the UI thread.
//!
//! Uses `rayon::spawn` for the decode and scale work, then posts the result
//! to the store's mailbox. Workers never touch store state directly.

use crate::state::{Mailbox, StoreMessage};
use crate::thumbnail_loader::ThumbnailRenderer;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

/// Schedules thumbnail renders at a fixed pixel size.
#[derive(Clone)]
pub struct ThumbnailService {
    renderer: Arc<dyn ThumbnailRenderer>,
    max_edge: u32,
}

impl ThumbnailService {
    /// Creates a service rendering at `edge * scale` pixels.
    pub fn new(renderer: Arc<dyn ThumbnailRenderer>, edge: u32, scale: f32) -> Self {
        Self {
            renderer,
            max_edge: scaled_edge(edge, scale),
        }
    }

    /// Renders every path on the rayon pool. Completions may arrive in any order.
    pub fn schedule(&self, paths: Vec<PathBuf>, generation: u64, mailbox: &Mailbox) {
        if paths.is_empty() {
            return;
        }
        debug!("Scheduling {} thumbnail(s) at {}px", paths.len(), self.max_edge);

        for path in paths {
            let renderer = self.renderer.clone();
            let mailbox = mailbox.clone();
            let max_edge = self.max_edge;
            rayon::spawn(move || {
                let result = renderer.render(&path, max_edge);
                mailbox.post(StoreMessage::ThumbnailReady {
                    generation,
                    path,
                    result,
                });
            });
        }
    }
}

fn scaled_edge(edge: u32, scale: f32) -> u32 {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    ((edge as f32) * scale).round().max(1.0) as u32
}
