//! Preview surface contract and the dismissal guard shared with the popover host.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A floating window showing one capture at full size.
pub trait PreviewSurface {
    /// Shows the preview for `path`.
    fn open(&mut self, path: &Path);
    /// Retargets an open preview without closing it.
    fn update(&mut self, path: &Path);
    fn close(&mut self);
    fn is_open(&self) -> bool;
}

/// Shared "do not dismiss the popover" flag.
///
/// The preview raises it while open; the host checks it before closing the
/// popover on focus loss.
#[derive(Clone, Default)]
pub struct DismissGuard {
    suppressed: Arc<AtomicBool>,
}

impl DismissGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppress(&self) {
        self.suppressed.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.suppressed.store(false, Ordering::SeqCst);
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let guard = DismissGuard::new();
        let host_view = guard.clone();
        assert!(!host_view.is_suppressed());

        guard.suppress();
        assert!(host_view.is_suppressed());

        guard.release();
        assert!(!host_view.is_suppressed());
    }
}
