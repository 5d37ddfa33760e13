//! Clipboard service for copying a capture to the OS clipboard.
//!
//! macOS writes a file URL to the general pasteboard so Finder-style paste
//! targets receive the file. Linux writes the path as text.

use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur during clipboard operations.
#[derive(Debug)]
pub enum ClipboardError {
    /// The file does not exist anymore.
    FileNotFound(PathBuf),
    /// The path is not valid UTF-8.
    InvalidPath(PathBuf),
    /// Platform-specific error occurred.
    PlatformError(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "File not found: {:?}", path),
            Self::InvalidPath(path) => write!(f, "Path is not valid UTF-8: {:?}", path),
            Self::PlatformError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

#[cfg(target_os = "macos")]
use {
    objc2::rc::{autoreleasepool, Retained},
    objc2::runtime::ProtocolObject,
    objc2::{msg_send, ClassType},
    objc2_app_kit::{NSPasteboard, NSPasteboardWriting},
    objc2_foundation::{NSArray, NSString, NSURL},
};

#[cfg(target_os = "linux")]
use arboard::Clipboard;

/// Copies one capture file to the clipboard.
pub fn copy_file(path: &Path) -> Result<(), ClipboardError> {
    let path_str = validate_path(path)?;
    info!("Copying {} to clipboard", path.display());

    #[cfg(target_os = "macos")]
    {
        copy_file_macos(path_str)
    }

    #[cfg(target_os = "linux")]
    {
        copy_file_linux(path_str)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = path_str;
        Err(ClipboardError::PlatformError(
            "Clipboard operation not supported on this platform".to_string(),
        ))
    }
}

fn validate_path(path: &Path) -> Result<&str, ClipboardError> {
    if !path.exists() {
        return Err(ClipboardError::FileNotFound(path.to_path_buf()));
    }
    path.to_str()
        .ok_or_else(|| ClipboardError::InvalidPath(path.to_path_buf()))
}

#[cfg(target_os = "macos")]
fn copy_file_macos(path_str: &str) -> Result<(), ClipboardError> {
    autoreleasepool(|_| {
        let pasteboard: Option<Retained<NSPasteboard>> =
            unsafe { msg_send![NSPasteboard::class(), generalPasteboard] };
        let pasteboard = pasteboard
            .ok_or_else(|| ClipboardError::PlatformError("Failed to get pasteboard".to_string()))?;

        pasteboard.clearContents();

        let url = NSURL::fileURLWithPath(&NSString::from_str(path_str));
        let success = unsafe {
            let url_array = NSArray::from_slice(&[&*url]);

            #[allow(clippy::as_conversions)]
            let writing_array = &*(url_array.as_ref() as *const NSArray<NSURL>
                as *const NSArray<ProtocolObject<dyn NSPasteboardWriting>>);

            pasteboard.writeObjects(writing_array)
        };

        if success {
            Ok(())
        } else {
            Err(ClipboardError::PlatformError(
                "Failed to write to clipboard".to_string(),
            ))
        }
    })
}

#[cfg(target_os = "linux")]
fn copy_file_linux(path_str: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| {
        ClipboardError::PlatformError(format!("Failed to access clipboard: {}", e))
    })?;

    clipboard
        .set_text(path_str.to_string())
        .map_err(|e| ClipboardError::PlatformError(format!("Failed to set clipboard: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_rejected_before_touching_clipboard() {
        let err = copy_file(Path::new("/definitely/missing/Screenshot.png"))
            .expect_err("missing file");
        assert!(matches!(err, ClipboardError::FileNotFound(_)));
    }

    #[test]
    fn validate_accepts_existing_utf8_path() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("Screenshot a.png");
        std::fs::write(&path, b"x").expect("write");
        assert_eq!(validate_path(&path).ok(), path.to_str());
    }
}
