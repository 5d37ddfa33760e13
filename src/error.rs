//! Unified error types for the screenshot popover.

use crate::services::video_frame_service::VideoFrameError;
use std::fmt;
#[cfg(not(target_os = "macos"))]
use std::path::PathBuf;

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Error listing the watch directory
    DirectoryScan(String),
    /// Error decoding or scaling a capture for its thumbnail
    ThumbnailRender(String),
    /// The file has no decoder on this platform (screen recordings off macOS)
    #[cfg(not(target_os = "macos"))]
    UnsupportedMedia(PathBuf),
    /// Error reading or writing the preferences file
    Preferences(String),
    /// Error creating or attaching the directory watcher
    Watch(String),
    /// Error moving a file to the trash
    Trash(String),
    /// Error handing a file to another application
    Launch(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DirectoryScan(msg) => write!(f, "Directory scan failed: {}", msg),
            AppError::ThumbnailRender(msg) => write!(f, "Thumbnail render failed: {}", msg),
            #[cfg(not(target_os = "macos"))]
            AppError::UnsupportedMedia(path) => {
                write!(f, "No thumbnail decoder for {}", path.display())
            }
            AppError::Preferences(msg) => write!(f, "Preferences error: {}", msg),
            AppError::Watch(msg) => write!(f, "Directory watch failed: {}", msg),
            AppError::Trash(msg) => write!(f, "Move to trash failed: {}", msg),
            AppError::Launch(msg) => write!(f, "Launch failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ThumbnailRender(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::DirectoryScan(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Preferences(err.to_string())
    }
}

impl From<trash::Error> for AppError {
    fn from(err: trash::Error) -> Self {
        AppError::Trash(err.to_string())
    }
}

impl From<VideoFrameError> for AppError {
    fn from(err: VideoFrameError) -> Self {
        match err {
            #[cfg(not(target_os = "macos"))]
            VideoFrameError::Unsupported(path) => AppError::UnsupportedMedia(path),
            #[cfg(target_os = "macos")]
            other => AppError::ThumbnailRender(other.to_string()),
        }
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;
