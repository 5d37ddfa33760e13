//! Application configuration constants.

use std::time::Duration;

/// Extension of still screenshots.
pub const IMAGE_EXTENSION: &str = "png";

/// Extension of screen recordings.
pub const RECORDING_EXTENSION: &str = "mov";

/// Supported capture file extensions for scanning directories.
pub const SUPPORTED_CAPTURE_EXTENSIONS: [&str; 2] = [IMAGE_EXTENSION, RECORDING_EXTENSION];

/// A capture's base name must contain one of these markers.
pub const CAPTURE_NAME_MARKERS: [&str; 2] = ["Screenshot", "Screen Recording"];

/// Maximum number of captures shown in the popover.
pub const MAX_ITEMS: usize = 30;

/// Thumbnail target edge in device-independent pixels.
pub const THUMBNAIL_EDGE: u32 = 180;

/// Longest edge of a recording's first frame in the preview window.
pub const RECORDING_PREVIEW_EDGE: u32 = 1600;

/// Thumbnail cache capacity.
pub const THUMBNAIL_CACHE_CAPACITY: usize = MAX_ITEMS * 4;

/// Quiet period for coalescing bursts of file system events.
pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(100);

/// Grid column bounds and default.
pub const MIN_GRID_COLUMNS: u8 = 1;
pub const MAX_GRID_COLUMNS: u8 = 4;
pub const DEFAULT_GRID_COLUMNS: u8 = 3;

/// Preferences file location below the platform config directory.
pub const PREFERENCES_DIR_NAME: &str = "screenpal";
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Where macOS keeps the user's screenshot location.
pub const SCREENCAPTURE_DOMAIN: &str = "com.apple.screencapture";
pub const SCREENCAPTURE_LOCATION_KEY: &str = "location";

/// Fallback folder below the home directory.
pub const FALLBACK_DIR_NAME: &str = "Desktop";
