use crate::config::{CAPTURE_NAME_MARKERS, RECORDING_EXTENSION, SUPPORTED_CAPTURE_EXTENSIONS};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Path helpers for log output.
pub trait PathExt {
    /// Base name when available, full path otherwise.
    fn format_for_log(&self) -> String;
}

impl PathExt for Path {
    fn format_for_log(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display().to_string())
    }
}

/// Returns true if the extension is one of the capture extensions, ignoring case.
pub fn has_capture_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| SUPPORTED_CAPTURE_EXTENSIONS.contains(&ext_str.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Returns true if the extension is the screen recording extension, ignoring case.
pub fn is_recording_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(RECORDING_EXTENSION))
        .unwrap_or(false)
}

/// Returns true if the path names a screenshot or screen recording.
///
/// Only the name is inspected, so this also works for paths that were just deleted.
pub fn is_capture_file(path: &Path) -> bool {
    let has_marker = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| CAPTURE_NAME_MARKERS.iter().any(|marker| name.contains(marker)))
        .unwrap_or(false);

    has_marker && has_capture_extension(path)
}

/// Lists the immediate capture files of `dir` in enumeration order.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let capture_files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_capture_file(path))
        .collect();

    Ok(capture_files)
}

/// Expands a leading `~` against `home`.
pub fn expand_tilde(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        return home.to_path_buf();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

/// Replaces the home prefix of `path` with `~`.
///
/// Paths outside `home` are returned unmodified. The comparison is per
/// component, so `/Users/bobby` is not treated as nested under `/Users/bob`.
pub fn display_path(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn capture_filter_requires_extension_and_marker() {
        assert!(is_capture_file(Path::new("/d/Screenshot 2026-01-01.png")));
        assert!(is_capture_file(Path::new("/d/Screen Recording 1.MOV")));
        assert!(is_capture_file(Path::new("/d/Screenshot x.Png")));
        assert!(!is_capture_file(Path::new("/d/vacation_photo.png")));
        assert!(!is_capture_file(Path::new("/d/birthday_video.mov")));
        assert!(!is_capture_file(Path::new("/d/Screenshot.jpg")));
        assert!(!is_capture_file(Path::new("/d/Screenshot.txt")));
        assert!(!is_capture_file(Path::new("/d/Screenshot")));
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        assert!(!is_capture_file(Path::new("/d/screenshot 1.png")));
    }

    #[test]
    fn scan_directory_is_non_recursive_and_skips_directories() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("Screenshot a.png"), b"x").expect("write");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write");
        fs::create_dir(dir.path().join("Screenshot folder.png")).expect("mkdir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("mkdir");
        fs::write(nested.join("Screenshot b.png"), b"x").expect("write");

        let files = scan_directory(dir.path()).expect("scan");
        assert_eq!(files, vec![dir.path().join("Screenshot a.png")]);
    }

    #[test]
    fn scan_missing_directory_is_an_error() {
        let dir = tempdir().expect("failed to create temp dir");
        assert!(scan_directory(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn expand_tilde_only_touches_leading_tilde() {
        let home = Path::new("/Users/me");
        assert_eq!(expand_tilde("~", home), PathBuf::from("/Users/me"));
        assert_eq!(expand_tilde("~/Shots", home), PathBuf::from("/Users/me/Shots"));
        assert_eq!(expand_tilde("/tmp/~x", home), PathBuf::from("/tmp/~x"));
    }

    #[test]
    fn display_path_abbreviates_home() {
        let home = Path::new("/Users/me");
        assert_eq!(display_path(Path::new("/Users/me"), home), "~");
        assert_eq!(display_path(Path::new("/Users/me/Desktop"), home), "~/Desktop");
        assert_eq!(
            display_path(Path::new("/Users/me/a/b"), home),
            "~/a/b"
        );
    }

    #[test]
    fn display_path_leaves_other_paths_alone() {
        let home = Path::new("/Users/me");
        assert_eq!(display_path(Path::new("/tmp"), home), "/tmp");
        assert_eq!(display_path(Path::new("/Users/meow/x"), home), "/Users/meow/x");
    }
}
