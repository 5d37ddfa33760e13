//! Hands capture files to the desktop: open with the default app, or reveal in the file manager.

use crate::error::{AppError, Result};
use log::info;
use std::path::Path;
use std::process::Command;

/// Opens `path` with the system default application.
pub fn open_with_default(path: &Path) -> Result<()> {
    info!("Opening {}", path.display());
    launcher_command(path, false)
        .spawn()
        .map(|_| ())
        .map_err(|e| AppError::Launch(format!("failed to open {}: {}", path.display(), e)))
}

/// Shows `path` selected in the platform file manager.
pub fn reveal_in_file_manager(path: &Path) -> Result<()> {
    info!("Revealing {}", path.display());
    launcher_command(path, true)
        .spawn()
        .map(|_| ())
        .map_err(|e| AppError::Launch(format!("failed to reveal {}: {}", path.display(), e)))
}

#[cfg(target_os = "macos")]
fn launcher_command(path: &Path, reveal: bool) -> Command {
    let mut command = Command::new("open");
    if reveal {
        command.arg("-R");
    }
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn launcher_command(path: &Path, reveal: bool) -> Command {
    if reveal {
        let mut command = Command::new("explorer");
        command.arg(format!("/select,{}", path.display()));
        command
    } else {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn launcher_command(path: &Path, reveal: bool) -> Command {
    // xdg-open has no selection support, so reveal opens the parent folder.
    let target = if reveal {
        path.parent().unwrap_or(path)
    } else {
        path
    };
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(command: &Command) -> Vec<&OsStr> {
        command.get_args().collect()
    }

    #[test]
    fn open_passes_the_file() {
        let command = launcher_command(Path::new("/shots/Screenshot a.png"), false);
        assert!(
            args(&command)
                .iter()
                .any(|arg| arg.to_string_lossy().contains("Screenshot a.png"))
        );
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn reveal_opens_parent_on_linux() {
        let command = launcher_command(Path::new("/shots/Screenshot a.png"), true);
        assert_eq!(command.get_program(), "xdg-open");
        assert_eq!(args(&command), vec![OsStr::new("/shots")]);
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn reveal_uses_open_r_on_macos() {
        let command = launcher_command(Path::new("/shots/Screenshot a.png"), true);
        assert_eq!(command.get_program(), "open");
        assert_eq!(args(&command)[0], OsStr::new("-R"));
    }
}
