//! Blocking decode helpers. Callers run these on the rayon pool, never on the UI thread.

use crate::config::RECORDING_PREVIEW_EDGE;
use crate::error::{AppError, Result};
use crate::file_utils::is_recording_path;
use crate::services::video_frame_service;
use crate::thumbnail_cache::Thumbnail;
use std::path::Path;

/// Produces a scaled preview for one capture file.
pub trait ThumbnailRenderer: Send + Sync {
    /// Renders `path` so that its longest edge is at most `max_edge` pixels.
    fn render(&self, path: &Path, max_edge: u32) -> Result<Thumbnail>;
}

/// Renderer backed by the `image` crate for stills and the platform video
/// frame extractor for screen recordings.
///
/// Off macOS a recording reports `UnsupportedMedia`, which leaves its tile on
/// the placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageThumbnailRenderer;

impl ThumbnailRenderer for ImageThumbnailRenderer {
    fn render(&self, path: &Path, max_edge: u32) -> Result<Thumbnail> {
        if is_recording_path(path) {
            return Ok(video_frame_service::first_frame(path, max_edge)?);
        }
        let img = decode(path)?;
        let scaled = if img.width() > max_edge || img.height() > max_edge {
            img.thumbnail(max_edge, max_edge)
        } else {
            img
        };
        let rgba = scaled.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Thumbnail::new(rgba.into_raw(), width, height))
    }
}

/// Decodes the full image as RGBA8 for the preview window.
///
/// Recordings yield their first frame, bounded by [`RECORDING_PREVIEW_EDGE`].
pub fn load_rgba_blocking(path: &Path) -> Result<(Vec<u8>, u32, u32)> {
    if is_recording_path(path) {
        let frame = video_frame_service::first_frame(path, RECORDING_PREVIEW_EDGE)?;
        return Ok((frame.data, frame.width, frame.height));
    }
    let rgba = decode(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width, height))
}

fn decode(path: &Path) -> Result<image::DynamicImage> {
    let img = image::ImageReader::open(path)
        .map_err(|e| AppError::ThumbnailRender(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| AppError::ThumbnailRender(format!("{}: {}", path.display(), e)))?
        .decode()?;
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]))
            .save(path)
            .expect("write png");
    }

    #[test]
    fn large_images_are_scaled_to_max_edge() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("Screenshot big.png");
        write_png(&path, 800, 400);

        let thumb = ImageThumbnailRenderer.render(&path, 200).expect("render");
        assert_eq!((thumb.width, thumb.height), (200, 100));
        assert_eq!(thumb.data.len(), (200 * 100 * 4) as usize);
    }

    #[test]
    fn small_images_keep_their_size() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("Screenshot small.png");
        write_png(&path, 16, 8);

        let thumb = ImageThumbnailRenderer.render(&path, 200).expect("render");
        assert_eq!((thumb.width, thumb.height), (16, 8));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn recordings_are_unsupported_off_macos() {
        let err = ImageThumbnailRenderer
            .render(Path::new("/tmp/Screen Recording.MOV"), 100)
            .expect_err("mov has no decoder");
        assert!(matches!(err, AppError::UnsupportedMedia(_)));
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn recordings_go_through_the_frame_extractor() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("Screen Recording broken.MOV");
        std::fs::write(&path, vec![0u8; 64]).expect("write");

        // Not a movie, so AVFoundation yields no frame; the image decoder is never tried.
        let err = ImageThumbnailRenderer
            .render(&path, 100)
            .expect_err("no frame");
        assert!(matches!(err, AppError::ThumbnailRender(ref msg) if msg.contains("No frame")));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("Screenshot broken.png");
        std::fs::write(&path, vec![0u8; 100]).expect("write");

        assert!(ImageThumbnailRenderer.render(&path, 100).is_err());
        assert!(load_rgba_blocking(&path).is_err());
    }
}
