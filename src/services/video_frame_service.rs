//! First-frame extraction for screen recordings.
//!
//! macOS asks AVFoundation for the frame at time zero and draws it into an
//! RGBA8 bitmap. Other platforms have no video decoder here.

use crate::thumbnail_cache::Thumbnail;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur while extracting a video frame.
#[derive(Debug)]
pub enum VideoFrameError {
    /// This platform has no frame extractor.
    #[cfg(not(target_os = "macos"))]
    Unsupported(PathBuf),
    /// The path is not valid UTF-8.
    #[cfg(target_os = "macos")]
    InvalidPath(PathBuf),
    /// Platform API returned no image.
    #[cfg(target_os = "macos")]
    NoFrame(PathBuf),
}

impl fmt::Display for VideoFrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(not(target_os = "macos"))]
            Self::Unsupported(path) => write!(f, "No video decoder for {:?}", path),
            #[cfg(target_os = "macos")]
            Self::InvalidPath(path) => write!(f, "Path is not valid UTF-8: {:?}", path),
            #[cfg(target_os = "macos")]
            Self::NoFrame(path) => write!(f, "No frame could be read from {:?}", path),
        }
    }
}

impl std::error::Error for VideoFrameError {}

/// Renders the first frame of `path`, fitting inside `max_edge` x `max_edge`.
pub fn first_frame(path: &Path, max_edge: u32) -> Result<Thumbnail, VideoFrameError> {
    #[cfg(target_os = "macos")]
    {
        first_frame_macos(path, max_edge)
    }

    #[cfg(not(target_os = "macos"))]
    {
        let _ = max_edge;
        Err(VideoFrameError::Unsupported(path.to_path_buf()))
    }
}

#[cfg(target_os = "macos")]
mod core_graphics {
    use core::ffi::c_void;
    use objc2_core_foundation::CGRect;
    use objc2_core_graphics::{CGColorSpace, CGContext, CGImage};

    /// kCGImageAlphaPremultipliedLast | kCGBitmapByteOrder32Big: R, G, B, A in memory.
    pub const RGBA_BITMAP_INFO: u32 = 1 | (4 << 12);

    #[link(name = "CoreGraphics", kind = "framework")]
    unsafe extern "C" {
        pub fn CGImageGetWidth(image: *mut CGImage) -> usize;
        pub fn CGImageGetHeight(image: *mut CGImage) -> usize;
        pub fn CGImageRelease(image: *mut CGImage);
        pub fn CGColorSpaceCreateDeviceRGB() -> *mut CGColorSpace;
        pub fn CGColorSpaceRelease(space: *mut CGColorSpace);
        pub fn CGBitmapContextCreate(
            data: *mut c_void,
            width: usize,
            height: usize,
            bits_per_component: usize,
            bytes_per_row: usize,
            space: *mut CGColorSpace,
            bitmap_info: u32,
        ) -> *mut CGContext;
        pub fn CGContextDrawImage(ctx: *mut CGContext, rect: CGRect, image: *mut CGImage);
        pub fn CGContextRelease(ctx: *mut CGContext);
    }
}

#[cfg(target_os = "macos")]
fn first_frame_macos(path: &Path, max_edge: u32) -> Result<Thumbnail, VideoFrameError> {
    use core_graphics::*;
    use objc2::rc::{Retained, autoreleasepool};
    use objc2::runtime::AnyObject;
    use objc2::{ClassType, msg_send};
    use objc2_av_foundation::{AVAssetImageGenerator, AVURLAsset};
    use objc2_core_foundation::CGSize;
    use objc2_core_graphics::CGImage;
    use objc2_core_media::{CMTime, CMTimeFlags};
    use objc2_foundation::{NSString, NSURL};

    let path_str = path
        .to_str()
        .ok_or_else(|| VideoFrameError::InvalidPath(path.to_path_buf()))?;
    let no_frame = || VideoFrameError::NoFrame(path.to_path_buf());

    autoreleasepool(|_| {
        let url = NSURL::fileURLWithPath(&NSString::from_str(path_str));

        let asset: Option<Retained<AnyObject>> = unsafe {
            // 安全性: optionsはnil許容、戻り値はautoreleaseされたAVURLAsset
            msg_send![AVURLAsset::class(), URLAssetWithURL: &*url, options: std::ptr::null::<AnyObject>()]
        };
        let asset = asset.ok_or_else(no_frame)?;

        let generator: Option<Retained<AnyObject>> = unsafe {
            // 安全性: assetは上で取得した有効なAVAsset
            msg_send![AVAssetImageGenerator::class(), assetImageGeneratorWithAsset: &*asset]
        };
        let generator = generator.ok_or_else(no_frame)?;

        let edge = f64::from(max_edge.max(1));
        let maximum_size = CGSize {
            width: edge,
            height: edge,
        };
        unsafe {
            // 安全性: 生成直後のgeneratorへのプロパティ設定
            let _: () = msg_send![&*generator, setAppliesPreferredTrackTransform: true];
            let _: () = msg_send![&*generator, setMaximumSize: maximum_size];
        }

        let start = CMTime {
            value: 0,
            timescale: 600,
            flags: CMTimeFlags(1),
            epoch: 0,
        };
        let image: *mut CGImage = unsafe {
            // 安全性: copy系メソッドなので戻り値の所有権はこちらにあり、CGImageReleaseで解放する
            msg_send![
                &*generator,
                copyCGImageAtTime: start,
                actualTime: std::ptr::null_mut::<CMTime>(),
                error: std::ptr::null_mut::<*mut AnyObject>()
            ]
        };
        if image.is_null() {
            return Err(no_frame());
        }

        let result = unsafe { draw_rgba(image) };
        unsafe {
            // 安全性: 上のcopyCGImageAtTimeで取得した参照を一度だけ解放
            CGImageRelease(image);
        }
        let (data, width, height) = result.ok_or_else(no_frame)?;
        Ok(Thumbnail::new(data, width, height))
    })
}

/// Draws `image` into a freshly allocated RGBA8 buffer.
///
/// # Safety
/// `image` must be a valid, non-null CGImage.
#[cfg(target_os = "macos")]
unsafe fn draw_rgba(
    image: *mut objc2_core_graphics::CGImage,
) -> Option<(Vec<u8>, u32, u32)> {
    use core_graphics::*;
    use objc2_core_foundation::{CGPoint, CGRect, CGSize};

    let (width, height) = unsafe { (CGImageGetWidth(image), CGImageGetHeight(image)) };
    if width == 0 || height == 0 {
        return None;
    }
    let bytes_per_row = width * 4;
    let mut data = vec![0u8; bytes_per_row * height];

    unsafe {
        let space = CGColorSpaceCreateDeviceRGB();
        let ctx = CGBitmapContextCreate(
            data.as_mut_ptr().cast(),
            width,
            height,
            8,
            bytes_per_row,
            space,
            RGBA_BITMAP_INFO,
        );
        CGColorSpaceRelease(space);
        if ctx.is_null() {
            return None;
        }
        let rect = CGRect {
            origin: CGPoint { x: 0.0, y: 0.0 },
            size: CGSize {
                width: width as f64,
                height: height as f64,
            },
        };
        CGContextDrawImage(ctx, rect, image);
        CGContextRelease(ctx);
    }

    Some((data, width as u32, height as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn recordings_are_unsupported_off_macos() {
        let err = first_frame(Path::new("/tmp/Screen Recording.mov"), 100)
            .expect_err("no decoder");
        assert!(matches!(err, VideoFrameError::Unsupported(_)));
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn unreadable_recording_yields_no_frame() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("Screen Recording broken.mov");
        std::fs::write(&path, vec![0u8; 64]).expect("write");

        let err = first_frame(&path, 100).expect_err("not a movie");
        assert!(matches!(err, VideoFrameError::NoFrame(_)));
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn missing_recording_yields_no_frame() {
        let err = first_frame(Path::new("/definitely/missing/Screen Recording.mov"), 100)
            .expect_err("missing file");
        assert!(matches!(err, VideoFrameError::NoFrame(_)));
    }
}
