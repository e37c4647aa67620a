//! Screenshot and recording export

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::rasterizer::Framebuffer;

/// File name prefix for everything we write
pub const FILE_PREFIX: &str = "coach-lab";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Nothing to export")]
    Empty,

    #[error("Pixel data does not match {width}x{height}")]
    SizeMismatch { width: usize, height: usize },
}

/// Copy a framebuffer into an owned RGBA image
pub fn to_image(fb: &Framebuffer) -> Result<RgbaImage, ExportError> {
    if fb.is_empty() {
        return Err(ExportError::Empty);
    }
    RgbaImage::from_raw(fb.width as u32, fb.height as u32, fb.pixels.clone())
        .ok_or(ExportError::SizeMismatch { width: fb.width, height: fb.height })
}

/// Encode the framebuffer as PNG
pub fn encode_png(fb: &Framebuffer) -> Result<Vec<u8>, ExportError> {
    let img = to_image(fb)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// First `coach-lab-<n>.<ext>` that does not exist yet in `dir`
pub fn next_free_path(dir: &Path, ext: &str) -> PathBuf {
    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{}-{}.{}", FILE_PREFIX, n, ext));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Write `bytes` to `dir/name`, creating the directory if needed
pub fn save_bytes(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, bytes)?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

fn save_numbered(dir: &Path, ext: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = next_free_path(dir, ext);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.{}", FILE_PREFIX, ext));
    save_bytes(dir, &name, bytes)
}

/// Save the current frame as a numbered PNG in `dir`
pub fn save_screenshot(fb: &Framebuffer, dir: &Path) -> Result<PathBuf, ExportError> {
    let png = encode_png(fb)?;
    save_numbered(dir, "png", &png)
}

/// Save an encoded GIF recording as a numbered file in `dir`
pub fn save_recording(gif: &[u8], dir: &Path) -> Result<PathBuf, ExportError> {
    if gif.is_empty() {
        return Err(ExportError::Empty);
    }
    save_numbered(dir, "gif", gif)
}
