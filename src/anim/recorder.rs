//! GIF capture of a playback
//!
//! Frames are sampled from the rendered framebuffer at a fixed rate,
//! downscaled to a bounded width and kept in memory until [`Recorder::finish`]
//! encodes them. Recording is a native feature; on the web the constructor
//! returns `None`.

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, Frame, RgbaImage};

use crate::export::{to_image, ExportError};
use crate::rasterizer::Framebuffer;

/// Default capture rate
pub const DEFAULT_FPS: u32 = 15;
/// Frames wider than this are scaled down before storing
pub const MAX_GIF_WIDTH: u32 = 640;
/// Hard cap so a forgotten recording cannot eat all memory
pub const MAX_FRAMES: usize = 900;

pub struct Recorder {
    fps: u32,
    frames: Vec<RgbaImage>,
    last_capture: Option<f64>,
    size: Option<(u32, u32)>,
}

impl Recorder {
    /// `None` where recording is unsupported
    pub fn try_new(fps: u32) -> Option<Self> {
        if cfg!(target_arch = "wasm32") {
            return None;
        }
        Some(Self {
            fps: fps.clamp(1, 50),
            frames: Vec::new(),
            last_capture: None,
            size: None,
        })
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn interval(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Store `fb` if enough time has passed since the last stored frame.
    /// Returns whether a frame was taken.
    pub fn capture(&mut self, fb: &Framebuffer, now: f64) -> bool {
        if self.frames.len() >= MAX_FRAMES {
            return false;
        }
        if let Some(last) = self.last_capture {
            // Tolerate float drift from clocks built by repeated addition
            if now - last + 1e-9 < self.interval() {
                return false;
            }
        }
        let img = match to_image(fb) {
            Ok(img) => img,
            Err(e) => {
                log::warn!("Skipping recording frame: {}", e);
                return false;
            }
        };

        // Every frame shares the first frame's size
        let (w, h) = *self.size.get_or_insert_with(|| fit_width(img.width(), img.height()));
        let img = if img.dimensions() == (w, h) {
            img
        } else {
            imageops::resize(&img, w, h, FilterType::Triangle)
        };

        self.frames.push(img);
        self.last_capture = Some(now);
        true
    }

    /// Encode all captured frames as a looping GIF
    pub fn finish(self) -> Result<Vec<u8>, ExportError> {
        if self.frames.is_empty() {
            return Err(ExportError::Empty);
        }
        let count = self.frames.len();
        let delay = Delay::from_numer_denom_ms(1000, self.fps);
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut out, 10);
            encoder.set_repeat(Repeat::Infinite)?;
            encoder.encode_frames(
                self.frames
                    .into_iter()
                    .map(|img| Frame::from_parts(img, 0, 0, delay)),
            )?;
        }
        log::info!("Encoded {} frames into {} byte GIF", count, out.len());
        Ok(out)
    }
}

fn fit_width(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_GIF_WIDTH {
        return (width, height);
    }
    let h = (height as u64 * MAX_GIF_WIDTH as u64 / width.max(1) as u64).max(1) as u32;
    (MAX_GIF_WIDTH, h)
}
