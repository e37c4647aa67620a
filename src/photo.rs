//! Player photo import
//!
//! Uploaded images are decoded, scaled to cover a small square and
//! centre-cropped, then cached by player id. The renderer draws a cached
//! photo inside the player's circle; anything that fails to decode just
//! leaves the numbered circle.

use std::collections::HashMap;

use image::{imageops::FilterType, RgbaImage};
use thiserror::Error;

use crate::board::PlayerId;

/// Edge length of a cached photo in pixels
pub const PHOTO_SIZE: u32 = 64;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Square RGBA photo ready to blit
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPhoto {
    pub rgba: Vec<u8>,
    pub size: u32,
}

/// Decode any supported image and crop it to a `PHOTO_SIZE` square
pub fn decode_photo(bytes: &[u8]) -> Result<PlayerPhoto, PhotoError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    crop_square(&img, PHOTO_SIZE)
}

/// Scale to cover `target` x `target`, crop the centre
fn crop_square(img: &RgbaImage, target: u32) -> Result<PlayerPhoto, PhotoError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(PhotoError::Empty { width, height });
    }

    let target_f = target as f32;
    let scale = (target_f / width as f32).max(target_f / height as f32);
    let new_w = ((width as f32 * scale).round() as u32).max(target);
    let new_h = ((height as f32 * scale).round() as u32).max(target);
    let scaled = image::imageops::resize(img, new_w, new_h, FilterType::Triangle);

    let crop_x = (new_w - target) / 2;
    let crop_y = (new_h - target) / 2;
    let cropped = image::imageops::crop_imm(&scaled, crop_x, crop_y, target, target).to_image();

    Ok(PlayerPhoto { rgba: cropped.into_raw(), size: target })
}

/// Decoded photos keyed by player
#[derive(Debug, Default)]
pub struct PhotoCache {
    photos: HashMap<PlayerId, PlayerPhoto>,
}

impl PhotoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and store a photo for `player`. On failure the previous photo
    /// (if any) is kept.
    pub fn load(&mut self, player: PlayerId, bytes: &[u8]) -> Result<(), PhotoError> {
        match decode_photo(bytes) {
            Ok(photo) => {
                self.photos.insert(player, photo);
                Ok(())
            }
            Err(e) => {
                log::warn!("Photo for player {:?} rejected: {}", player, e);
                Err(e)
            }
        }
    }

    pub fn get(&self, player: PlayerId) -> Option<&PlayerPhoto> {
        self.photos.get(&player)
    }
}
