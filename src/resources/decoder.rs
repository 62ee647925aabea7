//! Image decoding for scene textures.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::SceneError;

/// Decoded pixel data in row-major order, `channels` bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl DecodedImage {
    /// Byte length of a tightly packed buffer with these dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Why the pixel buffer cannot back a texture, if it cannot.
    pub fn layout_defect(&self) -> Option<String> {
        if self.width == 0 || self.height == 0 {
            return Some(format!("image is empty ({}x{})", self.width, self.height));
        }
        if self.pixels.len() != self.expected_len() {
            return Some(format!(
                "expected {} bytes of pixel data for {}x{}x{}, got {}",
                self.expected_len(),
                self.width,
                self.height,
                self.channels,
                self.pixels.len()
            ));
        }
        None
    }
}

/// Turns an image file into raw pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, SceneError>;
}

/// Decodes with the `image` crate and flips every image vertically.
///
/// The flip puts the bottom row first, so a texture coordinate of `v = 0`
/// addresses the bottom of the picture. Relative paths are resolved against
/// `root`.
#[derive(Clone, Debug)]
pub struct FlippedImageDecoder {
    root: PathBuf,
}

impl FlippedImageDecoder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for FlippedImageDecoder {
    fn default() -> Self {
        Self::new(Path::new("./").join("assets"))
    }
}

impl ImageDecoder for FlippedImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, SceneError> {
        let full_path = self.resolve(path);
        let load_failure = |reason: String| SceneError::ImageLoadFailure {
            path: full_path.clone(),
            reason,
        };
        let bytes = std::fs::read(&full_path).map_err(|e| load_failure(e.to_string()))?;
        let img = image::load_from_memory(&bytes).map_err(|e| load_failure(e.to_string()))?;
        Ok(decode_flipped(img.flipv()))
    }
}

/// Keep the source channel count and narrow every channel to 8 bits.
fn decode_flipped(img: DynamicImage) -> DecodedImage {
    let width = img.width();
    let height = img.height();
    let channels = img.color().channel_count();
    let pixels = match channels {
        1 => img.into_luma8().into_raw(),
        2 => img.into_luma_alpha8().into_raw(),
        3 => img.into_rgb8().into_raw(),
        _ => img.into_rgba8().into_raw(),
    };
    DecodedImage {
        pixels,
        width,
        height,
        channels,
    }
}
