//! Convenience helpers for moving pixels in and out of the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageView, OwnedImage};
use crate::util::{MaskMatchError, MaskMatchResult};
use std::path::Path;

/// Creates a borrowed three-channel view over an RGB image buffer.
pub fn view_from_rgb_image(img: &image::RgbImage) -> MaskMatchResult<ImageView<'_>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize, 3)
}

/// Creates an owned three-channel image from an RGB image buffer.
pub fn owned_from_rgb_image(img: &image::RgbImage) -> MaskMatchResult<OwnedImage> {
    OwnedImage::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
        3,
    )
}

/// Converts a dynamic image to an owned RGB pixel buffer.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> MaskMatchResult<OwnedImage> {
    owned_from_rgb_image(&img.to_rgb8())
}

/// Loads an image from disk as a three-channel RGB pixel buffer.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> MaskMatchResult<OwnedImage> {
    let img = image::open(path).map_err(|err| MaskMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Converts a pixel buffer back into an `RgbImage`.
///
/// Single-channel buffers are replicated into all three channels; buffers with
/// more than three channels keep their first three.
pub fn to_rgb_image(img: &OwnedImage) -> MaskMatchResult<image::RgbImage> {
    let channels = img.channels();
    let mut rgb = Vec::with_capacity(img.width() * img.height() * 3);
    for px in img.data().chunks(channels) {
        match channels {
            1 | 2 => rgb.extend_from_slice(&[px[0], px[0], px[0]]),
            _ => rgb.extend_from_slice(&px[..3]),
        }
    }
    let width = img.width() as u32;
    let height = img.height() as u32;
    image::RgbImage::from_raw(width, height, rgb).ok_or(MaskMatchError::ImageIo {
        reason: "pixel buffer does not match image size".to_string(),
    })
}
