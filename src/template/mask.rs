//! Background mask construction.

use crate::image::{ImageView, OwnedImage};
use crate::template::Mask;

/// Intensities strictly above this value are treated as foreground.
pub const MASK_THRESHOLD: u8 = 3;

const LUMA_SHIFT: u32 = 14;
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;

/// Returns the 8-bit intensity of one pixel.
///
/// Pixels with three or more channels use BT.601 luma weights in 14-bit fixed
/// point (channel order R, G, B; extra channels are ignored). One- and
/// two-channel pixels use their first channel.
pub fn intensity(px: &[u8]) -> u8 {
    match px {
        [r, g, b, ..] => {
            let sum = u32::from(*r) * LUMA_R + u32::from(*g) * LUMA_G + u32::from(*b) * LUMA_B;
            ((sum + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
        }
        [v, ..] => *v,
        [] => 0,
    }
}

/// Builds a binary mask from the template's non-background pixels.
///
/// Each pixel is reduced to its intensity, thresholded at `MASK_THRESHOLD`
/// and the 0/1 result is broadcast to every channel.
pub fn build_mask(template: ImageView<'_>) -> Mask {
    let (width, height, channels) = template.shape();
    let mut weights = Vec::with_capacity(width * height * channels);
    for y in 0..height {
        let row = template.row(y).unwrap_or_default();
        for px in row.chunks(channels) {
            let w = u8::from(intensity(px) > MASK_THRESHOLD);
            weights.extend(std::iter::repeat(w).take(channels));
        }
    }

    let img = OwnedImage::new(weights, width, height, channels)
        .expect("mask buffer matches template shape");
    debug_assert_eq!(img.shape(), template.shape());
    Mask::from_binary(img)
}

#[cfg(test)]
mod tests {
    use super::{build_mask, intensity, MASK_THRESHOLD};
    use crate::image::OwnedImage;

    #[test]
    fn intensity_matches_luma_weights() {
        assert_eq!(intensity(&[255, 255, 255]), 255);
        assert_eq!(intensity(&[0, 0, 0]), 0);
        assert_eq!(intensity(&[255, 0, 0]), 76);
        assert_eq!(intensity(&[0, 255, 0]), 150);
        assert_eq!(intensity(&[0, 0, 255]), 29);
        assert_eq!(intensity(&[42]), 42);
        assert_eq!(intensity(&[9, 255]), 9);
    }

    #[test]
    fn threshold_is_strict() {
        let data = vec![MASK_THRESHOLD, MASK_THRESHOLD + 1, 0, 255];
        let tpl = OwnedImage::new(data, 4, 1, 1).unwrap();
        let mask = build_mask(tpl.view());
        assert_eq!(mask.data(), &[0, 1, 0, 1]);
    }

    #[test]
    fn mask_is_broadcast_to_all_channels() {
        let data = vec![0, 0, 0, 200, 10, 10, 2, 2, 2, 4, 4, 4];
        let tpl = OwnedImage::new(data, 2, 2, 3).unwrap();
        let mask = build_mask(tpl.view());
        assert_eq!(mask.shape(), (2, 2, 3));
        assert_eq!(mask.data(), &[0, 0, 0, 1, 1, 1, 0, 0, 0, 1, 1, 1]);
        assert_eq!(mask.included_pixels(), 2);
    }
}
