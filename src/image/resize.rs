//! Uniform bilinear resizing.
//!
//! Sampling is pixel-center aligned: destination pixel `d` maps to source
//! coordinate `(d + 0.5) / f - 0.5`, clamped to the valid range, where `f` is
//! the per-axis ratio of destination to source size. Every channel is
//! interpolated independently and rounded to the nearest integer.

use crate::image::{ImageView, OwnedImage};
use crate::util::math::{larger_dimension_factor, round_to_u8, scaled_dimension};
use crate::util::MaskMatchResult;

/// Returns the factor that maps the larger image dimension onto `target`.
pub fn scale_factor_for(width: usize, height: usize, target: usize) -> f64 {
    larger_dimension_factor(width, height, target)
}

/// Returns the output size produced by scaling `(width, height)` by `factor`.
pub fn scaled_size(width: usize, height: usize, factor: f64) -> (usize, usize) {
    (
        scaled_dimension(width, factor),
        scaled_dimension(height, factor),
    )
}

/// Resizes `src` by a single isotropic `factor`.
pub fn resize_by_factor(src: ImageView<'_>, factor: f64) -> MaskMatchResult<OwnedImage> {
    let (dst_width, dst_height) = scaled_size(src.width(), src.height(), factor);
    resize_bilinear(src, dst_width, dst_height)
}

/// Rescales `src` so that its larger dimension equals `bound`.
///
/// Returns the resized image together with the factor that was applied.
pub fn downscale_to_bound(src: ImageView<'_>, bound: usize) -> MaskMatchResult<(OwnedImage, f64)> {
    let factor = scale_factor_for(src.width(), src.height(), bound);
    let resized = resize_by_factor(src, factor)?;
    Ok((resized, factor))
}

/// Bilinear resize to an explicit destination size.
pub fn resize_bilinear(
    src: ImageView<'_>,
    dst_width: usize,
    dst_height: usize,
) -> MaskMatchResult<OwnedImage> {
    let channels = src.channels();
    if dst_width == src.width() && dst_height == src.height() {
        return Ok(src.to_owned_image());
    }

    let xs = axis_taps(src.width(), dst_width);
    let ys = axis_taps(src.height(), dst_height);
    let mut out = Vec::with_capacity(dst_width * dst_height * channels);

    for tap_y in &ys {
        let row0 = src.row(tap_y.i0).unwrap_or_default();
        let row1 = src.row(tap_y.i1).unwrap_or_default();
        for tap_x in &xs {
            let a = tap_x.i0 * channels;
            let b = tap_x.i1 * channels;
            for c in 0..channels {
                let top = row0[a + c] as f64 * (1.0 - tap_x.frac) + row0[b + c] as f64 * tap_x.frac;
                let bottom =
                    row1[a + c] as f64 * (1.0 - tap_x.frac) + row1[b + c] as f64 * tap_x.frac;
                out.push(round_to_u8(top * (1.0 - tap_y.frac) + bottom * tap_y.frac));
            }
        }
    }

    OwnedImage::new(out, dst_width, dst_height, channels)
}

#[derive(Clone, Copy, Debug)]
struct Tap {
    i0: usize,
    i1: usize,
    frac: f64,
}

fn axis_taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let ratio = src_len as f64 / dst_len as f64;
    let max = (src_len - 1) as f64;
    (0..dst_len)
        .map(|d| {
            let pos = ((d as f64 + 0.5) * ratio - 0.5).clamp(0.0, max);
            let i0 = pos.floor() as usize;
            let i1 = (i0 + 1).min(src_len - 1);
            Tap {
                i0,
                i1,
                frac: pos - i0 as f64,
            }
        })
        .collect()
}
