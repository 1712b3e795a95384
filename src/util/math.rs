//! Scale-factor arithmetic shared by the resizer and the locator.

/// Returns the factor that maps the larger of `width`/`height` onto `target`.
///
/// Ties between width and height resolve to the height, which yields the same
/// factor either way.
pub(crate) fn larger_dimension_factor(width: usize, height: usize, target: usize) -> f64 {
    let larger = if width > height { width } else { height };
    target as f64 / larger as f64
}

/// Applies `factor` to a single dimension, rounding to nearest and never
/// collapsing below one pixel.
pub(crate) fn scaled_dimension(dim: usize, factor: f64) -> usize {
    let scaled = (dim as f64 * factor).round();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled as usize
    } else {
        1
    }
}

/// Rounds a sampled value to the nearest `u8`.
pub(crate) fn round_to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
