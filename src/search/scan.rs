//! Checked entry points for scoring windows and scanning one scale.

use crate::image::ImageView;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::scan_full_par;
use crate::kernel::{scan_extent, Kernel, Metric};
use crate::search::surface::ScoreMap;
use crate::template::MaskedTemplate;
use crate::util::{MaskMatchError, MaskMatchResult};

#[cfg(not(feature = "simd"))]
pub(crate) use crate::kernel::scalar::MaskedSsdScalar as MaskedSsd;
#[cfg(feature = "simd")]
pub(crate) use crate::kernel::simd::MaskedSsdSimd as MaskedSsd;

/// Scores the window whose top-left corner is `(x, y)`.
///
/// The squared differences of `window * mask - template` are summed over every
/// pixel and channel and finished by `metric`. The score is zero exactly when
/// the masked window equals the template.
pub fn score_masked_at(
    image: ImageView<'_>,
    tpl: &MaskedTemplate,
    x: usize,
    y: usize,
    metric: Metric,
) -> MaskMatchResult<f64> {
    let (scan_width, scan_height) = scan_extent(image, tpl)?;
    if x >= scan_width || y >= scan_height {
        return Err(MaskMatchError::RoiOutOfBounds {
            x,
            y,
            width: tpl.width(),
            height: tpl.height(),
            img_width: image.width(),
            img_height: image.height(),
        });
    }
    Ok(MaskedSsd::score_at(image, tpl, x, y, metric))
}

/// Scores every valid placement of `tpl` in `image`.
///
/// The surface is `(W - w + 1) x (H - h + 1)`; a template larger than the
/// image fails with `RoiOutOfBounds`.
pub fn match_masked(
    image: ImageView<'_>,
    tpl: &MaskedTemplate,
    metric: Metric,
) -> MaskMatchResult<ScoreMap> {
    MaskedSsd::scan_full(image, tpl, metric)
}

/// Row-parallel variant of [`match_masked`] with identical output.
#[cfg(feature = "rayon")]
pub fn match_masked_par(
    image: ImageView<'_>,
    tpl: &MaskedTemplate,
    metric: Metric,
) -> MaskMatchResult<ScoreMap> {
    scan_full_par::<MaskedSsd>(image, tpl, metric)
}
