//! Masked window scoring kernels.
//!
//! A kernel scores one placement of a `MaskedTemplate` against an image
//! window and can sweep every valid placement into a `ScoreMap`. All kernels
//! accumulate the squared differences of `window * mask - template` exactly in
//! integers, so their outputs are bit-identical.

use crate::image::ImageView;
use crate::search::surface::ScoreMap;
use crate::template::MaskedTemplate;
use crate::util::{MaskMatchError, MaskMatchResult};

/// How the squared-difference sum of a window is turned into a score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// Sum of squared differences. Per-pixel normalized scores are
    /// comparable across template sizes.
    #[default]
    SumSquared,
    /// Euclidean norm, the square root of the sum. Ranks placements within
    /// one scale identically to `SumSquared`.
    L2Norm,
}

impl Metric {
    /// Converts an exact squared-difference sum into a score.
    #[inline]
    pub fn finish(self, sse: u64) -> f64 {
        match self {
            Metric::SumSquared => sse as f64,
            Metric::L2Norm => (sse as f64).sqrt(),
        }
    }
}

/// Kernel trait for masked difference scoring.
pub trait Kernel {
    /// Sum of squared masked differences for the window at `(x, y)`.
    ///
    /// The caller guarantees that shapes were validated with
    /// [`scan_extent`] and that the placement is inside the scan range.
    fn sse_at(image: ImageView<'_>, tpl: &MaskedTemplate, x: usize, y: usize) -> u64;

    /// Score for the window at `(x, y)` under `metric`.
    fn score_at(
        image: ImageView<'_>,
        tpl: &MaskedTemplate,
        x: usize,
        y: usize,
        metric: Metric,
    ) -> f64 {
        metric.finish(Self::sse_at(image, tpl, x, y))
    }

    /// Scores every valid placement in row-major order.
    fn scan_full(
        image: ImageView<'_>,
        tpl: &MaskedTemplate,
        metric: Metric,
    ) -> MaskMatchResult<ScoreMap> {
        let (scan_width, scan_height) = scan_extent(image, tpl)?;
        let mut scores = Vec::with_capacity(scan_width * scan_height);
        for y in 0..scan_height {
            for x in 0..scan_width {
                scores.push(Self::score_at(image, tpl, x, y, metric));
            }
        }
        ScoreMap::new(scores, scan_width, scan_height)
    }
}

/// Validates shapes and returns the number of placements along each axis.
///
/// Fails with `ShapeMismatch` when the image and template disagree on channel
/// count and with `RoiOutOfBounds` when the template does not fit.
pub fn scan_extent(image: ImageView<'_>, tpl: &MaskedTemplate) -> MaskMatchResult<(usize, usize)> {
    let (mask_w, mask_h, mask_c) = tpl.mask().shape();
    if (mask_w, mask_h, mask_c) != (tpl.width(), tpl.height(), tpl.channels()) {
        return Err(MaskMatchError::ShapeMismatch {
            context: "template/mask",
            expected: (tpl.width(), tpl.height(), tpl.channels()),
            got: (mask_w, mask_h, mask_c),
        });
    }
    if image.channels() != tpl.channels() {
        return Err(MaskMatchError::ShapeMismatch {
            context: "image/template channels",
            expected: (image.width(), image.height(), image.channels()),
            got: (tpl.width(), tpl.height(), tpl.channels()),
        });
    }
    if tpl.width() > image.width() || tpl.height() > image.height() {
        return Err(MaskMatchError::RoiOutOfBounds {
            x: 0,
            y: 0,
            width: tpl.width(),
            height: tpl.height(),
            img_width: image.width(),
            img_height: image.height(),
        });
    }
    Ok((
        image.width() - tpl.width() + 1,
        image.height() - tpl.height() + 1,
    ))
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;
