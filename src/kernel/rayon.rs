//! Rayon-parallel scans (feature-gated).
//!
//! Rows of placements are scored on the rayon pool and collected back in row
//! order, so the resulting `ScoreMap` is identical to the sequential scan.

use crate::image::ImageView;
use crate::kernel::{scan_extent, Kernel, Metric};
use crate::search::surface::ScoreMap;
use crate::template::MaskedTemplate;
use crate::util::MaskMatchResult;
use rayon::prelude::*;

/// Row-parallel full scan with kernel `K`.
pub fn scan_full_par<K: Kernel>(
    image: ImageView<'_>,
    tpl: &MaskedTemplate,
    metric: Metric,
) -> MaskMatchResult<ScoreMap> {
    let (scan_width, scan_height) = scan_extent(image, tpl)?;

    let rows: Vec<Vec<f64>> = (0..scan_height)
        .into_par_iter()
        .map(|y| {
            (0..scan_width)
                .map(|x| K::score_at(image, tpl, x, y, metric))
                .collect()
        })
        .collect();

    let scores = rows.into_iter().flatten().collect();
    ScoreMap::new(scores, scan_width, scan_height)
}
