//! Low-level building blocks for custom matching pipelines.
//!
//! Most users should prefer [`crate::Locator`] or
//! [`crate::locate_best_match`]; these items expose the individual stages.

pub use crate::image::resize::{
    downscale_to_bound, resize_bilinear, resize_by_factor, scale_factor_for, scaled_size,
};
pub use crate::kernel::scalar::MaskedSsdScalar;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::MaskedSsdSimd;
pub use crate::kernel::{scan_extent, Kernel, Metric};
#[cfg(feature = "rayon")]
pub use crate::search::scan::match_masked_par;
pub use crate::search::scan::{match_masked, score_masked_at};
pub use crate::template::{build_mask, intensity, resize_pair, MASK_THRESHOLD};
