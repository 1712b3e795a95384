//! Isotropic resizing of a template/mask pair.

use crate::image::resize::{resize_by_factor, scale_factor_for};
use crate::template::{Mask, MaskedTemplate};
use crate::util::{MaskMatchError, MaskMatchResult};

/// Resizes template and mask so the larger template dimension becomes `target`.
///
/// Both buffers use the same factor and the same bilinear sampling, so their
/// pixel grids stay aligned. Interpolated mask weights round back to 0 or 1.
pub fn resize_pair(pair: &MaskedTemplate, target: usize) -> MaskMatchResult<MaskedTemplate> {
    if target == 0 {
        return Err(MaskMatchError::InvalidInput("target size must be positive"));
    }
    let factor = scale_factor_for(pair.width(), pair.height(), target);
    let template = resize_by_factor(pair.template(), factor)?;
    let mask = resize_by_factor(pair.mask().view(), factor)?;

    debug_assert_eq!(template.shape(), mask.shape());
    Ok(MaskedTemplate::from_parts(template, Mask::from_binary(mask)))
}
