//! Scalar reference kernel.

use crate::image::ImageView;
use crate::kernel::Kernel;
use crate::template::MaskedTemplate;

/// Scalar masked squared-difference kernel.
pub struct MaskedSsdScalar;

impl Kernel for MaskedSsdScalar {
    fn sse_at(image: ImageView<'_>, tpl: &MaskedTemplate, x: usize, y: usize) -> u64 {
        let channels = tpl.channels();
        let row_len = tpl.width() * channels;
        let start = x * channels;
        let template = tpl.template();
        let mask = tpl.mask().view();

        let mut sse = 0u64;
        for ty in 0..tpl.height() {
            let img_row = image.row(y + ty).expect("row within bounds for scan");
            let img_row = &img_row[start..start + row_len];
            let tpl_row = template.row(ty).expect("template row");
            let mask_row = mask.row(ty).expect("mask row");
            for ((&i, &m), &t) in img_row.iter().zip(mask_row).zip(tpl_row) {
                let diff = i32::from(i) * i32::from(m) - i32::from(t);
                sse += (diff * diff) as u64;
            }
        }
        sse
    }
}
