//! Template and mask storage.
//!
//! A `Template` is the raw reference pattern. Building its mask yields a
//! `MaskedTemplate`, the aligned template/mask pair that every scale of the
//! search is derived from.

use crate::image::{ImageView, OwnedImage};
use crate::util::{MaskMatchError, MaskMatchResult};

pub mod mask;
pub mod scale;

pub use mask::{build_mask, intensity, MASK_THRESHOLD};
pub use scale::resize_pair;

/// Owned raw template image.
#[derive(Clone, Debug)]
pub struct Template {
    img: OwnedImage,
}

impl Template {
    /// Creates a template from a contiguous interleaved buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize, channels: usize) -> MaskMatchResult<Self> {
        let img = OwnedImage::new(data, width, height, channels)?;
        Ok(Self { img })
    }

    /// Wraps an already decoded pixel buffer.
    pub fn from_image(img: OwnedImage) -> Self {
        Self { img }
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_> {
        self.img.view()
    }

    /// Builds the background mask and pairs it with a copy of the template.
    pub fn to_masked(&self) -> MaskedTemplate {
        let mask = build_mask(self.view());
        MaskedTemplate {
            template: self.img.clone(),
            mask,
        }
    }
}

/// Binary per-sample inclusion weights (every sample is 0 or 1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    img: OwnedImage,
}

impl Mask {
    /// Wraps a weight image, rejecting samples other than 0 and 1.
    pub fn new(img: OwnedImage) -> MaskMatchResult<Self> {
        if img.data().iter().any(|&w| w > 1) {
            return Err(MaskMatchError::InvalidInput("mask samples must be 0 or 1"));
        }
        Ok(Self { img })
    }

    pub(crate) fn from_binary(img: OwnedImage) -> Self {
        debug_assert!(img.data().iter().all(|&w| w <= 1));
        Self { img }
    }

    /// Returns a borrowed view of the weights.
    pub fn view(&self) -> ImageView<'_> {
        self.img.view()
    }

    /// Returns `(width, height, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.img.shape()
    }

    /// Returns the weight samples in row-major interleaved order.
    pub fn data(&self) -> &[u8] {
        self.img.data()
    }

    /// Counts pixels with a nonzero weight in any channel.
    pub fn included_pixels(&self) -> usize {
        self.img
            .data()
            .chunks(self.img.channels())
            .filter(|px| px.iter().any(|&w| w != 0))
            .count()
    }
}

/// Template image paired with a mask of identical shape.
#[derive(Clone, Debug)]
pub struct MaskedTemplate {
    template: OwnedImage,
    mask: Mask,
}

impl MaskedTemplate {
    /// Pairs a template with an explicit mask.
    pub fn new(template: OwnedImage, mask: Mask) -> MaskMatchResult<Self> {
        if template.shape() != mask.shape() {
            return Err(MaskMatchError::ShapeMismatch {
                context: "template/mask",
                expected: template.shape(),
                got: mask.shape(),
            });
        }
        Ok(Self { template, mask })
    }

    pub(crate) fn from_parts(template: OwnedImage, mask: Mask) -> Self {
        debug_assert_eq!(template.shape(), mask.shape());
        Self { template, mask }
    }

    /// Returns a view of the template samples.
    pub fn template(&self) -> ImageView<'_> {
        self.template.view()
    }

    /// Returns the mask.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.template.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.template.height()
    }

    /// Returns the number of samples per pixel.
    pub fn channels(&self) -> usize {
        self.template.channels()
    }

    /// Returns `width * height`, the per-scale score normalizer.
    pub fn pixel_count(&self) -> usize {
        self.template.width() * self.template.height()
    }

    /// Returns a copy resized so its larger dimension equals `target`.
    pub fn resized(&self, target: usize) -> MaskMatchResult<Self> {
        resize_pair(self, target)
    }
}
