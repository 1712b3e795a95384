//! Error types for maskmatch.

use thiserror::Error;

/// Result alias for maskmatch operations.
pub type MaskMatchResult<T> = std::result::Result<T, MaskMatchError>;

/// Errors that can occur when building or running a masked match.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MaskMatchError {
    /// Width or height is zero, or the element count overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The channel count is zero.
    #[error("invalid channel count {channels}")]
    InvalidChannels { channels: usize },
    /// The row stride is shorter than one row of pixels.
    #[error("stride {stride} is smaller than row length {row_len}")]
    InvalidStride { row_len: usize, stride: usize },
    /// The backing buffer does not hold enough elements.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A window does not lie inside the image.
    #[error(
        "window ({x}, {y}) {width}x{height} is outside image {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template, mask and image disagree on dimensions or channel count.
    #[error("shape mismatch for {context}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: (usize, usize, usize),
        got: (usize, usize, usize),
    },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The search was cancelled between two scales.
    #[error("search cancelled")]
    Cancelled,
    /// Image decoding or encoding failed.
    #[cfg(feature = "image-io")]
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
