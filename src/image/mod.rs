//! Pixel buffers and borrowed views.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer of interleaved `u8`
//! samples. Each pixel holds `channels` consecutive samples and the stride
//! counts elements between the starts of consecutive rows, so a stride larger
//! than `width * channels` represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.

use crate::util::{MaskMatchError, MaskMatchResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod resize;

/// Borrowed multi-channel image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Creates a contiguous view with `stride == width * channels`.
    pub fn from_slice(
        data: &'a [u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> MaskMatchResult<Self> {
        let stride = row_len(width, height, channels)?;
        Self::new(data, width, height, channels, stride)
    }

    /// Creates a view with an explicit stride in elements.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> MaskMatchResult<Self> {
        let needed = required_len(width, height, channels, stride)?;
        if data.len() < needed {
            return Err(MaskMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved samples per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns `(width, height, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels)
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the samples of pixel `(x, y)` if it is within bounds.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<&'a [u8]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let start = x * self.channels;
        row.get(start..start + self.channels)
    }

    /// Returns the samples of row `y`, `width * channels` elements long.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width * self.channels)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(&self, x: usize, y: usize, width: usize, height: usize) -> MaskMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(MaskMatchError::InvalidDimensions { width, height });
        }
        let out_of_bounds = MaskMatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or(out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or(out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y * self.stride + x * self.channels;
        let data = self
            .data
            .get(start..)
            .ok_or(MaskMatchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;
        ImageView::new(data, width, height, self.channels, self.stride)
    }

    /// Copies the view into a contiguous owned buffer.
    pub fn to_owned_image(&self) -> OwnedImage {
        let row_len = self.width * self.channels;
        let mut data = Vec::with_capacity(row_len * self.height);
        for y in 0..self.height {
            let start = y * self.stride;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        OwnedImage {
            data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }
}

/// Owned contiguous pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

impl OwnedImage {
    /// Wraps a contiguous interleaved buffer; the length must match exactly.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> MaskMatchResult<Self> {
        let row = row_len(width, height, channels)?;
        let needed = row
            .checked_mul(height)
            .ok_or(MaskMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(MaskMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(MaskMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Creates an image with every pixel set to `pixel`.
    pub fn filled(width: usize, height: usize, pixel: &[u8]) -> MaskMatchResult<Self> {
        let channels = pixel.len();
        let row = row_len(width, height, channels)?;
        let mut data = Vec::with_capacity(row * height);
        for _ in 0..width * height {
            data.extend_from_slice(pixel);
        }
        Self::new(data, width, height, channels)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.width * self.channels,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved samples per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns `(width, height, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels)
    }

    /// Returns the contiguous sample buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the samples of pixel `(x, y)` if it is within bounds.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * self.channels;
        self.data.get(start..start + self.channels)
    }

    /// Overwrites pixel `(x, y)`; out-of-range coordinates are ignored.
    pub fn put_pixel(&mut self, x: usize, y: usize, pixel: &[u8]) {
        if x >= self.width || y >= self.height || pixel.len() != self.channels {
            return;
        }
        let start = (y * self.width + x) * self.channels;
        self.data[start..start + self.channels].copy_from_slice(pixel);
    }

    /// Consumes the image and returns its sample buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

fn row_len(width: usize, height: usize, channels: usize) -> MaskMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(MaskMatchError::InvalidDimensions { width, height });
    }
    if channels == 0 {
        return Err(MaskMatchError::InvalidChannels { channels });
    }
    width
        .checked_mul(channels)
        .ok_or(MaskMatchError::InvalidDimensions { width, height })
}

fn required_len(
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
) -> MaskMatchResult<usize> {
    let row = row_len(width, height, channels)?;
    if stride < row {
        return Err(MaskMatchError::InvalidStride {
            row_len: row,
            stride,
        });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row))
        .ok_or(MaskMatchError::InvalidDimensions { width, height })
}
