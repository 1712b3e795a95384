//! Candidate template sizes.

use crate::search::LocateConfig;
use std::ops::Range;

/// Ascending, contiguous sequence of larger-dimension template sizes.
///
/// Iterates `lower..upper` with step 1. The range is `Copy`, so a fresh
/// iteration can be started from the same value at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleRange {
    lower: usize,
    upper: usize,
}

impl ScaleRange {
    /// Creates the range `lower..upper`; an empty range yields no scales.
    pub fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }

    /// Derives the range from fractions of the working dimension.
    ///
    /// The lower bound is `working_dimension * lower_fraction` truncated toward
    /// zero. The exclusive upper bound is the real product
    /// `working_dimension * upper_fraction`, so every integer size strictly
    /// below it is kept: the stored bound is its ceiling.
    pub fn from_fractions(working_dimension: usize, lower_fraction: f64, upper_fraction: f64) -> Self {
        let product = |fraction: f64| {
            let value = working_dimension as f64 * fraction;
            (value.is_finite() && value > 0.0).then_some(value)
        };
        let lower = product(lower_fraction).map_or(0, |v| v as usize);
        let upper = product(upper_fraction).map_or(0, |v| v.ceil() as usize);
        Self::new(lower, upper)
    }

    /// Returns the range configured on a locator.
    pub fn from_config(cfg: &LocateConfig) -> Self {
        Self::new(cfg.min_size, cfg.max_size)
    }

    /// Inclusive lower bound.
    pub fn lower(&self) -> usize {
        self.lower
    }

    /// Exclusive upper bound.
    pub fn upper(&self) -> usize {
        self.upper
    }

    /// Number of scales in the range.
    pub fn len(&self) -> usize {
        self.upper.saturating_sub(self.lower)
    }

    /// Returns true when the range holds no scales.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the scales in ascending order.
    pub fn iter(&self) -> Range<usize> {
        self.lower..self.upper
    }
}

impl IntoIterator for ScaleRange {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
