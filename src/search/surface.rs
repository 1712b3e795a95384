//! Score surfaces and their minimum reduction.

use crate::util::{MaskMatchError, MaskMatchResult};

/// Dense grid of scores, one per top-left placement, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMap {
    scores: Vec<f64>,
    width: usize,
    height: usize,
}

impl ScoreMap {
    /// Wraps a row-major score buffer of exactly `width * height` entries.
    pub fn new(scores: Vec<f64>, width: usize, height: usize) -> MaskMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(MaskMatchError::InvalidDimensions { width, height });
        }
        let needed = width * height;
        if scores.len() != needed {
            return Err(MaskMatchError::BufferTooSmall {
                needed,
                got: scores.len(),
            });
        }
        Ok(Self {
            scores,
            width,
            height,
        })
    }

    /// Number of placements along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of placements along y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major score buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }

    /// Score at placement `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scores.get(y * self.width + x).copied()
    }

    /// Returns `(x, y, score)` of the smallest score.
    ///
    /// Ties resolve to the first occurrence in row-major order (lowest row,
    /// then lowest column). NaN scores are never selected.
    pub fn min_location(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &score) in self.scores.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, current)) if score >= current => {}
                _ => best = Some((idx, score)),
            }
        }
        best.map(|(idx, score)| (idx % self.width, idx / self.width, score))
    }
}
