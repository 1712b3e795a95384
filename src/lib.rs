//! MaskMatch locates an irregularly shaped template inside an image.
//!
//! The template's background is turned into a binary mask, the template is
//! tried at a range of uniform sizes, and every placement is scored with a
//! masked squared difference. The best per-pixel score across all sizes wins.
//! Row-parallel scanning is available via the `rayon` feature and a SIMD
//! kernel via the `simd` feature; both produce identical results to the
//! scalar path.

pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod search;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;
pub use image::{ImageView, OwnedImage};
pub use search::observer::{CancelToken, CandidateLog, NoopObserver, ScaleObserver, ScaleReport};
pub use search::scales::ScaleRange;
pub use search::surface::ScoreMap;
pub use search::{
    locate_best_match, BestMatch, LocateConfig, Locator, MatchCandidate, MatchOutcome, Metric,
    Rect,
};
pub use template::{Mask, MaskedTemplate, Template};
pub use util::{MaskMatchError, MaskMatchResult};
