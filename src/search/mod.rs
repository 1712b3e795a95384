//! Multi-scale masked template search.
//!
//! The locator downsamples the target image to a fixed working size, then
//! walks the candidate template sizes in ascending order. Each size gets a
//! full masked scan; the surface minimum is divided by the template's pixel
//! count so scores from different sizes are comparable, and the smallest
//! normalized score wins. Ties keep the earliest (smallest) scale, and the
//! walk stops at the first size that no longer fits inside the image.

pub mod observer;
pub mod scales;
pub(crate) mod scan;
pub mod surface;

use crate::image::resize::downscale_to_bound;
pub use crate::kernel::Metric;
use crate::search::observer::{CancelToken, NoopObserver, ScaleObserver, ScaleReport};
use crate::search::scales::ScaleRange;
use crate::search::surface::ScoreMap;
use crate::template::{MaskedTemplate, Template};
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{MaskMatchError, MaskMatchResult};
use crate::{ImageView, OwnedImage};

/// Configuration for the multi-scale search.
#[derive(Clone, Debug)]
pub struct LocateConfig {
    /// Larger dimension of the working image after preprocessing.
    pub working_dimension: usize,
    /// Smallest template size tried (inclusive), in working-image pixels.
    pub min_size: usize,
    /// Template size at which the search stops (exclusive).
    pub max_size: usize,
    /// Window score; normalization divides it by the template pixel count.
    pub metric: Metric,
    /// Scan rows in parallel when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self::from_fractions(200, 0.1, 0.4)
    }
}

impl LocateConfig {
    /// Builds a configuration whose size bounds are fractions of the working
    /// dimension; see [`ScaleRange::from_fractions`] for the rounding.
    pub fn from_fractions(working_dimension: usize, lower_fraction: f64, upper_fraction: f64) -> Self {
        let range = ScaleRange::from_fractions(working_dimension, lower_fraction, upper_fraction);
        Self {
            working_dimension,
            min_size: range.lower(),
            max_size: range.upper(),
            metric: Metric::default(),
            parallel: false,
        }
    }

    fn validate(&self) -> MaskMatchResult<()> {
        if self.working_dimension == 0 {
            return Err(MaskMatchError::InvalidInput(
                "working dimension must be positive",
            ));
        }
        if self.min_size == 0 {
            return Err(MaskMatchError::InvalidInput(
                "size lower bound must be positive",
            ));
        }
        Ok(())
    }
}

/// Axis-aligned rectangle in pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: usize,
    /// Top edge.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Maps a rectangle measured on an image resized by `factor` back to the
    /// unresized image, rounding each edge to the nearest pixel.
    pub fn to_source(&self, factor: f64) -> Rect {
        if !(factor.is_finite() && factor > 0.0) {
            return *self;
        }
        let map = |v: usize| (v as f64 / factor).round() as usize;
        let x = map(self.x);
        let y = map(self.y);
        Rect {
            x,
            y,
            width: map(self.right()).saturating_sub(x),
            height: map(self.bottom()).saturating_sub(y),
        }
    }
}

/// Best placement found at one scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchCandidate {
    /// Surface minimum divided by the template pixel count (`width * height`,
    /// masked-out pixels included).
    pub score: f64,
    /// Window in working-image coordinates.
    pub rect: Rect,
    /// Larger template dimension used for this scale.
    pub scale: usize,
}

/// Best placement across all scales.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BestMatch {
    /// Normalized score (lower is better).
    pub score: f64,
    /// Window in working-image coordinates.
    pub rect: Rect,
    /// Larger template dimension that produced the match.
    pub scale: usize,
    /// Factor that mapped the input image to the working image.
    pub working_scale: f64,
}

impl BestMatch {
    fn from_candidate(candidate: MatchCandidate, working_scale: f64) -> Self {
        Self {
            score: candidate.score,
            rect: candidate.rect,
            scale: candidate.scale,
            working_scale,
        }
    }

    /// Returns the match rectangle in input-image coordinates.
    pub fn source_rect(&self) -> Rect {
        self.rect.to_source(self.working_scale)
    }
}

/// Result of a multi-scale search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatchOutcome {
    /// At least one scale fit inside the image.
    Found(BestMatch),
    /// No candidate scale produced a template that fits inside the image.
    NoFeasibleScale,
}

impl MatchOutcome {
    /// Returns the best match, if any.
    pub fn best(&self) -> Option<&BestMatch> {
        match self {
            MatchOutcome::Found(best) => Some(best),
            MatchOutcome::NoFeasibleScale => None,
        }
    }

    /// Consumes the outcome and returns the best match, if any.
    pub fn into_best(self) -> Option<BestMatch> {
        match self {
            MatchOutcome::Found(best) => Some(best),
            MatchOutcome::NoFeasibleScale => None,
        }
    }

    /// Returns true when a match was found.
    pub fn is_found(&self) -> bool {
        matches!(self, MatchOutcome::Found(_))
    }
}

/// Multi-scale masked template locator.
///
/// The mask is built once at construction; every search reuses it.
pub struct Locator {
    template: MaskedTemplate,
    cfg: LocateConfig,
    cancel: Option<CancelToken>,
}

impl Locator {
    /// Creates a locator for `template`, building its background mask.
    pub fn new(template: &Template) -> Self {
        Self::from_masked(template.to_masked())
    }

    /// Creates a locator from an explicit template/mask pair.
    pub fn from_masked(template: MaskedTemplate) -> Self {
        Self {
            template,
            cfg: LocateConfig::default(),
            cancel: None,
        }
    }

    /// Replaces the search configuration.
    pub fn with_config(mut self, cfg: LocateConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Installs a token that is checked before every scale.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &LocateConfig {
        &self.cfg
    }

    /// Returns the full-resolution template/mask pair.
    pub fn template(&self) -> &MaskedTemplate {
        &self.template
    }

    /// Downsamples `image` to the working size and runs the search.
    pub fn locate(&self, image: ImageView<'_>) -> MaskMatchResult<MatchOutcome> {
        self.locate_with_observer(image, &mut NoopObserver)
    }

    /// Like [`Locator::locate`], reporting every scale to `observer`.
    pub fn locate_with_observer<O: ScaleObserver + ?Sized>(
        &self,
        image: ImageView<'_>,
        observer: &mut O,
    ) -> MaskMatchResult<MatchOutcome> {
        let (working, factor) = self.working_image(image)?;
        self.search_scales(
            working.view(),
            ScaleRange::from_config(&self.cfg),
            factor,
            observer,
        )
    }

    /// Validates the configuration and rescales `image` so its larger
    /// dimension equals `working_dimension`.
    ///
    /// Returns the working image and the factor that produced it. Callers that
    /// need the working image themselves pass both to
    /// [`Locator::search_scales`] instead of calling [`Locator::locate`].
    pub fn working_image(&self, image: ImageView<'_>) -> MaskMatchResult<(OwnedImage, f64)> {
        self.cfg.validate()?;
        self.check_channels(image)?;

        let (working, factor) = downscale_to_bound(image, self.cfg.working_dimension)?;
        trace_event!(
            "working_image",
            width = working.width(),
            height = working.height(),
            factor = factor
        );
        Ok((working, factor))
    }

    /// Searches `scales` against an image that is already at working size.
    ///
    /// `working_scale` is recorded in the result so callers can map the
    /// rectangle back to their original image; pass `1.0` when there is none.
    pub fn search_scales<O: ScaleObserver + ?Sized>(
        &self,
        image: ImageView<'_>,
        scales: ScaleRange,
        working_scale: f64,
        observer: &mut O,
    ) -> MaskMatchResult<MatchOutcome> {
        self.check_channels(image)?;
        let _span = trace_span!(
            "locate_best_match",
            min_size = scales.lower(),
            max_size = scales.upper(),
            parallel = self.cfg.parallel
        )
        .entered();

        let mut best: Option<BestMatch> = None;
        for scale in scales {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(MaskMatchError::Cancelled);
            }

            let resized = self.template.resized(scale)?;
            if resized.width() > image.width() || resized.height() > image.height() {
                trace_event!(
                    "early_stop",
                    scale = scale,
                    width = resized.width(),
                    height = resized.height()
                );
                break;
            }

            let _scale_span = trace_span!("scan_scale", scale = scale).entered();
            let surface = self.scan(image, &resized)?;
            let Some((x, y, raw)) = surface.min_location() else {
                continue;
            };

            let candidate = MatchCandidate {
                score: raw / resized.pixel_count() as f64,
                rect: Rect::new(x, y, resized.width(), resized.height()),
                scale,
            };
            let improved = best.map_or(true, |b| candidate.score < b.score);
            if improved {
                best = Some(BestMatch::from_candidate(candidate, working_scale));
            }
            trace_debug!(
                "scale_scored",
                scale = scale,
                score = candidate.score,
                x = x,
                y = y,
                improved = improved
            );

            observer.on_scale(&ScaleReport {
                image,
                template: &resized,
                candidate,
                improved,
                best,
            });
        }

        let outcome = match best {
            Some(best) => {
                trace_event!(
                    "best_match",
                    score = best.score,
                    scale = best.scale,
                    x = best.rect.x,
                    y = best.rect.y
                );
                MatchOutcome::Found(best)
            }
            None => MatchOutcome::NoFeasibleScale,
        };
        observer.on_finish(&outcome);
        Ok(outcome)
    }

    fn check_channels(&self, image: ImageView<'_>) -> MaskMatchResult<()> {
        if image.channels() != self.template.channels() {
            return Err(MaskMatchError::ShapeMismatch {
                context: "image/template channels",
                expected: image.shape(),
                got: (
                    self.template.width(),
                    self.template.height(),
                    self.template.channels(),
                ),
            });
        }
        Ok(())
    }

    fn scan(&self, image: ImageView<'_>, tpl: &MaskedTemplate) -> MaskMatchResult<ScoreMap> {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return scan::match_masked_par(image, tpl, self.cfg.metric);
        }
        scan::match_masked(image, tpl, self.cfg.metric)
    }
}

/// Locates `raw_template` in `image` across template sizes
/// `size_lower_bound..size_upper_bound`, after scaling the image so its
/// larger dimension equals `working_dimension_bound`.
pub fn locate_best_match(
    image: ImageView<'_>,
    raw_template: &Template,
    size_lower_bound: usize,
    size_upper_bound: usize,
    working_dimension_bound: usize,
) -> MaskMatchResult<MatchOutcome> {
    Locator::new(raw_template)
        .with_config(LocateConfig {
            working_dimension: working_dimension_bound,
            min_size: size_lower_bound,
            max_size: size_upper_bound,
            ..LocateConfig::default()
        })
        .locate(image)
}
