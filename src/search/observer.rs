//! Per-scale observation hooks and cooperative cancellation.
//!
//! Observers replace interactive debug displays: the locator calls them
//! synchronously and never waits on them for anything beyond the call itself.

use crate::search::{BestMatch, MatchCandidate, MatchOutcome};
use crate::template::MaskedTemplate;
use crate::ImageView;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Snapshot handed to an observer after one scale has been scored.
pub struct ScaleReport<'a> {
    /// Working image the scale was scanned against.
    pub image: ImageView<'a>,
    /// Template and mask resized for this scale.
    pub template: &'a MaskedTemplate,
    /// Best placement at this scale, normalized per pixel.
    pub candidate: MatchCandidate,
    /// Whether this scale replaced the running best.
    pub improved: bool,
    /// Running best after this scale.
    pub best: Option<BestMatch>,
}

/// Receives progress from a multi-scale search.
pub trait ScaleObserver {
    /// Called once per scored scale, in ascending scale order.
    fn on_scale(&mut self, report: &ScaleReport<'_>) {
        let _ = report;
    }

    /// Called once when the search completes without error.
    fn on_finish(&mut self, outcome: &MatchOutcome) {
        let _ = outcome;
    }
}

/// Observer that ignores every callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ScaleObserver for NoopObserver {}

/// Observer that keeps every per-scale candidate, in scale order.
#[derive(Clone, Debug, Default)]
pub struct CandidateLog {
    candidates: Vec<MatchCandidate>,
}

impl CandidateLog {
    /// Candidates seen so far.
    pub fn candidates(&self) -> &[MatchCandidate] {
        &self.candidates
    }
}

impl ScaleObserver for CandidateLog {
    fn on_scale(&mut self, report: &ScaleReport<'_>) {
        self.candidates.push(report.candidate);
    }
}

/// Shared flag checked by the locator between scales.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; the search stops before its next scale.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
