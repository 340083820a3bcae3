//! Manual entry: the one strategy guaranteed to produce a result.
//!
//! There is nothing to watch — the user types the score. The unit exists
//! so manual entry sits in the same registry as every other channel; its
//! lifecycle hooks are no-ops.

use common::score::candidate::{DetectionSource, RawScoreCandidate};
use common::score::normalize;

use super::{DetectionStrategy, StrategyContext};

pub struct ManualEntryStrategy;

impl DetectionStrategy for ManualEntryStrategy {
    fn source(&self) -> DetectionSource {
        DetectionSource::Manual
    }

    fn automatic(&self) -> bool {
        false
    }

    fn start(&mut self, _ctx: &StrategyContext) {}

    fn stop(&mut self) {}
}

/// Builds the candidate for a typed score, appending `%` when absent.
/// Validation still goes through the normalizer at the call site.
pub fn candidate(input: &str) -> RawScoreCandidate {
    RawScoreCandidate::confident(normalize::percentify(input), DetectionSource::Manual)
}
