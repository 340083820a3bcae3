//! Score detection strategies.
//!
//! The embedded exercise is an opaque, usually cross-origin artifact with
//! no guaranteed API, so no single channel is reliable. Each strategy here
//! watches one channel — posted messages, the frame's DOM, its URL, a
//! screenshot, the user's keyboard — behind one uniform lifecycle, and the
//! registry owns starting and stopping all of them. Access failures are
//! steady state, not errors: a strategy that cannot see anything simply
//! reports nothing.
//!
//! Cancellation is structural. Poll timers are `gloo_timers` handles whose
//! `Drop` clears the underlying browser timer, the message listener is
//! removed on `stop`, and in-flight OCR work checks a cancellation flag, so
//! `StrategyRegistry::stop_all` (also run on registry drop) leaves nothing
//! behind after the viewer unmounts.

use common::score::candidate::{DetectionSource, RawScoreCandidate};
use yew::Callback;

pub mod dom_scan;
pub mod frame;
pub mod manual;
pub mod message_channel;
pub mod ocr;
pub mod url_scan;

pub use dom_scan::DomScanStrategy;
pub use manual::ManualEntryStrategy;
pub use message_channel::MessageChannelStrategy;
pub use ocr::OcrStrategy;
pub use url_scan::UrlScanStrategy;

/// Everything a strategy may report back to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionEvent {
    /// A raw score candidate. The viewer normalizes and arbitrates; losing
    /// candidates after the session leaves `Monitoring` are discarded there.
    Candidate(RawScoreCandidate),
    /// OCR recognition progress, 0-100.
    OcrProgress(u8),
    /// The OCR pipeline cannot run (missing engine, capture failure). The
    /// strategy is out for the rest of the session.
    OcrUnavailable(String),
    /// The strategy gave up: a poller ran out its budget, or an OCR pass
    /// found no score in the screenshot.
    StrategyExhausted(DetectionSource),
}

/// Shared handles passed to every strategy on start.
#[derive(Clone)]
pub struct StrategyContext {
    /// DOM id of the element hosting the vendor embed markup.
    pub host_id: String,
    pub events: Callback<DetectionEvent>,
    pub poll_interval_ms: u32,
    /// Total polling budget; pollers cancel themselves once it is spent.
    pub poll_budget_ms: u32,
}

/// One independent way of extracting a score from the embedded exercise.
///
/// `start` must be non-blocking and tolerant of every permission failure;
/// `stop` must leave no timer, listener, or in-flight callback able to
/// fire afterwards. Both are idempotent.
pub trait DetectionStrategy {
    fn source(&self) -> DetectionSource;

    /// Automatic strategies are started with the monitoring set; the rest
    /// (OCR, manual entry) run only when the user asks.
    fn automatic(&self) -> bool {
        true
    }

    fn start(&mut self, ctx: &StrategyContext);

    fn stop(&mut self);
}

/// Which strategies run, and how the pollers pace themselves. The enabled
/// list is ordered by precedence; deployments can trim it without touching
/// the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    pub enabled: Vec<DetectionSource>,
    pub poll_interval_ms: u32,
    pub poll_budget_ms: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enabled: vec![
                DetectionSource::Message,
                DetectionSource::DomScan,
                DetectionSource::UrlScan,
                DetectionSource::OcrScreenshot,
                DetectionSource::Manual,
            ],
            poll_interval_ms: 2_500,
            poll_budget_ms: 5 * 60 * 1_000,
        }
    }
}

/// Owns the strategy set for one attempt session.
pub struct StrategyRegistry {
    ctx: StrategyContext,
    strategies: Vec<Box<dyn DetectionStrategy>>,
}

impl StrategyRegistry {
    pub fn new(
        config: DetectionConfig,
        host_id: String,
        events: Callback<DetectionEvent>,
    ) -> Self {
        let ctx = StrategyContext {
            host_id,
            events,
            poll_interval_ms: config.poll_interval_ms,
            poll_budget_ms: config.poll_budget_ms,
        };
        let strategies = config
            .enabled
            .iter()
            .map(|source| build(*source))
            .collect();
        Self { ctx, strategies }
    }

    /// Starts every automatic strategy. Called once monitoring begins.
    pub fn start_automatic(&mut self) {
        let ctx = self.ctx.clone();
        for strategy in &mut self.strategies {
            if strategy.automatic() {
                gloo_console::log!(format!("detection: starting {}", strategy.source().as_str()));
                strategy.start(&ctx);
            }
        }
    }

    /// Starts (or restarts) one user-triggered strategy.
    pub fn trigger(&mut self, source: DetectionSource) {
        let ctx = self.ctx.clone();
        for strategy in &mut self.strategies {
            if strategy.source() == source {
                strategy.stop();
                gloo_console::log!(format!("detection: triggering {}", source.as_str()));
                strategy.start(&ctx);
            }
        }
    }

    /// Stops everything. Safe to call repeatedly; also runs on drop.
    pub fn stop_all(&mut self) {
        for strategy in &mut self.strategies {
            strategy.stop();
        }
    }

    /// Number of enabled budget-bound pollers; the viewer uses it to tell
    /// when automatic detection as a whole has timed out.
    pub fn poller_count(&self) -> usize {
        self.strategies
            .iter()
            .filter(|s| {
                matches!(s.source(), DetectionSource::DomScan | DetectionSource::UrlScan)
            })
            .count()
    }

    pub fn has(&self, source: DetectionSource) -> bool {
        self.strategies.iter().any(|s| s.source() == source)
    }
}

impl Drop for StrategyRegistry {
    fn drop(&mut self) {
        self.stop_all();
    }
}

fn build(source: DetectionSource) -> Box<dyn DetectionStrategy> {
    match source {
        DetectionSource::Message => Box::new(MessageChannelStrategy::new()),
        DetectionSource::DomScan => Box::new(DomScanStrategy::new()),
        DetectionSource::UrlScan => Box::new(UrlScanStrategy::new()),
        DetectionSource::OcrScreenshot => Box::new(OcrStrategy::new()),
        DetectionSource::Manual => Box::new(ManualEntryStrategy),
    }
}

/// Renders a thrown JS value as a log-friendly string.
pub fn js_error_message(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &wasm_bindgen::JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "unknown error".to_string())
}
