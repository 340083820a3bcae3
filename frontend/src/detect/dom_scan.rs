//! DOM-scan strategy: poll the embedded frame's document for score text.
//!
//! Only works when the exercise happens to be same-origin; for the common
//! third-party-hosted case every poll hits `AccessDenied` and is skipped.
//! A prioritized selector list looks at score-ish class names first, then
//! falls back to generic text-bearing elements. The poll loop carries a
//! fixed budget and cancels itself once it is spent.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::score::candidate::{DetectionSource, RawScoreCandidate};
use common::score::scan;
use gloo_timers::callback::Interval;
use web_sys::Document;

use super::frame::{self, FrameAccess};
use super::{DetectionEvent, DetectionStrategy, StrategyContext};

/// Highest-signal selectors first; the generic tail is a last resort.
const SELECTORS: [&str; 4] = [
    "[class*='score']",
    "[class*='result']",
    "[class*='summary']",
    "h1, h2, h3, p, span, div",
];

pub struct DomScanStrategy {
    interval: Rc<RefCell<Option<Interval>>>,
}

impl DomScanStrategy {
    pub fn new() -> Self {
        Self { interval: Rc::new(RefCell::new(None)) }
    }
}

impl DetectionStrategy for DomScanStrategy {
    fn source(&self) -> DetectionSource {
        DetectionSource::DomScan
    }

    fn start(&mut self, ctx: &StrategyContext) {
        self.stop();

        let events = ctx.events.clone();
        let host_id = ctx.host_id.clone();
        let handle = self.interval.clone();
        let polls = Rc::new(Cell::new(0u32));
        let max_polls = (ctx.poll_budget_ms / ctx.poll_interval_ms.max(1)).max(1);

        let interval = Interval::new(ctx.poll_interval_ms, move || {
            let count = polls.get() + 1;
            polls.set(count);
            if count > max_polls {
                // Budget spent: drop our own timer and report exhaustion.
                handle.borrow_mut().take();
                events.emit(DetectionEvent::StrategyExhausted(DetectionSource::DomScan));
                return;
            }

            match frame::frame_document(&host_id) {
                Ok(document) => {
                    if let Some(text) = scan_document(&document) {
                        events.emit(DetectionEvent::Candidate(RawScoreCandidate::confident(
                            text,
                            DetectionSource::DomScan,
                        )));
                    }
                }
                // Cross-origin or not-yet-rendered frames: skip this poll.
                Err(FrameAccess::AccessDenied) | Err(FrameAccess::NoFrame) => {}
            }
        });
        *self.interval.borrow_mut() = Some(interval);
    }

    fn stop(&mut self) {
        self.interval.borrow_mut().take();
    }
}

fn scan_document(document: &Document) -> Option<String> {
    for selector in SELECTORS {
        let Ok(nodes) = document.query_selector_all(selector) else {
            continue;
        };
        for index in 0..nodes.length() {
            let Some(node) = nodes.get(index) else { continue };
            let Some(text) = node.text_content() else { continue };
            if let Some(pct) = scan::find_percentage(&text) {
                return Some(pct);
            }
        }
    }
    None
}
