//! URL-scan strategy: poll the frame's navigable location for score
//! query parameters.
//!
//! Some exercises redirect to a results page carrying `score=`/`result=`/
//! `percentage=` parameters. Reading a cross-origin frame's location
//! throws, which the frame accessor converts to `AccessDenied`; every
//! such poll is skipped. Same budget discipline as the DOM scan.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::score::candidate::{DetectionSource, RawScoreCandidate};
use common::score::scan;
use gloo_timers::callback::Interval;

use super::frame;
use super::{DetectionEvent, DetectionStrategy, StrategyContext};

pub struct UrlScanStrategy {
    interval: Rc<RefCell<Option<Interval>>>,
}

impl UrlScanStrategy {
    pub fn new() -> Self {
        Self { interval: Rc::new(RefCell::new(None)) }
    }
}

impl DetectionStrategy for UrlScanStrategy {
    fn source(&self) -> DetectionSource {
        DetectionSource::UrlScan
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
                handle.borrow_mut().take();
                events.emit(DetectionEvent::StrategyExhausted(DetectionSource::UrlScan));
                return;
            }

            let Ok(href) = frame::frame_location_href(&host_id) else {
                return;
            };
            let Some((_, query)) = href.split_once('?') else {
                return;
            };
            if let Some(value) = scan::score_from_query(query) {
                events.emit(DetectionEvent::Candidate(RawScoreCandidate::confident(
                    value,
                    DetectionSource::UrlScan,
                )));
            }
        });
        *self.interval.borrow_mut() = Some(interval);
    }

    fn stop(&mut self) {
        self.interval.borrow_mut().take();
    }
}
