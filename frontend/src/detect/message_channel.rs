//! Message-channel strategy: listen for scores the embedded exercise
//! volunteers through cross-document messaging.
//!
//! This is the only channel with zero permission risk — and the only one
//! that depends entirely on the embed cooperating. Recognized shapes are
//! the explicit `{type: "ROLEPLAY_SCORE", score}` envelope, a fixed list
//! of score-bearing keys anywhere in the payload, and plain text carrying
//! a percentage. Anything else is silently ignored; a cooperating embed
//! may never arrive and that is fine.

use common::score::candidate::{DetectionSource, RawScoreCandidate};
use common::score::scan::{self, MessageMatch};
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::MessageEvent;

use super::{DetectionEvent, DetectionStrategy, StrategyContext};

pub struct MessageChannelStrategy {
    listener: Option<Closure<dyn FnMut(MessageEvent)>>,
}

impl MessageChannelStrategy {
    pub fn new() -> Self {
        Self { listener: None }
    }
}

impl DetectionStrategy for MessageChannelStrategy {
    fn source(&self) -> DetectionSource {
        DetectionSource::Message
    }

    fn start(&mut self, ctx: &StrategyContext) {
        self.stop();

        let events = ctx.events.clone();
        let listener = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Some(candidate) = candidate_from_event(&event) {
                events.emit(DetectionEvent::Candidate(candidate));
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        if let Some(window) = web_sys::window() {
            window
                .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
                .ok();
        }
        self.listener = Some(listener);
    }

    fn stop(&mut self) {
        if let Some(listener) = self.listener.take() {
            if let Some(window) = web_sys::window() {
                window
                    .remove_event_listener_with_callback(
                        "message",
                        listener.as_ref().unchecked_ref(),
                    )
                    .ok();
            }
        }
    }
}

fn candidate_from_event(event: &MessageEvent) -> Option<RawScoreCandidate> {
    let payload = payload_value(event)?;
    match scan::inspect_message(&payload) {
        MessageMatch::Envelope(text) => {
            Some(RawScoreCandidate::confident(text, DetectionSource::Message))
        }
        MessageMatch::KeyMatch { key, value } => {
            gloo_console::log!(format!("message: matched key '{key}'"));
            Some(RawScoreCandidate::confident(value, DetectionSource::Message))
        }
        MessageMatch::Text(text) => {
            Some(RawScoreCandidate::confident(text, DetectionSource::Message))
        }
        MessageMatch::NoMatch => None,
    }
}

/// Converts the event payload into JSON for structural inspection.
/// Non-serializable payloads are treated as no match.
fn payload_value(event: &MessageEvent) -> Option<Value> {
    let data = event.data();
    if let Some(text) = data.as_string() {
        return Some(Value::String(text));
    }
    let json = js_sys::JSON::stringify(&data).ok()?;
    let json: String = json.into();
    serde_json::from_str(&json).ok()
}
