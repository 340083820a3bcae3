//! Screenshot + OCR strategy.
//!
//! The expensive last resort before manual entry: rasterize the embed host
//! with `html2canvas`, run `tesseract.js` over the pixels, and scan the
//! recognized text for a score. Both libraries are loaded as page globals
//! by `index.html`; their absence makes the strategy `Unavailable` rather
//! than an error. Recognition takes seconds, so progress is streamed back
//! through the event callback, and a cancellation flag guards every await
//! point so a stopped session never hears from a stale run.
//!
//! Confidence matters here: the explicit "score was NN%" phrasing submits
//! automatically, while a bare percentage near the word "score" is handed
//! over as needs-confirmation and never auto-submits.

use std::cell::Cell;
use std::rc::Rc;

use common::score::candidate::{DetectionSource, RawScoreCandidate};
use common::score::scan::{self, OcrMatch};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsValue;

use super::{DetectionEvent, DetectionStrategy, StrategyContext, js_error_message};

#[wasm_bindgen]
extern "C" {
    /// `html2canvas(element, options)` — rasterizes an element subtree.
    #[wasm_bindgen(catch, js_name = html2canvas)]
    async fn html2canvas(element: &web_sys::Element, options: &JsValue)
        -> Result<JsValue, JsValue>;

    /// `Tesseract.recognize(image, lang, options)` — OCR over an image or
    /// canvas, reporting progress through `options.logger`.
    #[wasm_bindgen(catch, js_namespace = Tesseract, js_name = recognize)]
    async fn tesseract_recognize(
        image: &JsValue,
        lang: &str,
        options: &JsValue,
    ) -> Result<JsValue, JsValue>;
}

/// Whether the OCR capability can run at all in this page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrReadiness {
    /// Engine or capture library missing; permanently out for the session.
    Unavailable,
    /// A capture/recognition pass is in flight.
    Loading,
    Ready,
}

/// Probes the page globals the pipeline needs.
pub fn probe_support() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let window: JsValue = window.into();
    let has = |name: &str| {
        js_sys::Reflect::has(&window, &JsValue::from_str(name)).unwrap_or(false)
    };
    has("html2canvas") && has("Tesseract")
}

pub struct OcrStrategy {
    /// Set on stop; every await point in a running pass checks it.
    cancelled: Rc<Cell<bool>>,
}

impl OcrStrategy {
    pub fn new() -> Self {
        Self { cancelled: Rc::new(Cell::new(false)) }
    }
}

impl DetectionStrategy for OcrStrategy {
    fn source(&self) -> DetectionSource {
        DetectionSource::OcrScreenshot
    }

    fn automatic(&self) -> bool {
        false
    }

    fn start(&mut self, ctx: &StrategyContext) {
        if !probe_support() {
            ctx.events.emit(DetectionEvent::OcrUnavailable(
                "screenshot recognition libraries are not loaded".to_string(),
            ));
            return;
        }

        // Fresh flag per run so stopping an old pass cannot cancel a new one.
        self.cancelled = Rc::new(Cell::new(false));
        let cancelled = self.cancelled.clone();
        let events = ctx.events.clone();
        let host_id = ctx.host_id.clone();

        wasm_bindgen_futures::spawn_local(async move {
            run_pass(&host_id, &events, &cancelled).await;
        });
    }

    fn stop(&mut self) {
        self.cancelled.set(true);
    }
}

async fn run_pass(
    host_id: &str,
    events: &yew::Callback<DetectionEvent>,
    cancelled: &Rc<Cell<bool>>,
) {
    let Some(host) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(host_id))
    else {
        events.emit(DetectionEvent::OcrUnavailable("embed host not found".to_string()));
        return;
    };

    events.emit(DetectionEvent::OcrProgress(0));
    let canvas = match html2canvas(&host, &JsValue::UNDEFINED).await {
        Ok(canvas) => canvas,
        Err(err) => {
            events.emit(DetectionEvent::OcrUnavailable(format!(
                "screenshot capture failed: {}",
                js_error_message(&err)
            )));
            return;
        }
    };
    if cancelled.get() {
        return;
    }

    let options = js_sys::Object::new();
    let progress_events = events.clone();
    let progress_cancelled = cancelled.clone();
    let logger = Closure::wrap(Box::new(move |status: JsValue| {
        if progress_cancelled.get() {
            return;
        }
        let phase = js_sys::Reflect::get(&status, &JsValue::from_str("status"))
            .ok()
            .and_then(|v| v.as_string());
        let progress = js_sys::Reflect::get(&status, &JsValue::from_str("progress"))
            .ok()
            .and_then(|v| v.as_f64());
        if let (Some(phase), Some(progress)) = (phase, progress) {
            if phase == "recognizing text" {
                progress_events.emit(DetectionEvent::OcrProgress((progress * 100.0) as u8));
            }
        }
    }) as Box<dyn FnMut(JsValue)>);
    js_sys::Reflect::set(options.as_ref(), &JsValue::from_str("logger"), logger.as_ref()).ok();

    let result = tesseract_recognize(&canvas, "eng", options.as_ref()).await;
    drop(logger);
    if cancelled.get() {
        return;
    }

    match result {
        Ok(value) => {
            let text = recognized_text(&value);
            gloo_console::log!(format!("ocr: recognized {} characters", text.len()));
            match scan::scan_ocr_text(&text) {
                OcrMatch::Confident(raw) => {
                    events.emit(DetectionEvent::Candidate(RawScoreCandidate::confident(
                        raw,
                        DetectionSource::OcrScreenshot,
                    )));
                }
                OcrMatch::Ambiguous(raw) => {
                    events.emit(DetectionEvent::Candidate(RawScoreCandidate::tentative(
                        raw,
                        DetectionSource::OcrScreenshot,
                    )));
                }
                OcrMatch::NoMatch => {
                    events.emit(DetectionEvent::StrategyExhausted(
                        DetectionSource::OcrScreenshot,
                    ));
                }
            }
        }
        Err(err) => {
            events.emit(DetectionEvent::OcrUnavailable(format!(
                "text recognition failed: {}",
                js_error_message(&err)
            )));
        }
    }
}

fn recognized_text(result: &JsValue) -> String {
    js_sys::Reflect::get(result, &JsValue::from_str("data"))
        .and_then(|data| js_sys::Reflect::get(&data, &JsValue::from_str("text")))
        .ok()
        .and_then(|text| text.as_string())
        .unwrap_or_default()
}
