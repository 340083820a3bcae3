//! Capability-checked access to the embedded exercise frame.
//!
//! The iframe belongs to the third-party exercise and is usually hosted
//! cross-origin, where the browser blocks document and location reads.
//! That is the expected steady state. The try/catch lives here, behind
//! accessors returning `Result`, so calling code never branches on
//! exceptions — and nothing in this module ever writes into the frame.

use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlIFrameElement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameAccess {
    /// No iframe under the host element (embed markup may not carry one).
    NoFrame,
    /// Cross-origin access blocked. Recovered by skipping this poll.
    AccessDenied,
}

/// Finds the first iframe inside the embed host element.
pub fn frame_element(host_id: &str) -> Result<HtmlIFrameElement, FrameAccess> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(FrameAccess::NoFrame)?;
    let selector = format!("#{host_id} iframe");
    document
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlIFrameElement>().ok())
        .ok_or(FrameAccess::NoFrame)
}

/// The frame's document, when same-origin access is allowed.
pub fn frame_document(host_id: &str) -> Result<Document, FrameAccess> {
    let frame = frame_element(host_id)?;
    // contentDocument is null for cross-origin frames.
    frame.content_document().ok_or(FrameAccess::AccessDenied)
}

/// The frame's current location href, when readable. Cross-origin frames
/// throw on this read; `Reflect` turns the throw into an `Err`.
pub fn frame_location_href(host_id: &str) -> Result<String, FrameAccess> {
    let frame = frame_element(host_id)?;
    let window: JsValue = frame.content_window().ok_or(FrameAccess::AccessDenied)?.into();
    let location = js_sys::Reflect::get(&window, &JsValue::from_str("location"))
        .map_err(|_| FrameAccess::AccessDenied)?;
    let href = js_sys::Reflect::get(&location, &JsValue::from_str("href"))
        .map_err(|_| FrameAccess::AccessDenied)?;
    href.as_string().ok_or(FrameAccess::AccessDenied)
}

use wasm_bindgen::JsCast;
