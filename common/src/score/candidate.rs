use serde::{Deserialize, Serialize};

/// The channel a score candidate came through. Serialized as the wire
/// `detection_method` of a score record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Cross-document message posted by the embedded exercise.
    Message,
    /// Same-origin DOM polling of the exercise iframe.
    DomScan,
    /// Query parameters of the iframe's navigable location.
    UrlScan,
    /// Screenshot capture plus text recognition, user-triggered.
    OcrScreenshot,
    /// Typed in by the user.
    Manual,
}

impl DetectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionSource::Message => "message",
            DetectionSource::DomScan => "dom_scan",
            DetectionSource::UrlScan => "url_scan",
            DetectionSource::OcrScreenshot => "ocr_screenshot",
            DetectionSource::Manual => "manual",
        }
    }

    /// Human label for status lines and toasts.
    pub fn label(&self) -> &'static str {
        match self {
            DetectionSource::Message => "exercise message",
            DetectionSource::DomScan => "page scan",
            DetectionSource::UrlScan => "address scan",
            DetectionSource::OcrScreenshot => "screenshot",
            DetectionSource::Manual => "manual entry",
        }
    }
}

/// How sure the producing strategy is about its candidate. Anything below
/// `High` must be confirmed by the user before it may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    NeedsConfirmation,
}

/// An unvalidated raw score string produced by a detection strategy,
/// e.g. `"85%"`. Validation happens in [`crate::score::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawScoreCandidate {
    pub text: String,
    pub source: DetectionSource,
    pub confidence: Confidence,
}

impl RawScoreCandidate {
    pub fn confident(text: impl Into<String>, source: DetectionSource) -> Self {
        Self {
            text: text.into(),
            source,
            confidence: Confidence::High,
        }
    }

    pub fn tentative(text: impl Into<String>, source: DetectionSource) -> Self {
        Self {
            text: text.into(),
            source,
            confidence: Confidence::NeedsConfirmation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_source_serializes_snake_case() {
        let json = serde_json::to_string(&DetectionSource::OcrScreenshot).unwrap();
        assert_eq!(json, r#""ocr_screenshot""#);
        let back: DetectionSource = serde_json::from_str(r#""dom_scan""#).unwrap();
        assert_eq!(back, DetectionSource::DomScan);
    }

    #[test]
    fn as_str_matches_wire_names() {
        for source in [
            DetectionSource::Message,
            DetectionSource::DomScan,
            DetectionSource::UrlScan,
            DetectionSource::OcrScreenshot,
            DetectionSource::Manual,
        ] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!(r#""{}""#, source.as_str()));
        }
    }
}
