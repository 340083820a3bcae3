//! Pattern scanning over untrusted payloads.
//!
//! The embedded exercise offers no API contract, so every channel — posted
//! messages, scraped DOM text, URL query strings, OCR output — is scanned
//! with the same narrow rules: a percentage pattern, a fixed list of
//! recognized key names, and one explicit envelope shape. Each scanner
//! returns an explicit no-match variant instead of a bare `None`-like
//! sentinel buried in calling code.

use regex::Regex;
use serde_json::Value;

/// Message envelope the cooperative embed contract uses.
pub const SCORE_ENVELOPE_TYPE: &str = "ROLEPLAY_SCORE";

/// Recognized score-bearing keys, in precedence order. An earlier key
/// anywhere in the payload beats a later key at any depth.
pub const SCORE_KEYS: [&str; 5] = ["score", "result", "percentage", "finalScore", "userScore"];

/// Query parameters the URL scan recognizes.
pub const SCORE_PARAMS: [&str; 3] = ["score", "result", "percentage"];

/// Outcome of inspecting one inbound cross-document message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageMatch {
    /// Explicit `{type: "ROLEPLAY_SCORE", score}` envelope.
    Envelope(String),
    /// A recognized key found by structural scan of the payload.
    KeyMatch { key: &'static str, value: String },
    /// Plain-text payload containing a percentage.
    Text(String),
    NoMatch,
}

/// Outcome of scanning recognized OCR text.
#[derive(Debug, Clone, PartialEq)]
pub enum OcrMatch {
    /// Matched the explicit "score was NN%" phrasing.
    Confident(String),
    /// A bare percentage near the word "score" — needs user confirmation.
    Ambiguous(String),
    NoMatch,
}

/// Finds the first percentage in free text and returns it as `"NN%"`.
pub fn find_percentage(text: &str) -> Option<String> {
    let re = Regex::new(r"(\d{1,3})\s*%").unwrap();
    re.captures(text).map(|caps| format!("{}%", &caps[1]))
}

/// Inspects a message payload for a score, in documented precedence:
/// explicit envelope, then the recognized key list, then a plain-text
/// percentage. Payloads that fit none of these are `NoMatch` — absence of
/// cooperation from the embed is the expected case, not an error.
pub fn inspect_message(payload: &Value) -> MessageMatch {
    if let Value::Object(map) = payload {
        if map.get("type").and_then(Value::as_str) == Some(SCORE_ENVELOPE_TYPE) {
            if let Some(score) = map.get("score").and_then(render_scalar) {
                return MessageMatch::Envelope(score);
            }
        }
    }

    match payload {
        Value::Object(_) | Value::Array(_) => {
            for key in SCORE_KEYS {
                if let Some(value) = find_key(payload, key).and_then(render_scalar) {
                    return MessageMatch::KeyMatch { key, value };
                }
            }
            MessageMatch::NoMatch
        }
        Value::String(text) => match find_percentage(text) {
            Some(pct) => MessageMatch::Text(pct),
            None => MessageMatch::NoMatch,
        },
        _ => MessageMatch::NoMatch,
    }
}

/// Depth-first search for `key` anywhere in the payload.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            if let Some(found) = map.get(key) {
                return Some(found);
            }
            map.values().find_map(|v| find_key(v, key))
        }
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// Renders a scalar score value as candidate text. Strings holding a
/// percentage are reduced to it; other strings pass through trimmed for
/// the normalizer to judge. Composite values are not scores.
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_u64() {
                Some(i.to_string())
            } else {
                Some(n.to_string())
            }
        }
        Value::String(s) => match find_percentage(s) {
            Some(pct) => Some(pct),
            None => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        },
        _ => None,
    }
}

/// Extracts a score from a raw URL query string (with or without the
/// leading `?`), checking `score`, `result`, `percentage` in that order.
pub fn score_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    for wanted in SCORE_PARAMS {
        for pair in query.split('&') {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("");
            if key == wanted && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Scans recognized OCR text for a score. The explicit "score was NN%"
/// phrasing is a confident match; a bare percentage within a short window
/// of the word "score" is ambiguous and must be confirmed by the user.
pub fn scan_ocr_text(text: &str) -> OcrMatch {
    let confident = Regex::new(r"(?i)score\s+was\s+(\d{1,3})\s*%").unwrap();
    if let Some(caps) = confident.captures(text) {
        return OcrMatch::Confident(format!("{}%", &caps[1]));
    }

    let lowered = text.to_lowercase();
    let pct = Regex::new(r"(\d{1,3})\s*%").unwrap();
    for caps in pct.captures_iter(&lowered) {
        let m = caps.get(0).unwrap();
        let window_start = m.start().saturating_sub(OCR_ADJACENCY_WINDOW);
        let window_end = (m.end() + OCR_ADJACENCY_WINDOW).min(lowered.len());
        // Byte-windowed search; the window may split multibyte characters,
        // which a substring slice would reject.
        let window = &lowered.as_bytes()[window_start..window_end];
        if window.windows(5).any(|w| w == b"score") {
            return OcrMatch::Ambiguous(format!("{}%", &caps[1]));
        }
    }
    OcrMatch::NoMatch
}

/// How close (in bytes) a percentage must sit to the word "score" before
/// an OCR read is offered as an ambiguous candidate.
const OCR_ADJACENCY_WINDOW: usize = 48;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_beats_everything() {
        let payload = json!({"type": "ROLEPLAY_SCORE", "score": "85%", "result": "12%"});
        assert_eq!(inspect_message(&payload), MessageMatch::Envelope("85%".into()));
    }

    #[test]
    fn envelope_with_numeric_score() {
        let payload = json!({"type": "ROLEPLAY_SCORE", "score": 92});
        assert_eq!(inspect_message(&payload), MessageMatch::Envelope("92".into()));
    }

    #[test]
    fn key_precedence_is_by_list_not_depth() {
        // "score" nested deep still beats "result" at the top level.
        let payload = json!({"result": "40%", "data": {"inner": {"score": 85}}});
        assert_eq!(
            inspect_message(&payload),
            MessageMatch::KeyMatch { key: "score", value: "85".into() }
        );
    }

    #[test]
    fn later_keys_match_when_earlier_absent() {
        let payload = json!({"summary": {"finalScore": "77%"}});
        assert_eq!(
            inspect_message(&payload),
            MessageMatch::KeyMatch { key: "finalScore", value: "77%".into() }
        );
    }

    #[test]
    fn plain_text_percentage() {
        let payload = json!("you reached 64% on this run");
        assert_eq!(inspect_message(&payload), MessageMatch::Text("64%".into()));
    }

    #[test]
    fn uncooperative_payloads_are_no_match() {
        for payload in [json!({"hello": "world"}), json!("all done!"), json!(true), json!(null)] {
            assert_eq!(inspect_message(&payload), MessageMatch::NoMatch, "payload {payload}");
        }
    }

    #[test]
    fn string_score_value_reduced_to_percentage() {
        let payload = json!({"score": "Your score was 85% today"});
        assert_eq!(
            inspect_message(&payload),
            MessageMatch::KeyMatch { key: "score", value: "85%".into() }
        );
    }

    #[test]
    fn query_extraction_order() {
        assert_eq!(score_from_query("?result=60&score=85"), Some("85".into()));
        assert_eq!(score_from_query("percentage=44"), Some("44".into()));
        assert_eq!(score_from_query("?foo=bar&result="), None);
        assert_eq!(score_from_query(""), None);
    }

    #[test]
    fn ocr_confident_phrase() {
        assert_eq!(
            scan_ocr_text("...\nYour score was 92%. Well done."),
            OcrMatch::Confident("92%".into())
        );
        assert_eq!(
            scan_ocr_text("SCORE WAS 70 %"),
            OcrMatch::Confident("70%".into())
        );
    }

    #[test]
    fn ocr_bare_percentage_near_score_is_ambiguous() {
        assert_eq!(
            scan_ocr_text("Final score: 81%"),
            OcrMatch::Ambiguous("81%".into())
        );
    }

    #[test]
    fn ocr_unrelated_percentage_is_no_match() {
        // A percentage far from any "score" wording must not be offered.
        let text = format!("battery at 45% remaining {} nothing else here", " pad ".repeat(20));
        assert_eq!(scan_ocr_text(&text), OcrMatch::NoMatch);
        assert_eq!(scan_ocr_text("no numbers at all"), OcrMatch::NoMatch);
    }

    #[test]
    fn find_percentage_first_match() {
        assert_eq!(find_percentage("87 % and 12%"), Some("87%".into()));
        assert_eq!(find_percentage("no percent"), None);
    }
}
