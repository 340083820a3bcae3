//! The score-acquisition core.
//!
//! Everything here is pure: no browser types, no timers, no HTTP. The
//! frontend's detection strategies feed raw candidate strings through
//! [`normalize`], the viewer drives the [`session`] state machine with the
//! results, and [`gate`] applies the pass/attempt policy before anything is
//! shown as unlocked. Keeping this layer free of `web-sys` means the whole
//! policy surface runs under plain `cargo test`.

pub mod candidate;
pub mod gate;
pub mod normalize;
pub mod scan;
pub mod session;

pub use candidate::{Confidence, DetectionSource, RawScoreCandidate};
pub use normalize::{NormalizeError, normalize};
pub use session::{AttemptSession, SessionError, SessionState};

#[cfg(test)]
mod tests {
    use super::gate::{self, GatePurpose};
    use super::scan::{self, OcrMatch};
    use super::*;
    use crate::model::exercise::ExerciseModel;
    use crate::requests::SubmitScoreRequest;

    fn model() -> ExerciseModel {
        ExerciseModel {
            id: 7,
            name: "Discovery call".into(),
            embed_markup: "<iframe src=\"https://vendor.example/run/7\"></iframe>".into(),
            category_id: 1,
            min_score_to_pass: 70,
            min_attempts_required: 2,
        }
    }

    #[test]
    fn ocr_text_flows_to_a_submittable_record() {
        let text = "...session complete. Your score was 92% overall...";
        let OcrMatch::Confident(raw) = scan::scan_ocr_text(text) else {
            panic!("expected a confident match");
        };
        let score = normalize(&raw).unwrap();
        assert_eq!(score, 92);
        assert!(gate::evaluate(score, &model(), GatePurpose::SubmitFeedback).accepted);

        let mut session = AttemptSession::new("ana@example.com", 7, 0.0);
        session.begin_monitoring().unwrap();
        session
            .accept_candidate(raw.clone(), score, DetectionSource::OcrScreenshot)
            .unwrap();
        session.begin_submitting().unwrap();

        let request = SubmitScoreRequest {
            email: session.user_email.clone(),
            model_id: session.model_id,
            score,
            raw_score: raw,
            detection_method: session.detection_source.unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["score"], 92);
        assert_eq!(json["raw_score"], "92%");
        assert_eq!(json["detection_method"], "ocr_screenshot");
    }

    #[test]
    fn manual_entry_flows_with_percent_appended() {
        let raw = normalize::percentify("85");
        assert_eq!(raw, "85%");
        let score = normalize(&raw).unwrap();

        let mut session = AttemptSession::new("ana@example.com", 7, 0.0);
        session.begin_monitoring().unwrap();
        session.manual_entry(raw.clone(), score).unwrap();
        session.record_success().unwrap();

        let request = SubmitScoreRequest {
            email: session.user_email.clone(),
            model_id: session.model_id,
            score,
            raw_score: raw,
            detection_method: session.detection_source.unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["score"], 85);
        assert_eq!(json["detection_method"], "manual");
    }
}
