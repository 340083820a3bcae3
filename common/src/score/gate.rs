//! Pass/attempt policy applied before a score counts for anything.
//!
//! Two independent thresholds hang off each exercise model:
//! `min_score_to_pass` gates the structured-feedback action for an attempt,
//! and `min_attempts_required` decides when the model counts as complete.
//! Recording a below-threshold attempt is always allowed — low scores still
//! accumulate toward the attempt requirement. Attempt counts come from the
//! reporting aggregator, never from viewer-local state.

use serde::{Deserialize, Serialize};

use crate::model::exercise::ExerciseModel;

/// What the caller wants the score to qualify for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePurpose {
    /// Persisting the score as an attempt record.
    RecordAttempt,
    /// Submitting structured feedback tied to the attempt.
    SubmitFeedback,
}

/// Why the gate refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateRefusal {
    BelowPassThreshold { score: u8, required: u8 },
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub accepted: bool,
    pub refusal: Option<GateRefusal>,
}

impl GateDecision {
    fn accept() -> Self {
        Self { accepted: true, refusal: None }
    }

    fn refuse(refusal: GateRefusal) -> Self {
        Self { accepted: false, refusal: Some(refusal) }
    }
}

/// Applies the pass policy for `purpose`. Attempt recording is always
/// accepted; feedback submission requires the score to reach the model's
/// pass threshold.
pub fn evaluate(score: u8, model: &ExerciseModel, purpose: GatePurpose) -> GateDecision {
    match purpose {
        GatePurpose::RecordAttempt => GateDecision::accept(),
        GatePurpose::SubmitFeedback => {
            if score < model.min_score_to_pass {
                GateDecision::refuse(GateRefusal::BelowPassThreshold {
                    score,
                    required: model.min_score_to_pass,
                })
            } else {
                GateDecision::accept()
            }
        }
    }
}

/// Whether the cumulative recorded attempts (aggregator-supplied) satisfy
/// the model's minimum-attempts requirement. Score values are irrelevant.
pub fn requirement_met(recorded_attempts: u32, model: &ExerciseModel) -> bool {
    recorded_attempts >= model.min_attempts_required
}

/// Attempts still owed before the model counts as complete.
pub fn attempts_remaining(recorded_attempts: u32, model: &ExerciseModel) -> u32 {
    model.min_attempts_required.saturating_sub(recorded_attempts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(min_score_to_pass: u8, min_attempts_required: u32) -> ExerciseModel {
        ExerciseModel {
            id: 1,
            name: "Objection handling".into(),
            embed_markup: "<iframe src=\"https://vendor.example/run/1\"></iframe>".into(),
            category_id: 3,
            min_score_to_pass,
            min_attempts_required,
        }
    }

    #[test]
    fn below_threshold_still_records_but_blocks_feedback() {
        let m = model(70, 1);
        let record = evaluate(65, &m, GatePurpose::RecordAttempt);
        assert!(record.accepted);
        assert!(record.refusal.is_none());

        let feedback = evaluate(65, &m, GatePurpose::SubmitFeedback);
        assert!(!feedback.accepted);
        assert_eq!(
            feedback.refusal,
            Some(GateRefusal::BelowPassThreshold { score: 65, required: 70 })
        );
    }

    #[test]
    fn at_threshold_unlocks_feedback() {
        let m = model(70, 1);
        assert!(evaluate(70, &m, GatePurpose::SubmitFeedback).accepted);
        assert!(evaluate(92, &m, GatePurpose::SubmitFeedback).accepted);
    }

    #[test]
    fn attempt_requirement_ignores_scores() {
        let m = model(70, 3);
        assert!(!requirement_met(2, &m));
        assert!(requirement_met(3, &m));
        assert!(requirement_met(4, &m));
        assert_eq!(attempts_remaining(2, &m), 1);
        assert_eq!(attempts_remaining(5, &m), 0);
    }
}
