//! Request payloads sent to the external roleplay API.

use serde::{Deserialize, Serialize};

use crate::score::candidate::DetectionSource;

/// Body of `POST /roleplay/scores/submit_score/` — the primary submission
/// path for a detected or manually entered score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitScoreRequest {
    pub email: String,
    pub model_id: u32,
    /// Canonical score, already normalized to 0-100.
    pub score: u8,
    /// The candidate text exactly as detected, e.g. `"85%"`.
    pub raw_score: String,
    pub detection_method: DetectionSource,
}

/// Body of `POST /roleplay/feedback/` — the structured-feedback path, also
/// used once as the fallback when the primary submission endpoint fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub email: String,
    pub score: u8,
    pub strengths: String,
    pub improvements: String,
    pub model: u32,
}
