use serde::{Deserialize, Serialize};

/// One embeddable third-party roleplay exercise.
///
/// `embed_markup` is opaque HTML controlled by the exercise vendor. It is
/// rendered verbatim into the viewer host element and never parsed or
/// trusted beyond that. The score for a run is extracted from the outside
/// (message channel, DOM/URL scanning, OCR, or manual entry), not from
/// this markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseModel {
    pub id: u32,
    pub name: String,
    /// Vendor-controlled iframe/embed HTML. Opaque.
    #[serde(alias = "iframe_code")]
    pub embed_markup: String,
    /// Owning category.
    #[serde(alias = "category")]
    pub category_id: u32,
    /// Minimum score (0-100) a run must reach before the structured
    /// feedback form unlocks for that attempt.
    #[serde(default = "default_min_score")]
    pub min_score_to_pass: u8,
    /// Number of recorded attempts (any score) required before the model
    /// counts as complete for the user.
    #[serde(default = "default_min_attempts")]
    pub min_attempts_required: u32,
}

fn default_min_score() -> u8 {
    70
}

fn default_min_attempts() -> u32 {
    1
}
