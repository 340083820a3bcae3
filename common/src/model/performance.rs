//! Read-only performance rollups produced by the reporting aggregator.
//!
//! Everything in this module is server-authoritative: the portal and the
//! admin dashboard render these structures verbatim and compute none of
//! the statistics locally. Attempt counts in particular are the source of
//! truth for the minimum-attempts policy; a viewer instance never
//! reconstructs them from its own session history.

use serde::{Deserialize, Serialize};

use crate::model::user::PortalUser;

/// Per-user aggregate across every category and model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub highest_score: u8,
    #[serde(default)]
    pub lowest_score: u8,
    /// Total recorded attempts.
    #[serde(default)]
    pub total_scores: u32,
    #[serde(default)]
    pub total_feedbacks: u32,
}

/// One persisted attempt, with the structured feedback captured for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub score: u8,
    pub submitted_at: String,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub improvements: Option<String>,
}

/// Per-model rollup within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    pub model_id: u32,
    pub model_name: String,
    #[serde(default)]
    pub attempts_count: u32,
    #[serde(default)]
    pub latest_score: Option<u8>,
    #[serde(default)]
    pub highest_score: Option<u8>,
    #[serde(default)]
    pub min_score_to_pass: Option<u8>,
    #[serde(default)]
    pub min_attempts_required: Option<u32>,
    #[serde(default)]
    pub last_attempt: Option<String>,
    #[serde(default)]
    pub models_attempt_history: Vec<AttemptRecord>,
}

/// Per-category rollup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category_id: u32,
    pub category_name: String,
    #[serde(default)]
    pub attempts_count: u32,
    #[serde(default)]
    pub models_count: u32,
    #[serde(default)]
    pub models_attempted: u32,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub highest_score: u8,
    #[serde(default)]
    pub lowest_score: u8,
    #[serde(default)]
    pub last_attempt: Option<String>,
    #[serde(default)]
    pub models: Vec<ModelStats>,
}

/// Most recent attempt across all models, shown on the dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentRoleplay {
    pub model_name: String,
    pub category_name: String,
    pub timestamp: String,
    pub score: u8,
    #[serde(default)]
    pub raw_score: Option<String>,
}

/// Full per-user summary returned by the user-performance endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    #[serde(default)]
    pub user: Option<PortalUser>,
    #[serde(default)]
    pub overall_stats: OverallStats,
    #[serde(default)]
    pub category_stats: Vec<CategoryStats>,
    #[serde(default)]
    pub recent_roleplay: Option<RecentRoleplay>,
}

impl PerformanceSummary {
    /// Recorded attempts for one model, across every category. Used by the
    /// viewer to seed the minimum-attempts progress display.
    pub fn attempts_for_model(&self, model_id: u32) -> u32 {
        self.category_stats
            .iter()
            .flat_map(|c| c.models.iter())
            .filter(|m| m.model_id == model_id)
            .map(|m| m.attempts_count)
            .sum()
    }
}

/// Location-wide aggregate shown at the top of the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationStats {
    #[serde(default)]
    pub total_users: u32,
    #[serde(default)]
    pub average_score_all_users: f64,
    #[serde(default)]
    pub total_feedbacks: u32,
    #[serde(default)]
    pub average_completion_rate: f64,
}

/// One user's block inside the all-users report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPerformance {
    pub user: PortalUser,
    #[serde(default)]
    pub overall_stats: OverallStats,
    #[serde(default)]
    pub category_stats: Vec<CategoryStats>,
}

/// Response of the admin all-users-performance endpoint for a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllUsersPerformance {
    #[serde(default)]
    pub location_stats: Option<LocationStats>,
    #[serde(default)]
    pub users: Vec<UserPerformance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_for_model_sums_across_categories() {
        let summary = PerformanceSummary {
            category_stats: vec![
                CategoryStats {
                    category_id: 1,
                    category_name: "Sales".into(),
                    models: vec![ModelStats {
                        model_id: 7,
                        model_name: "Cold call".into(),
                        attempts_count: 2,
                        latest_score: Some(80),
                        highest_score: Some(90),
                        min_score_to_pass: Some(70),
                        min_attempts_required: Some(3),
                        last_attempt: None,
                        models_attempt_history: vec![],
                    }],
                    ..Default::default()
                },
                CategoryStats {
                    category_id: 2,
                    category_name: "Retention".into(),
                    models: vec![ModelStats {
                        model_id: 7,
                        model_name: "Cold call".into(),
                        attempts_count: 1,
                        latest_score: None,
                        highest_score: None,
                        min_score_to_pass: None,
                        min_attempts_required: None,
                        last_attempt: None,
                        models_attempt_history: vec![],
                    }],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(summary.attempts_for_model(7), 3);
        assert_eq!(summary.attempts_for_model(99), 0);
    }

    #[test]
    fn summary_deserializes_with_missing_optional_blocks() {
        let json = r#"{
            "overall_stats": {"average_score": 72.5, "highest_score": 92, "total_scores": 4},
            "category_stats": []
        }"#;
        let summary: PerformanceSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.overall_stats.total_scores, 4);
        assert!(summary.recent_roleplay.is_none());
        assert!(summary.user.is_none());
    }
}
