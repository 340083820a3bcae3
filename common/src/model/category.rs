use serde::{Deserialize, Serialize};

use crate::model::exercise::ExerciseModel;

/// Named grouping of exercise models, assignable to users. Default
/// categories are auto-assigned to every user by the backend.
///
/// The models list is fetched once per session and treated as immutable
/// for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub models: Vec<ExerciseModel>,
}
