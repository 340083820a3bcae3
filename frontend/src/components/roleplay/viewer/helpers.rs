//! Small presentation helpers for the viewer.

use common::model::exercise::ExerciseModel;
use common::score::gate;

/// Renders the attempt-requirement line from aggregator-supplied counts.
/// Completion is purely `recorded >= required`; score values never factor
/// into it.
pub fn attempts_line(model: &ExerciseModel, attempts: Option<u32>) -> String {
    let required = model.min_attempts_required;
    match attempts {
        Some(recorded) if gate::requirement_met(recorded, model) => {
            format!("Complete — {recorded} of {required} required attempts recorded.")
        }
        Some(recorded) => {
            let remaining = gate::attempts_remaining(recorded, model);
            format!(
                "{recorded} of {required} required attempts recorded — {remaining} to go."
            )
        }
        None => {
            if required == 1 {
                "1 attempt required.".to_string()
            } else {
                format!("{required} attempts required.")
            }
        }
    }
}
