use common::model::exercise::ExerciseModel;

use crate::detect::DetectionEvent;

pub enum Msg {
    ModelsLoaded(Result<Vec<ExerciseModel>, String>),
    /// Prior recorded attempts for this (user, model), aggregator-supplied.
    AttemptsLoaded(u32),
    /// Anything a detection strategy reported.
    Detection(DetectionEvent),
    ManualInput(String),
    SubmitManual,
    /// User confirmed a needs-confirmation candidate.
    ConfirmPending,
    DismissPending,
    TriggerOcr,
    SubmissionDone(Result<(), String>),
}
