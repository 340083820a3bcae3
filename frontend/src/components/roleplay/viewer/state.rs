//! Component state for the roleplay viewer.
//!
//! Holds the attempt session (the state machine enforcing the one-
//! submission guarantee), the strategy registry, and the assorted UI
//! state: manual entry, OCR progress, pending confirmations, status line.
//!
//! Fields are `pub` because they are accessed by the `view` and `update`
//! modules.

use common::model::exercise::ExerciseModel;
use common::score::candidate::RawScoreCandidate;
use common::score::session::AttemptSession;
use uuid::Uuid;

use super::props::ViewerProps;
use crate::detect::StrategyRegistry;
use crate::detect::ocr::OcrReadiness;

/// Tone of the viewer status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub tone: StatusTone,
    pub text: String,
}

pub struct RoleplayViewer {
    /// Lifecycle of this run. At most one per viewer instance; discarded
    /// on unmount — the persisted record lives in the external API.
    pub session: AttemptSession,

    /// The target exercise, once resolved from the models listing.
    pub model: Option<ExerciseModel>,

    /// Fatal load problem (unknown model, listing fetch failure).
    pub load_error: Option<String>,

    /// Detection strategies for this session. Built when monitoring
    /// starts; dropped (and therefore stopped) with the component.
    pub registry: Option<StrategyRegistry>,

    /// Unique DOM id of the element hosting the vendor embed markup, so
    /// strategies can find the iframe without touching anything else.
    pub host_id: String,

    /// Recorded attempts so far for (user, model), aggregator-supplied.
    /// `None` until the summary fetch lands.
    pub attempts_recorded: Option<u32>,

    pub manual_input: String,
    /// Inline validation message under the manual entry field.
    pub manual_error: Option<String>,

    pub status: Option<StatusLine>,

    /// A needs-confirmation candidate awaiting the user's decision.
    pub pending: Option<RawScoreCandidate>,

    /// OCR capability state. `Unavailable` is permanent for the session.
    pub ocr: OcrReadiness,
    /// OCR recognition progress while a pass is in flight.
    pub ocr_progress: Option<u8>,

    /// How many budget-bound pollers have given up.
    pub exhausted_pollers: usize,
    pub detection_timed_out: bool,

    /// Guard to avoid running first-render initialization more than once.
    pub loaded: bool,
}

impl RoleplayViewer {
    pub fn new(props: &ViewerProps) -> Self {
        Self {
            session: AttemptSession::new(props.email.clone(), props.model_id, js_sys::Date::now()),
            model: None,
            load_error: None,
            registry: None,
            host_id: format!("embed-host-{}", Uuid::new_v4().simple()),
            attempts_recorded: None,
            manual_input: String::new(),
            manual_error: None,
            status: None,
            pending: None,
            ocr: OcrReadiness::Ready,
            ocr_progress: None,
            exhausted_pollers: 0,
            detection_timed_out: false,
            loaded: false,
        }
    }

    pub fn set_status(&mut self, tone: StatusTone, text: impl Into<String>) {
        self.status = Some(StatusLine { tone, text: text.into() });
    }

    /// Stops every strategy. Idempotent; called on first accepted
    /// candidate, on recording, and from the destroy hook.
    pub fn stop_detection(&mut self) {
        if let Some(registry) = self.registry.as_mut() {
            registry.stop_all();
        }
    }
}
