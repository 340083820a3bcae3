//! Lifecycle of one exercise run.
//!
//! The state machine is the structural enforcement of the submission
//! guarantees: candidates are only accepted while `Monitoring`, so the
//! first normalized candidate wins and anything a slower strategy produces
//! afterwards is discarded; once `Recorded`, nothing can trigger a second
//! submission. Invalid transitions are errors, not panics — racing
//! callbacks are expected and must be shrugged off.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::candidate::DetectionSource;

/// Exercise-run lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Viewer mounted, target model not yet resolved.
    Idle,
    /// Detection strategies are running.
    Monitoring,
    /// A normalizable candidate arrived; submission is about to start.
    CandidateFound,
    /// Score record in flight to the backend.
    Submitting,
    /// Backend accepted the record. Terminal.
    Recorded,
    /// Backend rejected or errored. Manual entry remains the way forward;
    /// automatic detection does not reopen.
    SubmissionFailed,
}

impl SessionState {
    /// Whether new detection candidates may still be taken.
    pub fn accepts_candidates(&self) -> bool {
        matches!(self, SessionState::Monitoring)
    }

    /// Terminal success: all strategy work must stop for good.
    pub fn is_recorded(&self) -> bool {
        matches!(self, SessionState::Recorded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {event} while {from:?}")]
    InvalidTransition { from: SessionState, event: &'static str },
}

/// One run of one exercise model by one user. Viewer-local; the
/// authoritative record lives in the external API once submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptSession {
    pub user_email: String,
    pub model_id: u32,
    /// Milliseconds since the epoch, supplied by the host environment.
    pub started_at: f64,
    pub state: SessionState,
    pub detected_raw_score: Option<String>,
    pub detected_numeric_score: Option<u8>,
    pub detection_source: Option<DetectionSource>,
    pub submitted: bool,
}

impl AttemptSession {
    pub fn new(user_email: impl Into<String>, model_id: u32, started_at: f64) -> Self {
        Self {
            user_email: user_email.into(),
            model_id,
            started_at,
            state: SessionState::Idle,
            detected_raw_score: None,
            detected_numeric_score: None,
            detection_source: None,
            submitted: false,
        }
    }

    pub fn elapsed_ms(&self, now: f64) -> f64 {
        (now - self.started_at).max(0.0)
    }

    /// Viewer mount completed and the target model is resolved.
    pub fn begin_monitoring(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Monitoring;
                Ok(())
            }
            from => Err(SessionError::InvalidTransition { from, event: "begin monitoring" }),
        }
    }

    /// A strategy produced a candidate that normalized cleanly. Only legal
    /// while `Monitoring`; late candidates from losing strategies land here
    /// and are rejected.
    pub fn accept_candidate(
        &mut self,
        raw: String,
        score: u8,
        source: DetectionSource,
    ) -> Result<(), SessionError> {
        match self.state {
            SessionState::Monitoring => {
                self.detected_raw_score = Some(raw);
                self.detected_numeric_score = Some(score);
                self.detection_source = Some(source);
                self.state = SessionState::CandidateFound;
                Ok(())
            }
            from => Err(SessionError::InvalidTransition { from, event: "accept candidate" }),
        }
    }

    /// High-confidence candidates submit immediately after acceptance.
    pub fn begin_submitting(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::CandidateFound => {
                self.state = SessionState::Submitting;
                Ok(())
            }
            from => Err(SessionError::InvalidTransition { from, event: "begin submitting" }),
        }
    }

    /// Manual entry fast-forwards straight to `Submitting` from any state
    /// except `Recorded`.
    pub fn manual_entry(&mut self, raw: String, score: u8) -> Result<(), SessionError> {
        match self.state {
            SessionState::Recorded => {
                Err(SessionError::InvalidTransition { from: self.state, event: "manual entry" })
            }
            _ => {
                self.detected_raw_score = Some(raw);
                self.detected_numeric_score = Some(score);
                self.detection_source = Some(DetectionSource::Manual);
                self.state = SessionState::Submitting;
                Ok(())
            }
        }
    }

    /// Backend accepted the score record.
    pub fn record_success(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Submitting => {
                self.state = SessionState::Recorded;
                self.submitted = true;
                Ok(())
            }
            from => Err(SessionError::InvalidTransition { from, event: "record success" }),
        }
    }

    /// Backend rejected or errored. Detection stays closed; the user may
    /// retry through manual entry only.
    pub fn record_failure(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Submitting => {
                self.state = SessionState::SubmissionFailed;
                Ok(())
            }
            from => Err(SessionError::InvalidTransition { from, event: "record failure" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitoring_session() -> AttemptSession {
        let mut session = AttemptSession::new("ana@example.com", 7, 1_000.0);
        session.begin_monitoring().unwrap();
        session
    }

    #[test]
    fn happy_path_reaches_recorded() {
        let mut session = monitoring_session();
        session
            .accept_candidate("85%".into(), 85, DetectionSource::Message)
            .unwrap();
        session.begin_submitting().unwrap();
        session.record_success().unwrap();

        assert_eq!(session.state, SessionState::Recorded);
        assert!(session.submitted);
        assert_eq!(session.detected_numeric_score, Some(85));
        assert_eq!(session.detection_source, Some(DetectionSource::Message));
    }

    #[test]
    fn first_candidate_wins() {
        let mut session = monitoring_session();
        session
            .accept_candidate("85%".into(), 85, DetectionSource::Message)
            .unwrap();

        // A racing strategy reports a moment later; it must be a no-op.
        let late = session.accept_candidate("60%".into(), 60, DetectionSource::DomScan);
        assert!(late.is_err());
        assert_eq!(session.detected_numeric_score, Some(85));
        assert_eq!(session.detection_source, Some(DetectionSource::Message));
    }

    #[test]
    fn recorded_is_terminal_for_every_event() {
        let mut session = monitoring_session();
        session
            .accept_candidate("85%".into(), 85, DetectionSource::UrlScan)
            .unwrap();
        session.begin_submitting().unwrap();
        session.record_success().unwrap();

        assert!(session.accept_candidate("90%".into(), 90, DetectionSource::Message).is_err());
        assert!(session.manual_entry("90%".into(), 90).is_err());
        assert!(session.record_failure().is_err());
        assert_eq!(session.state, SessionState::Recorded);
        assert!(session.submitted);
    }

    #[test]
    fn manual_entry_fast_forwards_from_monitoring() {
        let mut session = monitoring_session();
        session.manual_entry("85%".into(), 85).unwrap();
        assert_eq!(session.state, SessionState::Submitting);
        assert_eq!(session.detection_source, Some(DetectionSource::Manual));
    }

    #[test]
    fn manual_entry_retries_after_failed_submission() {
        let mut session = monitoring_session();
        session
            .accept_candidate("85%".into(), 85, DetectionSource::Message)
            .unwrap();
        session.begin_submitting().unwrap();
        session.record_failure().unwrap();
        assert_eq!(session.state, SessionState::SubmissionFailed);
        assert!(!session.state.accepts_candidates());

        session.manual_entry("88%".into(), 88).unwrap();
        session.record_success().unwrap();
        assert_eq!(session.state, SessionState::Recorded);
    }

    #[test]
    fn candidates_rejected_before_monitoring_starts() {
        let mut session = AttemptSession::new("ana@example.com", 7, 0.0);
        assert!(session.accept_candidate("85%".into(), 85, DetectionSource::Message).is_err());
        assert_eq!(session.state, SessionState::Idle);
    }

    #[test]
    fn elapsed_is_clamped_to_zero() {
        let session = AttemptSession::new("ana@example.com", 7, 5_000.0);
        assert_eq!(session.elapsed_ms(4_000.0), 0.0);
        assert_eq!(session.elapsed_ms(6_500.0), 1_500.0);
    }
}
