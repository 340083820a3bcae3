//! Update function for the roleplay viewer.
//!
//! Elm-style: receives the current state, the context, and a `Msg`,
//! mutates, and returns whether to re-render.
//!
//! Key behaviors
//! - Arbitration between racing strategies: the first normalizable
//!   candidate moves the session out of `Monitoring`; everything after
//!   that is discarded here, so a second submission is impossible.
//! - Needs-confirmation candidates never auto-submit; they park in
//!   `pending` until the user confirms or dismisses.
//! - Submission runs primary-then-fallback, and a failure hands control
//!   to manual entry instead of retrying or reopening detection.
//! - Cross-origin noise never reaches this layer; strategies deliver
//!   candidates or nothing.

use common::requests::{FeedbackRequest, SubmitScoreRequest};
use common::score::candidate::{Confidence, DetectionSource, RawScoreCandidate};
use common::score::gate::{self, GatePurpose, GateRefusal};
use common::score::normalize::{self, NormalizeError};
use common::score::session::SessionState;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::messages::Msg;
use super::state::{RoleplayViewer, StatusTone};
use crate::components::toast::show_toast;
use crate::detect::ocr::OcrReadiness;
use crate::detect::{DetectionConfig, DetectionEvent, StrategyRegistry, manual, ocr};

pub fn update(component: &mut RoleplayViewer, ctx: &Context<RoleplayViewer>, msg: Msg) -> bool {
    match msg {
        Msg::ModelsLoaded(Ok(models)) => {
            match models.into_iter().find(|m| m.id == ctx.props().model_id) {
                Some(model) => {
                    component.model = Some(model);
                    begin_monitoring(component, ctx);
                }
                None => {
                    component.load_error = Some("Roleplay not found.".to_string());
                }
            }
            true
        }
        Msg::ModelsLoaded(Err(err)) => {
            component.load_error = Some(format!("Failed to load roleplays: {err}"));
            true
        }
        Msg::AttemptsLoaded(count) => {
            component.attempts_recorded = Some(count);
            true
        }
        Msg::Detection(event) => handle_detection(component, ctx, event),
        Msg::ManualInput(value) => {
            component.manual_input = value;
            component.manual_error = None;
            true
        }
        Msg::SubmitManual => submit_manual(component, ctx),
        Msg::ConfirmPending => {
            let Some(candidate) = component.pending.take() else {
                return false;
            };
            match normalize::normalize(&candidate.text) {
                Ok(score) => {
                    accept_and_submit(component, ctx, candidate.text, score, candidate.source);
                }
                Err(_) => {
                    component.set_status(
                        StatusTone::Info,
                        "That reading was not usable — enter the score below instead.",
                    );
                }
            }
            true
        }
        Msg::DismissPending => {
            component.pending = None;
            component.set_status(StatusTone::Info, "Dismissed. Still watching the exercise…");
            true
        }
        Msg::TriggerOcr => trigger_ocr(component),
        Msg::SubmissionDone(Ok(())) => {
            if component.session.record_success().is_err() {
                return false;
            }
            component.stop_detection();
            show_toast("Score recorded.");
            refresh_attempts(component, ctx);

            let text = match (component.session.detected_numeric_score, component.model.as_ref())
            {
                (Some(score), Some(model)) => {
                    match gate::evaluate(score, model, GatePurpose::SubmitFeedback).refusal {
                        None => format!("Score {score}% recorded — feedback is unlocked."),
                        Some(GateRefusal::BelowPassThreshold { required, .. }) => format!(
                            "Score {score}% recorded. The attempt counts, but {required}% is \
                             needed before feedback opens."
                        ),
                    }
                }
                _ => "Score recorded.".to_string(),
            };
            component.set_status(StatusTone::Success, text);
            true
        }
        Msg::SubmissionDone(Err(err)) => {
            if component.session.record_failure().is_err() {
                return false;
            }
            component.set_status(
                StatusTone::Error,
                format!("Submission failed: {err}. Enter your score below to retry."),
            );
            true
        }
    }
}

/// The model is resolved: open the session and start the automatic
/// strategies.
fn begin_monitoring(component: &mut RoleplayViewer, ctx: &Context<RoleplayViewer>) {
    if component.session.begin_monitoring().is_err() {
        return;
    }
    component.ocr = if ocr::probe_support() {
        OcrReadiness::Ready
    } else {
        OcrReadiness::Unavailable
    };

    let events = ctx.link().callback(Msg::Detection);
    let mut registry =
        StrategyRegistry::new(DetectionConfig::default(), component.host_id.clone(), events);
    registry.start_automatic();
    component.registry = Some(registry);
    component.set_status(StatusTone::Info, "Watching the exercise for your score…");
}

fn handle_detection(
    component: &mut RoleplayViewer,
    ctx: &Context<RoleplayViewer>,
    event: DetectionEvent,
) -> bool {
    match event {
        DetectionEvent::Candidate(candidate) => {
            if !component.session.state.accepts_candidates() {
                gloo_console::log!(format!(
                    "detection: discarding late candidate from {}",
                    candidate.source.as_str()
                ));
                return false;
            }
            handle_candidate(component, ctx, candidate)
        }
        DetectionEvent::OcrProgress(progress) => {
            component.ocr = OcrReadiness::Loading;
            component.ocr_progress = Some(progress);
            true
        }
        DetectionEvent::OcrUnavailable(reason) => {
            component.ocr = OcrReadiness::Unavailable;
            component.ocr_progress = None;
            gloo_console::warn!(format!("ocr unavailable: {reason}"));
            component.set_status(
                StatusTone::Info,
                "Screenshot detection is unavailable here. The other options still work.",
            );
            true
        }
        DetectionEvent::StrategyExhausted(DetectionSource::OcrScreenshot) => {
            component.ocr = OcrReadiness::Ready;
            component.ocr_progress = None;
            component.set_status(
                StatusTone::Info,
                "No score found in the screenshot — try again once the result is visible, \
                 or enter it below.",
            );
            true
        }
        DetectionEvent::StrategyExhausted(source) => {
            gloo_console::log!(format!("detection: {} gave up", source.as_str()));
            component.exhausted_pollers += 1;
            let pollers = component
                .registry
                .as_ref()
                .map(|r| r.poller_count())
                .unwrap_or(0);
            if component.exhausted_pollers >= pollers && !component.detection_timed_out {
                component.detection_timed_out = true;
                if component.session.state.accepts_candidates() {
                    component.set_status(
                        StatusTone::Info,
                        "Automatic detection timed out. Capture a screenshot of the result \
                         or enter your score below.",
                    );
                }
                return true;
            }
            false
        }
    }
}

fn handle_candidate(
    component: &mut RoleplayViewer,
    ctx: &Context<RoleplayViewer>,
    candidate: RawScoreCandidate,
) -> bool {
    match normalize::normalize(&candidate.text) {
        Ok(score) => match candidate.confidence {
            Confidence::NeedsConfirmation => {
                if candidate.source == DetectionSource::OcrScreenshot {
                    component.ocr = OcrReadiness::Ready;
                }
                component.ocr_progress = None;
                component.set_status(
                    StatusTone::Info,
                    format!(
                        "Possible score {} found via {} — please confirm.",
                        candidate.text,
                        candidate.source.label()
                    ),
                );
                component.pending = Some(candidate);
                true
            }
            Confidence::High => {
                accept_and_submit(component, ctx, candidate.text, score, candidate.source);
                true
            }
        },
        Err(err) => {
            // Keep monitoring; a bad read from one channel is not fatal.
            gloo_console::warn!(format!(
                "detection: rejected {:?} from {}: {err}",
                candidate.text,
                candidate.source.as_str()
            ));
            false
        }
    }
}

/// Moves Monitoring → CandidateFound → Submitting and dispatches the
/// record. The accept can lose a race with another candidate in the same
/// tick; losing silently is exactly right.
fn accept_and_submit(
    component: &mut RoleplayViewer,
    ctx: &Context<RoleplayViewer>,
    raw: String,
    score: u8,
    source: DetectionSource,
) {
    if component.session.accept_candidate(raw, score, source).is_err() {
        return;
    }
    component.pending = None;
    component.ocr_progress = None;
    if component.ocr == OcrReadiness::Loading {
        component.ocr = OcrReadiness::Ready;
    }
    if component.session.begin_submitting().is_err() {
        return;
    }
    component.stop_detection();

    let elapsed = component.session.elapsed_ms(js_sys::Date::now()) / 1000.0;
    gloo_console::log!(format!(
        "session: submitting {score}% via {} after {elapsed:.0}s",
        source.as_str()
    ));
    component.set_status(StatusTone::Info, "Submitting your score…");
    dispatch_submission(component, ctx);
}

fn submit_manual(component: &mut RoleplayViewer, ctx: &Context<RoleplayViewer>) -> bool {
    if component.session.state == SessionState::Submitting {
        return false;
    }
    let candidate = manual::candidate(&component.manual_input);
    match normalize::normalize(&candidate.text) {
        Err(err) => {
            component.manual_error = Some(match err {
                NormalizeError::InvalidScoreFormat => {
                    "Enter a score like 85 or 85%.".to_string()
                }
                NormalizeError::OutOfRange(value) => {
                    format!("{value} is outside the 0-100 range.")
                }
            });
            true
        }
        Ok(score) => {
            if component
                .session
                .manual_entry(candidate.text.clone(), score)
                .is_err()
            {
                return false;
            }
            component.manual_input.clear();
            component.manual_error = None;
            component.pending = None;
            component.stop_detection();
            component.set_status(StatusTone::Info, "Submitting your score…");
            dispatch_submission(component, ctx);
            true
        }
    }
}

fn trigger_ocr(component: &mut RoleplayViewer) -> bool {
    if !component.session.state.accepts_candidates() || component.ocr != OcrReadiness::Ready {
        return false;
    }
    match component.registry.as_ref() {
        Some(registry) if registry.has(DetectionSource::OcrScreenshot) => {}
        _ => return false,
    }
    component.pending = None;
    component.ocr = OcrReadiness::Loading;
    component.ocr_progress = Some(0);
    component.set_status(StatusTone::Info, "Reading the exercise screenshot…");
    component
        .registry
        .as_mut()
        .unwrap()
        .trigger(DetectionSource::OcrScreenshot);
    true
}

/// Sends the score record: primary endpoint first, then one pass through
/// the feedback endpoint as fallback. No automatic retry beyond that.
fn dispatch_submission(component: &RoleplayViewer, ctx: &Context<RoleplayViewer>) {
    let (Some(score), Some(raw), Some(source)) = (
        component.session.detected_numeric_score,
        component.session.detected_raw_score.clone(),
        component.session.detection_source,
    ) else {
        return;
    };

    let request = SubmitScoreRequest {
        email: component.session.user_email.clone(),
        model_id: component.session.model_id,
        score,
        raw_score: raw,
        detection_method: source,
    };
    let api = ctx.props().api.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        match api.submit_score(&request).await {
            Ok(()) => link.send_message(Msg::SubmissionDone(Ok(()))),
            Err(primary) => {
                gloo_console::warn!(format!(
                    "primary submission failed ({primary}); trying feedback fallback"
                ));
                let fallback = FeedbackRequest {
                    email: request.email.clone(),
                    score: request.score,
                    strengths: String::new(),
                    improvements: String::new(),
                    model: request.model_id,
                };
                match api.submit_feedback(&fallback).await {
                    Ok(()) => link.send_message(Msg::SubmissionDone(Ok(()))),
                    Err(secondary) => link.send_message(Msg::SubmissionDone(Err(format!(
                        "{primary}; fallback also failed: {secondary}"
                    )))),
                }
            }
        }
    });
}

/// Re-reads the attempt count from the aggregator after a recording;
/// attempts are never reconstructed locally.
fn refresh_attempts(component: &RoleplayViewer, ctx: &Context<RoleplayViewer>) {
    let api = ctx.props().api.clone();
    let email = component.session.user_email.clone();
    let model_id = component.session.model_id;
    let link = ctx.link().clone();
    spawn_local(async move {
        if let Ok(summary) = api.fetch_user_performance(&email).await {
            link.send_message(Msg::AttemptsLoaded(summary.attempts_for_model(model_id)));
        }
    });
}
