//! View rendering for the roleplay viewer.
//!
//! Layout: header with back link, the vendor embed in a card, and a
//! sidebar with the pass/attempt policy, the detection controls
//! (screenshot capture, confirmation prompt, manual entry), and the
//! status banner. The embed markup is vendor-controlled and injected
//! verbatim; nothing in here reads or mutates it.

use common::score::session::SessionState;
use web_sys::{HtmlInputElement, InputEvent};
use yew::html::Scope;
use yew::prelude::*;
use yew::virtual_dom::AttrValue;

use super::helpers::attempts_line;
use super::messages::Msg;
use super::state::{RoleplayViewer, StatusTone};
use crate::app::portal_href;
use crate::detect::ocr::OcrReadiness;

pub fn view(component: &RoleplayViewer, ctx: &Context<RoleplayViewer>) -> Html {
    let link = ctx.link();

    if let Some(error) = &component.load_error {
        return html! {
            <div class="page-error">
                <h2>{"Cannot open this roleplay"}</h2>
                <p>{error}</p>
                <a class="btn" href={portal_href(&ctx.props().email)}>{"Back to Library"}</a>
            </div>
        };
    }

    let Some(model) = &component.model else {
        return html! { <div class="page-loading">{"Loading roleplay…"}</div> };
    };

    html! {
        <div class="viewer-page">
            <div class="viewer-header">
                <a class="btn outline" href={portal_href(&ctx.props().email)}>
                    {"← Back to Library"}
                </a>
                <h1>{ &model.name }</h1>
            </div>

            { build_status_banner(component) }

            <div class="viewer-layout">
                <div class="embed-card">
                    <div class="embed-host" id={component.host_id.clone()}>
                        { Html::from_html_unchecked(AttrValue::from(model.embed_markup.clone())) }
                    </div>
                </div>

                <aside class="viewer-sidebar">
                    { build_policy_panel(component, model) }
                    { build_detection_panel(component, link) }
                </aside>
            </div>
        </div>
    }
}

fn build_status_banner(component: &RoleplayViewer) -> Html {
    let Some(status) = &component.status else {
        return html! {};
    };
    let tone = match status.tone {
        StatusTone::Info => "info",
        StatusTone::Success => "success",
        StatusTone::Error => "error",
    };
    html! {
        <div class={classes!("status-banner", tone)}>{ &status.text }</div>
    }
}

fn build_policy_panel(
    component: &RoleplayViewer,
    model: &common::model::exercise::ExerciseModel,
) -> Html {
    html! {
        <div class="panel">
            <h3>{"Requirements"}</h3>
            <p>{ format!("Pass mark: {}%", model.min_score_to_pass) }</p>
            <p>{ attempts_line(model, component.attempts_recorded) }</p>
        </div>
    }
}

fn build_detection_panel(component: &RoleplayViewer, link: &Scope<RoleplayViewer>) -> Html {
    if component.session.state.is_recorded() {
        return html! {
            <div class="panel">
                <h3>{"Score"}</h3>
                <p class="score-recorded">
                    { format!(
                        "{}% recorded via {}.",
                        component.session.detected_numeric_score.unwrap_or_default(),
                        component
                            .session
                            .detection_source
                            .map(|s| s.label())
                            .unwrap_or("unknown channel")
                    ) }
                </p>
            </div>
        };
    }

    let submitting = component.session.state == SessionState::Submitting;

    html! {
        <div class="panel">
            <h3>{"Score"}</h3>

            { build_pending_prompt(component, link) }
            { build_ocr_controls(component, link, submitting) }
            { build_manual_entry(component, link, submitting) }
        </div>
    }
}

/// Confirmation prompt for a low-confidence reading. Confirming submits;
/// dismissing goes back to watching.
fn build_pending_prompt(component: &RoleplayViewer, link: &Scope<RoleplayViewer>) -> Html {
    let Some(pending) = &component.pending else {
        return html! {};
    };
    html! {
        <div class="pending-prompt">
            <p>{ format!("Is {} your score?", pending.text) }</p>
            <button class="btn" onclick={link.callback(|_| Msg::ConfirmPending)}>
                {"Yes, submit it"}
            </button>
            <button class="btn outline" onclick={link.callback(|_| Msg::DismissPending)}>
                {"No"}
            </button>
        </div>
    }
}

fn build_ocr_controls(
    component: &RoleplayViewer,
    link: &Scope<RoleplayViewer>,
    submitting: bool,
) -> Html {
    let disabled = component.ocr != OcrReadiness::Ready
        || submitting
        || !component.session.state.accepts_candidates();

    html! {
        <div class="ocr-controls">
            <button
                class="btn"
                disabled={disabled}
                onclick={link.callback(|_| Msg::TriggerOcr)}
            >
                { match component.ocr {
                    OcrReadiness::Unavailable => "Screenshot capture unavailable",
                    OcrReadiness::Loading => "Reading screenshot…",
                    OcrReadiness::Ready => "Capture score from screenshot",
                } }
            </button>
            {
                if let Some(progress) = component.ocr_progress {
                    html! {
                        <div class="progress-track">
                            <div
                                class="progress-fill"
                                style={format!("width: {progress}%;")}
                            />
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn build_manual_entry(
    component: &RoleplayViewer,
    link: &Scope<RoleplayViewer>,
    submitting: bool,
) -> Html {
    html! {
        <div class="manual-entry">
            <label for="manual-score">{"Or enter your score"}</label>
            <input
                id="manual-score"
                type="text"
                placeholder="e.g. 85"
                value={component.manual_input.clone()}
                oninput={link.callback(|e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    Msg::ManualInput(input.value())
                })}
                onkeydown={link.batch_callback(|e: KeyboardEvent| {
                    if e.key() == "Enter" { vec![Msg::SubmitManual] } else { vec![] }
                })}
            />
            <button
                class="btn"
                disabled={submitting}
                onclick={link.callback(|_| Msg::SubmitManual)}
            >
                { if submitting { "Submitting…" } else { "Submit score" } }
            </button>
            {
                if let Some(error) = &component.manual_error {
                    html! { <span class="field-error">{ error }</span> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
