//! Shared renderers for aggregator-owned performance rollups.
//!
//! Everything here is display-only: the nested category → model →
//! attempt-history breakdown and the overview stat cards are drawn
//! straight from the collaborator's JSON. No statistic is computed on the
//! client beyond choosing a color class.

use std::collections::HashSet;

use common::model::performance::{
    AttemptRecord, CategoryStats, ModelStats, OverallStats, RecentRoleplay,
};
use yew::prelude::*;

pub mod location;

/// Date display for aggregator timestamps; absent means never attempted.
pub fn format_date(value: Option<&str>) -> String {
    match value {
        Some(ts) if !ts.is_empty() => ts.split('T').next().unwrap_or(ts).to_string(),
        _ => "Never attempted".to_string(),
    }
}

pub fn score_class(score: f64) -> &'static str {
    if score >= 80.0 {
        "score-high"
    } else if score >= 60.0 {
        "score-mid"
    } else {
        "score-low"
    }
}

/// The four overview cards at the top of a dashboard.
pub fn overall_cards(stats: &OverallStats) -> Html {
    let card = |label: &str, value: String, hint: String| {
        html! {
            <div class="stat-card">
                <p class="stat-label">{ label.to_string() }</p>
                <p class="stat-value">{ value }</p>
                <p class="stat-hint">{ hint }</p>
            </div>
        }
    };
    html! {
        <div class="stat-grid">
            { card(
                "Average Score",
                format!("{}%", stats.average_score.round()),
                format!("Across {} attempts", stats.total_scores),
            ) }
            { card("Highest Score", format!("{}%", stats.highest_score), "Personal best".to_string()) }
            { card("Lowest Score", format!("{}%", stats.lowest_score), "Room to grow".to_string()) }
            { card("Feedbacks", stats.total_feedbacks.to_string(), "Performance reviews".to_string()) }
        </div>
    }
}

/// Most recent attempt banner.
pub fn recent_activity(recent: &RecentRoleplay) -> Html {
    html! {
        <div class="recent-activity">
            <h3>{"Most Recent Attempt"}</h3>
            <div class="recent-row">
                <div>
                    <p class="recent-model">{ &recent.model_name }</p>
                    <p class="muted">{ &recent.category_name }</p>
                    <p class="muted">{ format_date(Some(&recent.timestamp)) }</p>
                </div>
                <div class="recent-score">
                    <span class={classes!("score-badge", score_class(recent.score as f64))}>
                        { format!("{}%", recent.score) }
                    </span>
                    {
                        match &recent.raw_score {
                            Some(raw) if raw != &format!("{}%", recent.score) => html! {
                                <span class="muted">{ format!("({raw})") }</span>
                            },
                            _ => html! {},
                        }
                    }
                </div>
            </div>
        </div>
    }
}

/// Nested expandable breakdown: categories open into models, models open
/// into their attempt history with strengths/improvements.
pub fn category_breakdown(
    categories: &[CategoryStats],
    expanded_categories: &HashSet<u32>,
    expanded_models: &HashSet<u32>,
    on_toggle_category: &Callback<u32>,
    on_toggle_model: &Callback<u32>,
) -> Html {
    if categories.is_empty() {
        return html! {
            <p class="muted">{"No categories available."}</p>
        };
    }

    categories
        .iter()
        .map(|category| {
            let expanded = expanded_categories.contains(&category.category_id);
            let category_id = category.category_id;
            let toggle = {
                let on_toggle = on_toggle_category.clone();
                Callback::from(move |_: MouseEvent| on_toggle.emit(category_id))
            };
            html! {
                <div class="report-category">
                    <div class="report-category-header" onclick={toggle}>
                        <span class="chevron">{ if expanded { "▾" } else { "▸" } }</span>
                        <span class="report-category-name">{ &category.category_name }</span>
                        <span class="muted">
                            { format!(
                                "{} attempts · models {}/{} · last: {}",
                                category.attempts_count,
                                category.models_attempted,
                                category.models_count,
                                format_date(category.last_attempt.as_deref()),
                            ) }
                        </span>
                        <span class={classes!("report-category-avg", score_class(category.average_score))}>
                            { format!("{:.1}%", category.average_score) }
                        </span>
                    </div>
                    {
                        if expanded {
                            category
                                .models
                                .iter()
                                .map(|model| model_block(model, expanded_models, on_toggle_model))
                                .collect::<Html>()
                        } else {
                            html! {}
                        }
                    }
                </div>
            }
        })
        .collect()
}

fn model_block(
    model: &ModelStats,
    expanded_models: &HashSet<u32>,
    on_toggle_model: &Callback<u32>,
) -> Html {
    let expanded = expanded_models.contains(&model.model_id);
    let model_id = model.model_id;
    let toggle = {
        let on_toggle = on_toggle_model.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(model_id))
    };

    let policy = match (model.min_score_to_pass, model.min_attempts_required) {
        (Some(pass), Some(attempts)) => {
            format!("pass mark {pass}% · {attempts} attempts required")
        }
        (Some(pass), None) => format!("pass mark {pass}%"),
        (None, Some(attempts)) => format!("{attempts} attempts required"),
        (None, None) => String::new(),
    };

    html! {
        <div class="report-model">
            <div class="report-model-header" onclick={toggle}>
                <span class="chevron">{ if expanded { "▾" } else { "▸" } }</span>
                <span class="report-model-name">{ &model.model_name }</span>
                <span class="muted">
                    { format!(
                        "{} attempts · latest {}% · best {}%",
                        model.attempts_count,
                        model.latest_score.unwrap_or(0),
                        model.highest_score.unwrap_or(0),
                    ) }
                </span>
                {
                    if policy.is_empty() {
                        html! {}
                    } else {
                        html! { <span class="muted">{ policy }</span> }
                    }
                }
            </div>
            {
                if expanded {
                    attempt_history(&model.models_attempt_history)
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn attempt_history(history: &[AttemptRecord]) -> Html {
    if history.is_empty() {
        return html! {
            <p class="muted indent">{"No attempts recorded for this model."}</p>
        };
    }
    history
        .iter()
        .map(|attempt| {
            html! {
                <div class="attempt-record">
                    <div class="attempt-record-header">
                        <span class={classes!("score-badge", score_class(attempt.score as f64))}>
                            { format!("{}%", attempt.score) }
                        </span>
                        <span class="muted">{ format_date(Some(&attempt.submitted_at)) }</span>
                    </div>
                    <div class="attempt-feedback">
                        <div>
                            <p class="feedback-label strengths">{"Strengths"}</p>
                            <p>{ attempt.strengths.clone().unwrap_or_else(|| "No strengths noted".into()) }</p>
                        </div>
                        <div>
                            <p class="feedback-label improvements">{"Areas for Improvement"}</p>
                            <p>{ attempt.improvements.clone().unwrap_or_else(|| "No improvements noted".into()) }</p>
                        </div>
                    </div>
                </div>
            }
        })
        .collect()
}
