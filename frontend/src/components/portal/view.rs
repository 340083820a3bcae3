//! View rendering for the portal page.

use yew::html::Scope;
use yew::prelude::*;

use common::model::category::Category;

use super::{PortalMsg, PortalPage, Tab};
use crate::app::viewer_href;
use crate::components::reports::{category_breakdown, overall_cards, recent_activity};

pub fn view(component: &PortalPage, ctx: &Context<PortalPage>) -> Html {
    let link = ctx.link();

    if component.loading {
        return html! { <div class="page-loading">{"Loading your library…"}</div> };
    }
    if let Some(error) = &component.error {
        return html! {
            <div class="page-error">
                <h2>{"Access Denied"}</h2>
                <p>{ error }</p>
                <p class="muted">
                    {"Make sure you opened this page with the correct email link."}
                </p>
            </div>
        };
    }
    let Some(access) = &component.access else {
        return html! {};
    };

    html! {
        <div class="portal-page">
            <div class="portal-header">
                <h1>{"Roleplay Library"}</h1>
                <p>{ format!("Welcome back, {}", access.user.name) }</p>
                <p class="muted">{ &access.user.email }</p>
            </div>

            { build_tab_bar(component, link) }

            {
                match component.active_tab {
                    Tab::Dashboard => build_dashboard(component, link),
                    Tab::Library => build_library(component, ctx),
                }
            }
        </div>
    }
}

fn build_tab_bar(component: &PortalPage, link: &Scope<PortalPage>) -> Html {
    let tab_button = |tab: Tab, label: &str| {
        let active = component.active_tab == tab;
        html! {
            <button
                class={classes!("tab-btn", active.then_some("active"))}
                onclick={link.callback(move |_| PortalMsg::SetTab(tab))}
            >
                { label.to_string() }
            </button>
        }
    };
    html! {
        <div class="tab-bar">
            { tab_button(Tab::Dashboard, "Performance Dashboard") }
            { tab_button(Tab::Library, "Roleplay Library") }
        </div>
    }
}

fn build_dashboard(component: &PortalPage, link: &Scope<PortalPage>) -> Html {
    let Some(performance) = &component.performance else {
        return html! { <div class="page-loading">{"Loading performance…"}</div> };
    };

    let on_category = link.callback(PortalMsg::ToggleCategory);
    let on_model = link.callback(PortalMsg::ToggleModel);

    html! {
        <div class="dashboard">
            { overall_cards(&performance.overall_stats) }
            {
                match &performance.recent_roleplay {
                    Some(recent) => recent_activity(recent),
                    None => html! {},
                }
            }
            <div class="panel">
                <h3>{"Category Performance Breakdown"}</h3>
                { category_breakdown(
                    &performance.category_stats,
                    &component.expanded_categories,
                    &component.expanded_models,
                    &on_category,
                    &on_model,
                ) }
            </div>
        </div>
    }
}

fn build_library(component: &PortalPage, ctx: &Context<PortalPage>) -> Html {
    let link = ctx.link();
    let categories = &component.access.as_ref().map(|a| a.categories.clone()).unwrap_or_default();

    match component
        .selected_category
        .and_then(|id| categories.iter().find(|c| c.id == id))
    {
        Some(category) => build_category_models(component, category, ctx),
        None => html! {
            <div class="category-grid">
                {
                    categories.iter().map(|category| {
                        let id = category.id;
                        html! {
                            <button
                                class="category-card"
                                onclick={link.callback(move |_| PortalMsg::SelectCategory(Some(id)))}
                            >
                                <h3>{ &category.name }</h3>
                                <p class="muted">
                                    { format!(
                                        "{} roleplay{} available",
                                        category.models.len(),
                                        if category.models.len() == 1 { "" } else { "s" },
                                    ) }
                                </p>
                            </button>
                        }
                    }).collect::<Html>()
                }
                {
                    if categories.is_empty() {
                        html! {
                            <p class="muted">{"No categories assigned to your account."}</p>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        },
    }
}

fn build_category_models(
    component: &PortalPage,
    category: &Category,
    ctx: &Context<PortalPage>,
) -> Html {
    let link = ctx.link();
    let email = &ctx.props().email;
    // Aggregator counts tell Start apart from Retry.
    let attempts_for = |model_id: u32| -> u32 {
        component
            .performance
            .as_ref()
            .map(|p| p.attempts_for_model(model_id))
            .unwrap_or(0)
    };

    html! {
        <div>
            <button
                class="btn outline"
                onclick={link.callback(|_| PortalMsg::SelectCategory(None))}
            >
                {"← Back to Categories"}
            </button>
            <div class="panel">
                <h2>{ &category.name }</h2>
            </div>
            <div class="category-grid">
                {
                    category.models.iter().map(|model| {
                        let attempted = attempts_for(model.id) > 0;
                        html! {
                            <div class="model-card">
                                <h3>{ &model.name }</h3>
                                <p class="muted">
                                    { format!(
                                        "Pass mark {}% · {} attempt{} required",
                                        model.min_score_to_pass,
                                        model.min_attempts_required,
                                        if model.min_attempts_required == 1 { "" } else { "s" },
                                    ) }
                                </p>
                                <a class="btn" href={viewer_href(email, category.id, model.id)}>
                                    { if attempted { "Retry" } else { "Start" } }
                                </a>
                            </div>
                        }
                    }).collect::<Html>()
                }
                {
                    if category.models.is_empty() {
                        html! {
                            <p class="muted">{"No roleplays available in this category."}</p>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        </div>
    }
}
