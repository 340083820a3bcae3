//! Admin dashboard for one location: every user's rollup, expandable into
//! the same nested report the portal shows per user. Read-only over the
//! all-users-performance endpoint.

use std::collections::{HashMap, HashSet};

use common::model::performance::{AllUsersPerformance, LocationStats};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::components::reports::{category_breakdown, score_class};

#[derive(Properties, PartialEq, Clone)]
pub struct LocationProps {
    pub location_id: String,
    pub api: ApiClient,
}

pub enum LocationMsg {
    Loaded(Result<AllUsersPerformance, String>),
    Refresh,
    ToggleUser(String),
    ToggleCategory(String, u32),
    ToggleModel(String, u32),
}

pub struct LocationDashboard {
    data: Option<AllUsersPerformance>,
    loading: bool,
    error: Option<String>,
    expanded_users: HashSet<String>,
    /// Per-user expansion state, keyed by email.
    expanded_categories: HashMap<String, HashSet<u32>>,
    expanded_models: HashMap<String, HashSet<u32>>,
}

impl LocationDashboard {
    fn fetch(&mut self, ctx: &Context<Self>) {
        self.loading = true;
        self.error = None;
        let api = ctx.props().api.clone();
        let location_id = ctx.props().location_id.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(LocationMsg::Loaded(
                api.fetch_all_users_performance(&location_id).await,
            ));
        });
    }
}

impl Component for LocationDashboard {
    type Message = LocationMsg;
    type Properties = LocationProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
            expanded_users: HashSet::new(),
            expanded_categories: HashMap::new(),
            expanded_models: HashMap::new(),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.fetch(ctx);
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            LocationMsg::Loaded(Ok(data)) => {
                self.loading = false;
                self.data = Some(data);
                true
            }
            LocationMsg::Loaded(Err(err)) => {
                self.loading = false;
                self.error = Some(err);
                true
            }
            LocationMsg::Refresh => {
                self.fetch(ctx);
                true
            }
            LocationMsg::ToggleUser(email) => {
                if !self.expanded_users.remove(&email) {
                    self.expanded_users.insert(email);
                }
                true
            }
            LocationMsg::ToggleCategory(email, category_id) => {
                let set = self.expanded_categories.entry(email).or_default();
                if !set.remove(&category_id) {
                    set.insert(category_id);
                }
                true
            }
            LocationMsg::ToggleModel(email, model_id) => {
                let set = self.expanded_models.entry(email).or_default();
                if !set.remove(&model_id) {
                    set.insert(model_id);
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        if self.loading && self.data.is_none() {
            return html! { <div class="page-loading">{"Loading performance data…"}</div> };
        }
        if let Some(error) = &self.error {
            return html! {
                <div class="page-error">
                    <h2>{"Error loading report"}</h2>
                    <p>{ error }</p>
                    <button class="btn" onclick={link.callback(|_| LocationMsg::Refresh)}>
                        {"Retry"}
                    </button>
                </div>
            };
        }
        let Some(data) = &self.data else {
            return html! {};
        };

        html! {
            <div class="admin-page">
                <div class="admin-header">
                    <h1>{ format!("Location {}", ctx.props().location_id) }</h1>
                    <button class="btn outline" onclick={link.callback(|_| LocationMsg::Refresh)}>
                        {"Refresh"}
                    </button>
                </div>
                { data.location_stats.as_ref().map(location_cards).unwrap_or_default() }
                { self.user_rows(data, link) }
            </div>
        }
    }
}

impl LocationDashboard {
    fn user_rows(&self, data: &AllUsersPerformance, link: &yew::html::Scope<Self>) -> Html {
        if data.users.is_empty() {
            return html! { <p class="muted">{"No users in this location yet."}</p> };
        }

        data.users
            .iter()
            .map(|row| {
                let email = row.user.email.clone();
                let expanded = self.expanded_users.contains(&email);
                let toggle = {
                    let email = email.clone();
                    link.callback(move |_| LocationMsg::ToggleUser(email.clone()))
                };

                let body = if expanded {
                    let empty = HashSet::new();
                    let categories = self.expanded_categories.get(&email).unwrap_or(&empty);
                    let models = self.expanded_models.get(&email).unwrap_or(&empty);
                    let on_category = {
                        let email = email.clone();
                        link.callback(move |id| LocationMsg::ToggleCategory(email.clone(), id))
                    };
                    let on_model = {
                        let email = email.clone();
                        link.callback(move |id| LocationMsg::ToggleModel(email.clone(), id))
                    };
                    category_breakdown(&row.category_stats, categories, models, &on_category, &on_model)
                } else {
                    html! {}
                };

                html! {
                    <div class="admin-user">
                        <div class="admin-user-header" onclick={toggle}>
                            <span class="chevron">{ if expanded { "▾" } else { "▸" } }</span>
                            <span class="admin-user-name">{ &row.user.name }</span>
                            <span class="muted">{ &row.user.email }</span>
                            <span class={classes!("score-badge", score_class(row.overall_stats.average_score))}>
                                { format!("{:.1}%", row.overall_stats.average_score) }
                            </span>
                            <span class="muted">
                                { format!(
                                    "{} attempts · {} feedbacks",
                                    row.overall_stats.total_scores,
                                    row.overall_stats.total_feedbacks,
                                ) }
                            </span>
                        </div>
                        { body }
                    </div>
                }
            })
            .collect()
    }
}

fn location_cards(stats: &LocationStats) -> Html {
    html! {
        <div class="stat-grid">
            <div class="stat-card">
                <p class="stat-label">{"Users"}</p>
                <p class="stat-value">{ stats.total_users }</p>
                <p class="stat-hint">{"In this location"}</p>
            </div>
            <div class="stat-card">
                <p class="stat-label">{"Average Score"}</p>
                <p class="stat-value">{ format!("{:.1}%", stats.average_score_all_users) }</p>
                <p class="stat-hint">{"All users"}</p>
            </div>
            <div class="stat-card">
                <p class="stat-label">{"Feedbacks"}</p>
                <p class="stat-value">{ stats.total_feedbacks }</p>
                <p class="stat-hint">{"Submitted"}</p>
            </div>
            <div class="stat-card">
                <p class="stat-label">{"Completion"}</p>
                <p class="stat-value">{ format!("{:.0}%", stats.average_completion_rate) }</p>
                <p class="stat-hint">{"Average across users"}</p>
            </div>
        </div>
    }
}
