//! End-user portal: performance dashboard and roleplay library.
//!
//! Resolves the user by email, shows their aggregator-owned performance
//! rollup on one tab and their assigned categories/models on the other.
//! Starting a model navigates to the viewer with the email carried along
//! in the query string.

use std::collections::HashSet;

use common::model::performance::PerformanceSummary;
use common::model::user::UserAccess;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;

mod view;

#[derive(Properties, PartialEq, Clone)]
pub struct PortalProps {
    pub email: String,
    pub api: ApiClient,
}

pub enum PortalMsg {
    AccessLoaded(Result<UserAccess, String>),
    PerformanceLoaded(Result<PerformanceSummary, String>),
    SetTab(Tab),
    SelectCategory(Option<u32>),
    ToggleCategory(u32),
    ToggleModel(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Library,
}

pub struct PortalPage {
    pub access: Option<UserAccess>,
    pub performance: Option<PerformanceSummary>,
    pub loading: bool,
    /// Access failure — unknown email, backend down. Blocks the page.
    pub error: Option<String>,
    pub active_tab: Tab,
    /// Category opened in the library tab.
    pub selected_category: Option<u32>,
    /// Expansion state of the dashboard breakdown.
    pub expanded_categories: HashSet<u32>,
    pub expanded_models: HashSet<u32>,
}

impl Component for PortalPage {
    type Message = PortalMsg;
    type Properties = PortalProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            access: None,
            performance: None,
            loading: true,
            error: None,
            active_tab: Tab::Dashboard,
            selected_category: None,
            expanded_categories: HashSet::new(),
            expanded_models: HashSet::new(),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            let api = ctx.props().api.clone();
            let email = ctx.props().email.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(PortalMsg::AccessLoaded(
                    api.fetch_user_access(&email).await,
                ));
            });

            let api = ctx.props().api.clone();
            let email = ctx.props().email.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(PortalMsg::PerformanceLoaded(
                    api.fetch_user_performance(&email).await,
                ));
            });
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            PortalMsg::AccessLoaded(Ok(access)) => {
                self.loading = false;
                self.access = Some(access);
                true
            }
            PortalMsg::AccessLoaded(Err(err)) => {
                self.loading = false;
                self.error = Some(err);
                true
            }
            PortalMsg::PerformanceLoaded(Ok(performance)) => {
                self.performance = Some(performance);
                true
            }
            PortalMsg::PerformanceLoaded(Err(err)) => {
                // Dashboard renders a placeholder; the library still works.
                gloo_console::warn!(format!("performance fetch failed: {err}"));
                false
            }
            PortalMsg::SetTab(tab) => {
                self.active_tab = tab;
                true
            }
            PortalMsg::SelectCategory(category) => {
                self.selected_category = category;
                true
            }
            PortalMsg::ToggleCategory(id) => {
                if !self.expanded_categories.remove(&id) {
                    self.expanded_categories.insert(id);
                }
                true
            }
            PortalMsg::ToggleModel(id) => {
                if !self.expanded_models.remove(&id) {
                    self.expanded_models.insert(id);
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
