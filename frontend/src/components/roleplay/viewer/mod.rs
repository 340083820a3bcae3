//! Roleplay viewer: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering, and helpers.
//!
//! Responsibilities
//! - Re-export selected types (`Msg`, `ViewerProps`, `RoleplayViewer`).
//! - Provide the `Component` implementation that delegates to
//!   `update::update` and `view::view`.
//! - On first render, resolve the target exercise model and the user's
//!   prior attempt count from the external API.
//! - On destroy, stop every detection strategy so no timer, listener, or
//!   OCR callback outlives the page.

use yew::platform::spawn_local;
use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::ViewerProps;
pub use state::RoleplayViewer;

impl Component for RoleplayViewer {
    type Message = Msg;
    type Properties = ViewerProps;

    fn create(ctx: &Context<Self>) -> Self {
        RoleplayViewer::new(ctx.props())
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;

            let api = ctx.props().api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::ModelsLoaded(api.fetch_models().await));
            });

            let api = ctx.props().api.clone();
            let email = ctx.props().email.clone();
            let model_id = ctx.props().model_id;
            let link = ctx.link().clone();
            spawn_local(async move {
                // Attempt counts are aggregator-owned; a miss here only
                // leaves the progress display blank.
                if let Ok(summary) = api.fetch_user_performance(&email).await {
                    link.send_message(Msg::AttemptsLoaded(summary.attempts_for_model(model_id)));
                }
            });
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.stop_detection();
        gloo_console::log!("viewer unmounted: detection stopped");
    }
}
