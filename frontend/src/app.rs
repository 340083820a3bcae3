//! Root component: resolves runtime configuration, reads the navigation
//! query parameters, and mounts the matching page.
//!
//! There is no client-side router; pages are addressed with plain query
//! strings and the email parameter is the sole identity carrier:
//! - `?email=a@b.com` — user portal
//! - `?email=a@b.com&model=3&category=1` — roleplay viewer
//! - `?view=admin&location=loc_1` — admin location dashboard

use yew::prelude::*;

use crate::api::{self, ApiClient};
use crate::components::portal::PortalPage;
use crate::components::reports::location::LocationDashboard;
use crate::components::roleplay::viewer::RoleplayViewer;

/// Where the query string points.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Portal { email: String },
    Viewer { email: String, model_id: u32, category_id: Option<u32> },
    Admin { location_id: String },
    MissingEmail,
}

/// Parses a raw query string (with or without the leading `?`).
pub fn parse_route(query: &str) -> Route {
    let query = query.strip_prefix('?').unwrap_or(query);
    let param = |wanted: &str| -> Option<String> {
        query.split('&').find_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("");
            if key == wanted && !value.is_empty() {
                Some(value.replace('+', " ").replace("%40", "@"))
            } else {
                None
            }
        })
    };

    if param("view").as_deref() == Some("admin") {
        return match param("location").or_else(|| param("location_id")) {
            Some(location_id) => Route::Admin { location_id },
            None => Route::MissingEmail,
        };
    }

    let Some(email) = param("email") else {
        return Route::MissingEmail;
    };

    match param("model").and_then(|m| m.parse::<u32>().ok()) {
        Some(model_id) => Route::Viewer {
            email,
            model_id,
            category_id: param("category").and_then(|c| c.parse().ok()),
        },
        None => Route::Portal { email },
    }
}

/// Builds the portal link for a user. Navigation is plain hrefs; the
/// email parameter must survive every hop.
pub fn portal_href(email: &str) -> String {
    format!("?email={}", encode_query_value(email))
}

/// Builds the viewer link for one model.
pub fn viewer_href(email: &str, category_id: u32, model_id: u32) -> String {
    format!(
        "?email={}&category={category_id}&model={model_id}",
        encode_query_value(email)
    )
}

fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    out
}

pub enum AppMsg {
    ConfigLoaded(String),
}

pub struct App {
    route: Route,
    api: Option<ApiClient>,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        Self {
            route: parse_route(&query),
            api: None,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            let link = ctx.link().clone();
            wasm_bindgen_futures::spawn_local(async move {
                let base = match api::fetch_runtime_config().await {
                    Ok(config) => config.api_base_url,
                    Err(err) => {
                        gloo_console::warn!(format!(
                            "config.json unavailable ({err}); falling back to /api"
                        ));
                        "/api".to_string()
                    }
                };
                link.send_message(AppMsg::ConfigLoaded(base));
            });
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::ConfigLoaded(base) => {
                self.api = Some(ApiClient::new(base));
                true
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let Some(api) = self.api.clone() else {
            return html! { <div class="page-loading">{"Loading…"}</div> };
        };

        match &self.route {
            Route::Portal { email } => html! {
                <PortalPage email={email.clone()} api={api} />
            },
            Route::Viewer { email, model_id, category_id } => html! {
                <RoleplayViewer
                    email={email.clone()}
                    model_id={*model_id}
                    category_id={*category_id}
                    api={api}
                />
            },
            Route::Admin { location_id } => html! {
                <LocationDashboard location_id={location_id.clone()} api={api} />
            },
            Route::MissingEmail => html! {
                <div class="page-error">
                    <h2>{"Access Denied"}</h2>
                    <p>{"An email parameter is required."}</p>
                    <p class="muted">
                        {"Make sure you opened this page through the link you were sent."}
                    </p>
                </div>
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_alone_goes_to_portal() {
        assert_eq!(
            parse_route("?email=ana%40example.com"),
            Route::Portal { email: "ana@example.com".into() }
        );
    }

    #[test]
    fn model_param_selects_viewer() {
        assert_eq!(
            parse_route("email=ana@example.com&category=2&model=7"),
            Route::Viewer {
                email: "ana@example.com".into(),
                model_id: 7,
                category_id: Some(2),
            }
        );
    }

    #[test]
    fn admin_view_needs_location() {
        assert_eq!(
            parse_route("?view=admin&location=loc_9"),
            Route::Admin { location_id: "loc_9".into() }
        );
        assert_eq!(parse_route("?view=admin"), Route::MissingEmail);
    }

    #[test]
    fn missing_email_is_rejected() {
        assert_eq!(parse_route(""), Route::MissingEmail);
        assert_eq!(parse_route("?model=3"), Route::MissingEmail);
    }

    #[test]
    fn hrefs_round_trip_through_the_parser() {
        let href = viewer_href("ana@example.com", 2, 7);
        assert_eq!(
            parse_route(&href),
            Route::Viewer {
                email: "ana@example.com".into(),
                model_id: 7,
                category_id: Some(2),
            }
        );
        assert_eq!(
            parse_route(&portal_href("ana@example.com")),
            Route::Portal { email: "ana@example.com".into() }
        );
    }
}
