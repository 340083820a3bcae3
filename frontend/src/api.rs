//! Client for the external roleplay REST API.
//!
//! The backend is an external collaborator; this module only wraps its
//! endpoints with typed requests/responses over `gloo_net`. Errors are
//! reported as human-readable strings the components surface directly in
//! status lines and toasts.

use common::model::config::RuntimeConfig;
use common::model::exercise::ExerciseModel;
use common::model::performance::{AllUsersPerformance, PerformanceSummary};
use common::model::user::UserAccess;
use common::requests::{FeedbackRequest, SubmitScoreRequest};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

/// Shared handle carrying the API base URL. Cheap to clone into async
/// blocks and component props.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn fetch_models(&self) -> Result<Vec<ExerciseModel>, String> {
        get_json(&self.url("/roleplay/models/")).await
    }

    pub async fn fetch_user_access(&self, email: &str) -> Result<UserAccess, String> {
        let url = format!(
            "{}?email={}",
            self.url("/roleplay/user-access/get_user_categories/"),
            urlencode(email)
        );
        get_json(&url).await
    }

    pub async fn fetch_user_performance(&self, email: &str) -> Result<PerformanceSummary, String> {
        let url = format!(
            "{}?email={}",
            self.url("/roleplay/user-performance/"),
            urlencode(email)
        );
        get_json(&url).await
    }

    pub async fn fetch_all_users_performance(
        &self,
        location_id: &str,
    ) -> Result<AllUsersPerformance, String> {
        let url = format!(
            "{}?location_id={}",
            self.url("/roleplay/admin-reports/all_users_performance/"),
            urlencode(location_id)
        );
        get_json(&url).await
    }

    /// Primary submission path for a score record.
    pub async fn submit_score(&self, request: &SubmitScoreRequest) -> Result<(), String> {
        post_json(&self.url("/roleplay/scores/submit_score/"), request).await
    }

    /// Feedback endpoint; also the fallback submission path when the
    /// primary one fails.
    pub async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), String> {
        post_json(&self.url("/roleplay/feedback/"), request).await
    }
}

/// Fetches the static host's runtime configuration. Served same-origin,
/// so this does not go through [`ApiClient`].
pub async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    get_json("/config.json").await
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|err| format!("request failed: {err}"))?;
    read_json(response).await
}

async fn post_json<B: serde::Serialize>(url: &str, body: &B) -> Result<(), String> {
    let response = Request::post(url)
        .json(body)
        .map_err(|err| format!("could not encode request: {err}"))?
        .send()
        .await
        .map_err(|err| format!("request failed: {err}"))?;
    match response.status() {
        200 | 201 | 204 => Ok(()),
        status => Err(reject_message(status, response).await),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    match response.status() {
        200 => response
            .json::<T>()
            .await
            .map_err(|err| format!("unexpected response shape: {err}")),
        status => Err(reject_message(status, response).await),
    }
}

async fn reject_message(status: u16, response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    if body.is_empty() {
        format!("server responded with status {status}")
    } else {
        format!("server responded with status {status}: {body}")
    }
}

/// Minimal query-value encoding for the characters that matter in an
/// email or location id.
fn urlencode(value: &str) -> String {
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
