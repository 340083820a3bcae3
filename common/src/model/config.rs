use serde::{Deserialize, Serialize};

/// Runtime configuration the static host serves at `GET /config.json`.
/// The frontend fetches it on startup to learn where the external
/// roleplay API lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: String,
}
