//! Server configuration from the environment.
//!
//! `ROLEPLAY_API_URL` points the frontend at the external roleplay API;
//! it is handed out verbatim through `GET /config.json`. `HOST`/`PORT`
//! control where the static host binds.

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_URL: &str = "/api";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_base_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("PORT")
            .and_then(|raw| match raw.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    log::warn!("ignoring unparseable PORT value {raw:?}");
                    None
                }
            })
            .unwrap_or(DEFAULT_PORT);
        let api_base_url =
            lookup("ROLEPLAY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { host, port, api_base_url }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn environment_overrides_take_effect() {
        let config = ServerConfig::from_lookup(|name| match name {
            "HOST" => Some("0.0.0.0".to_string()),
            "PORT" => Some("9090".to_string()),
            "ROLEPLAY_API_URL" => Some("https://api.example.com".to_string()),
            _ => None,
        });
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.url(), "http://0.0.0.0:9090");
    }

    #[test]
    fn bad_port_falls_back() {
        let config = ServerConfig::from_lookup(|name| match name {
            "PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
