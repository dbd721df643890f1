//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the client starts against a local
//! backend with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{ClientError, Result};

const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin; REST lives under `/api`, push under `/ws/{user_id}`.
    /// Env: `WHATGRAM_BACKEND_URL`
    pub backend_url: String,

    /// SQLite file holding the persisted session.
    /// Env: `WHATGRAM_STATE_PATH`
    /// Default: `<data dir>/whatgram/session.db`
    pub state_path: PathBuf,

    /// Per-request timeout. `None` leaves reqwest's default (no timeout).
    /// Env: `WHATGRAM_HTTP_TIMEOUT_SECS`
    pub http_timeout: Option<Duration>,

    /// Interface language used before a user record is available.
    /// Env: `WHATGRAM_LANGUAGE`
    pub language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            state_path: default_state_path(),
            http_timeout: None,
            language: whatgram_locale::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("WHATGRAM_BACKEND_URL") {
            config.backend_url = Url::parse(url.trim())?.to_string();
        }
        if let Ok(path) = std::env::var("WHATGRAM_STATE_PATH") {
            config.state_path = PathBuf::from(path);
        }
        if let Ok(secs) = std::env::var("WHATGRAM_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Validation(format!("WHATGRAM_HTTP_TIMEOUT_SECS must be an integer, got '{}'", secs))
            })?;
            config.http_timeout = Some(Duration::from_secs(secs));
        }
        if let Ok(lang) = std::env::var("WHATGRAM_LANGUAGE") {
            config.language = lang;
        }

        Ok(config)
    }

    pub fn with_backend(mut self, backend_url: impl Into<String>) -> Self {
        self.backend_url = backend_url.into();
        self
    }

    /// REST base, without a trailing slash.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url.trim_end_matches('/'))
    }

    /// Push channel address for `user_id` (`http` -> `ws`, `https` -> `wss`).
    pub fn ws_url(&self, user_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.backend_url)?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| ClientError::Validation(format!("cannot derive WebSocket URL from {}", self.backend_url)))?;

        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}/ws/{}", base, user_id));
        url.set_query(None);
        Ok(url)
    }
}

fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("whatgram").join("session.db"))
        .unwrap_or_else(|| PathBuf::from("whatgram-session.db"))
}
