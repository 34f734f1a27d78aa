//! Service configuration.
//!
//! Built once at startup and handed to [`crate::completion::Completer::from_config`].
//! Nothing in the request path reads the environment.

use std::env;

/// Credential value that selects demo mode even when set.
pub const DEMO_KEY_SENTINEL: &str = "demo-key";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Configuration for the completion service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Chat API credential. `None`, empty or [`DEMO_KEY_SENTINEL`] selects demo mode.
    pub api_key: Option<String>,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Base URL of the OpenAI-compatible API, without trailing slash.
    pub base_url: String,
    /// Whole-request timeout enforced by the HTTP client.
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Values that replace the environment-derived config when set, e.g. from CLI flags.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl ServiceConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                     | Default                      |
    /// |------------------------------|------------------------------|
    /// | `OPENAI_API_KEY`             | unset (demo mode)            |
    /// | `OPENAI_MODEL`               | `gpt-3.5-turbo`              |
    /// | `OPENAI_BASE_URL`            | `https://api.openai.com/v1`  |
    /// | `RELAY_REQUEST_TIMEOUT_SECS` | `60`                         |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: normalize_key(lookup("OPENAI_API_KEY")),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            request_timeout_secs: lookup("RELAY_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Config with no credential. Always yields a demo completer.
    pub fn demo() -> Self {
        Self::default()
    }

    /// Same config bound to `api_key`.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = normalize_key(Some(api_key.into()));
        self
    }

    /// Apply every override that is set.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(api_key) = overrides.api_key {
            self = self.with_api_key(api_key);
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        self
    }

    /// True when the credential is missing, empty, or the demo sentinel.
    pub fn is_demo(&self) -> bool {
        match self.api_key.as_deref() {
            None | Some("") => true,
            Some(key) => key == DEMO_KEY_SENTINEL,
        }
    }

    /// Endpoint for chat completions under [`Self::base_url`].
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Trimmed; a blank key becomes `None`.
fn normalize_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}
