//! Client configuration.
//!
//! # Environment Variables
//!
//! - `JENKINS_URL`: base URL, e.g. `http://localhost:8080` (required)
//! - `JENKINS_USER`: user name (required)
//! - `JENKINS_PASSWORD` or `JENKINS_API_TOKEN`: password or API token (required)
//! - `JENKINS_DEBUG`: set to `1` or `true` to log response bodies

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{JenkinsError, Result};

/// Connection settings for a [`JenkinsClient`](crate::JenkinsClient).
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Jenkins instance, context path included.
    pub base_url: String,

    /// User name for Basic authentication.
    pub username: String,

    /// Password or API token for Basic authentication.
    pub password: String,

    /// Log every JSON response body verbatim.
    #[serde(default)]
    pub debug: bool,

    /// Per-exchange timeout enforced by the transport.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Idle connections kept per host.
    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_per_host: usize,

    /// Redirect hops followed before giving up.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_idle_per_host() -> usize {
    16
}

fn default_max_redirects() -> usize {
    10
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("debug", &self.debug)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_idle_per_host", &self.max_idle_per_host)
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration with default limits for the given instance and credentials.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            debug: false,
            request_timeout_ms: default_request_timeout_ms(),
            max_idle_per_host: default_max_idle_per_host(),
            max_redirects: default_max_redirects(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// [`JenkinsError::Config`] when a required variable is missing.
    pub fn from_env() -> Result<Self> {
        let base_url = required("JENKINS_URL")?;
        let username = required("JENKINS_USER")?;
        let password = env::var("JENKINS_PASSWORD")
            .or_else(|_| env::var("JENKINS_API_TOKEN"))
            .map_err(|_| {
                JenkinsError::Config("JENKINS_PASSWORD or JENKINS_API_TOKEN must be set".to_string())
            })?;
        let debug = env::var("JENKINS_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self::new(base_url, username, password).with_debug(debug))
    }

    /// Enable or disable response body logging.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the per-exchange transport timeout.
    #[must_use]
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Set the idle connection limit per host.
    #[must_use]
    pub fn with_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.max_idle_per_host = max_idle;
        self
    }

    /// Set the redirect hop limit.
    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| JenkinsError::Config(format!("{name} must be set")))
}
