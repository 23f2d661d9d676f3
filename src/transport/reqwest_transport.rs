//! Default transport backed by `reqwest`.
//!
//! One `reqwest::Client` is built per transport and shared by every call:
//! it owns the idle-connection pool (bounded per host) and the cookie jar
//! Jenkins uses for session affinity and crumb validation. Automatic
//! redirects are disabled; the processor follows them itself so it can
//! re-attach credentials on every hop.

use std::time::Duration;

use async_trait::async_trait;

use super::{Transport, TransportRequest, TransportResponse};
use crate::client::ClientConfig;
use crate::error::{JenkinsError, Result};

/// [`Transport`] implementation on top of `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the shared HTTP client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| JenkinsError::Transport(Box::new(e)))?;

        Ok(ReqwestTransport { client })
    }

    /// Wrap an already configured `reqwest::Client`.
    ///
    /// The client should have redirects disabled and a cookie store enabled.
    pub fn from_client(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(error: reqwest::Error) -> JenkinsError {
    if error.is_timeout() {
        JenkinsError::Timeout
    } else {
        JenkinsError::Transport(Box::new(error))
    }
}
