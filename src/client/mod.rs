//! Jenkins API client.
//!
//! [`JenkinsClient`] maps named operations onto [`ApiRequest`]s and hands
//! them to the shared [`Processor`]. Each operation is an `async fn` taking
//! a [`CallContext`] and resolving to exactly one `Result`.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── config  - ClientConfig, environment loading
//! ├── jobs    - create, get, delete, exists, in-queue, is-building
//! ├── builds  - invoke, get by number, get by queue id
//! ├── queue   - queue listing and queue items
//! └── plugins - plugin installation
//! ```
//!
//! # Operations
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | [`root_info`](JenkinsClient::root_info) | `GET /api/json` | [`Root`] |
//! | [`job_create`](JenkinsClient::job_create) | `POST /createItem?name=` | [`Job`](crate::types::Job) |
//! | [`job_get`](JenkinsClient::job_get) | `GET /job/{name}/api/json` | [`Job`](crate::types::Job) |
//! | [`job_delete`](JenkinsClient::job_delete) | `POST /job/{name}/doDelete` | `()` |
//! | [`build_invoke`](JenkinsClient::build_invoke) | `POST /job/{name}/build` | [`BuildInvoked`](crate::types::BuildInvoked) |
//! | [`build_get_by_number`](JenkinsClient::build_get_by_number) | `GET /job/{name}/{n}/api/json` | [`Build`](crate::types::Build) |
//! | [`build_get_by_queue_id`](JenkinsClient::build_get_by_queue_id) | two sequential GETs | [`Build`](crate::types::Build) |
//! | [`queue_list`](JenkinsClient::queue_list) | `GET /queue/api/json` | [`Queue`](crate::types::Queue) |
//! | [`plugin_install`](JenkinsClient::plugin_install) | `POST /pluginManager/uploadPlugin` | `()` |
//!
//! # Examples
//!
//! ```ignore
//! use jenkins_client::{CallContext, ClientConfig, JenkinsClient};
//!
//! let client = JenkinsClient::new(&ClientConfig::new("http://localhost:8080", "admin", "token"))?;
//! let ctx = CallContext::background();
//!
//! let invoked = client.build_invoke(&ctx, "demo").await?;
//! println!("queued as {}", invoked.queue_id);
//! ```

mod builds;
mod config;
mod jobs;
mod plugins;
mod queue;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{JenkinsError, Result};
use crate::request::{ApiRequest, CallContext, Processor, Receiver};
use crate::transport::Transport;
use crate::types::Root;

pub use config::ClientConfig;
pub use jobs::MAX_JOB_DEPTH;

/// Typed client for one Jenkins instance.
///
/// Cheap to clone; clones share the connection pool and cookie jar.
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    processor: Arc<Processor>,
}

impl JenkinsClient {
    /// Create a client using the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Fails when the base URL is malformed or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let processor = Processor::new(config)?;
        tracing::debug!(base_url = %config.base_url, "jenkins client created");
        Ok(JenkinsClient {
            processor: Arc::new(processor),
        })
    }

    /// Create a client on top of a custom transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let processor = Processor::with_transport(config, transport)?;
        Ok(JenkinsClient {
            processor: Arc::new(processor),
        })
    }

    /// The processor shared by this client's calls.
    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Summary of the connected node, including its top-level jobs.
    pub async fn root_info(&self, ctx: &CallContext) -> Result<Root> {
        self.get(ctx, &ApiRequest::get("/")).await
    }

    async fn get<T: DeserializeOwned>(&self, ctx: &CallContext, api: &ApiRequest) -> Result<T> {
        self.processor
            .get_json(ctx, api, Receiver::Decode)
            .await?
            .into_decoded()
    }
}

fn require_name<'a>(what: &str, name: &'a str) -> Result<&'a str> {
    if name.trim().is_empty() {
        return Err(JenkinsError::InvalidRequest(format!("{what} name must not be empty")));
    }
    Ok(name)
}

fn job_route(name: &str) -> Result<String> {
    Ok(format!("/job/{}", require_name("job", name)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::new("http://localhost:8080", "admin", "secret");
        assert!(JenkinsClient::new(&config).is_ok());
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let config = ClientConfig::new("localhost:8080", "admin", "secret");
        let err = JenkinsClient::new(&config).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Construction);
    }

    #[test]
    fn test_job_route() {
        assert_eq!(job_route("demo").unwrap(), "/job/demo");
        assert!(matches!(job_route(" "), Err(JenkinsError::InvalidRequest(_))));
    }
}
