#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # jenkins_client: typed access to the Jenkins REST API
//!
//! Every operation goes through one pipeline:
//!
//! 1. **Request Builder** - base URL + route (+ `/api/json`), query string, Basic credentials
//! 2. **Crumb Manager** - fetches a CSRF crumb from `/crumbIssuer` before each mutating call
//! 3. **Processor** - sends the request, follows redirects with credentials re-attached
//! 4. **Response Dumper** - checks the status and decodes the JSON body or reads `Location`
//!
//! ## Status Expectations
//!
//! | Dump method | Expected status | Result |
//! |-------------|-----------------|--------|
//! | `Omit` | any | nothing |
//! | `Json` | `200 OK` | decoded body |
//! | `Location` | `201 Created` | resolved `Location` URL |
//!
//! ## Client Usage
//!
//! ```ignore
//! use jenkins_client::{CallContext, ClientConfig, JenkinsClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> jenkins_client::Result<()> {
//!     let client = JenkinsClient::new(&ClientConfig::from_env()?)?;
//!     let ctx = CallContext::with_timeout(Duration::from_secs(30));
//!
//!     let invoked = client.build_invoke(&ctx, "demo").await?;
//!     let build = client.build_get_by_queue_id(&ctx, "demo", invoked.queue_id).await?;
//!     println!("build #{} result {:?}", build.number, build.result);
//!     Ok(())
//! }
//! ```
//!
//! ## Cancellation
//!
//! ```ignore
//! let (ctx, handle) = CallContext::background().cancellable();
//! tokio::spawn(async move { handle.cancel() });
//! assert!(matches!(client.root_info(&ctx).await, Err(JenkinsError::Cancelled)));
//! ```
//!
//! ## Module Organization
//!
//! - [`client`] - [`JenkinsClient`] and its operations
//! - [`request`] - request building, crumbs, response dumping, the processor
//! - [`transport`] - the HTTP seam and its `reqwest` implementation
//! - [`types`] - JSON API data types
//! - [`error`] - [`JenkinsError`] and [`ErrorKind`]

pub mod client;
pub mod error;
pub mod request;
pub mod transport;
pub mod types;

pub use client::{ClientConfig, JenkinsClient};
pub use error::{ErrorKind, JenkinsError, Result};
pub use request::{CallContext, CancelHandle};
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
