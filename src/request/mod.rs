//! Request/response pipeline.
//!
//! Every client operation is described by an [`ApiRequest`] and funnelled
//! through the [`Processor`]:
//!
//! ```text
//! ApiRequest ──▶ RequestBuilder ──▶ [crumb, POST only] ──▶ Transport
//!                                                            │
//!        Result<Dumped<T>> ◀── Dumper (DumpMethod) ◀─────────┘
//! ```
//!
//! # Module Organization
//!
//! ```text
//! request/
//! ├── builder   - URL, query string, credentials
//! ├── context   - per-call deadline and cancellation
//! ├── crumb     - CSRF crumb fetch and injection
//! ├── dumper    - status checks and body/Location extraction
//! └── processor - the single entry point, redirects included
//! ```
//!
//! # Examples
//!
//! ```
//! use jenkins_client::request::{ApiFormat, ApiRequest, DumpMethod};
//!
//! let request = ApiRequest::get("/job/demo").with_query("depth", "1");
//! assert_eq!(request.format, ApiFormat::Json);
//! assert_eq!(request.dump, DumpMethod::Json);
//!
//! let request = ApiRequest::post("/job/demo/build").with_dump(DumpMethod::Location);
//! assert_eq!(request.format, ApiFormat::Xml);
//! ```

use std::collections::BTreeMap;

use bytes::Bytes;
use http::Method;
use url::Url;

use crate::error::{JenkinsError, Result};

mod builder;
mod context;
mod crumb;
mod dumper;
mod processor;

pub use builder::RequestBuilder;
pub use context::{CallContext, CancelHandle};
pub use crumb::Crumb;
pub use dumper::Dumper;
pub use processor::Processor;

/// How the route of a call is turned into a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    /// JSON API: `/api/json` is appended to the route.
    Json,
    /// Raw route, used for XML uploads and form-style actions.
    Xml,
}

/// How the response of a call is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpMethod {
    /// Ignore the response entirely.
    Omit,
    /// Require `200 OK` and decode the JSON body.
    Json,
    /// Require `201 Created` and extract the `Location` header.
    Location,
}

impl DumpMethod {
    fn name(self) -> &'static str {
        match self {
            DumpMethod::Omit => "omit",
            DumpMethod::Json => "json",
            DumpMethod::Location => "location",
        }
    }
}

impl TryFrom<u8> for DumpMethod {
    type Error = JenkinsError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(DumpMethod::Omit),
            1 => Ok(DumpMethod::Json),
            2 => Ok(DumpMethod::Location),
            other => Err(JenkinsError::UnknownDumpMethod(other)),
        }
    }
}

/// Whether the caller supplied a container for a JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// Decode the body into the requested type.
    Decode,
    /// Check the status but leave the body alone.
    Discard,
}

/// What the dumper extracted from a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Dumped<T> {
    /// Nothing was extracted (`Omit`, or `Json` with [`Receiver::Discard`]).
    Nothing,
    /// Decoded JSON body.
    Decoded(T),
    /// Resolved `Location` header.
    Location(Url),
}

impl<T> Dumped<T> {
    fn name(&self) -> &'static str {
        match self {
            Dumped::Nothing => "nothing",
            Dumped::Decoded(_) => "decoded body",
            Dumped::Location(_) => "location",
        }
    }

    /// Take the decoded body.
    pub fn into_decoded(self) -> Result<T> {
        match self {
            Dumped::Decoded(value) => Ok(value),
            other => Err(JenkinsError::DumpMismatch {
                expected: "decoded body",
                actual: other.name(),
            }),
        }
    }

    /// Take the extracted location.
    pub fn into_location(self) -> Result<Url> {
        match self {
            Dumped::Location(url) => Ok(url),
            other => Err(JenkinsError::DumpMismatch {
                expected: "location",
                actual: other.name(),
            }),
        }
    }
}

/// Description of one remote operation.
///
/// Built by the client for a single call and consumed by the [`Processor`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Route relative to the base URL, e.g. `/job/demo`.
    pub route: String,
    /// URL format.
    pub format: ApiFormat,
    /// Optional request body.
    pub body: Option<Bytes>,
    /// Query parameters; keys are unique.
    pub query: BTreeMap<String, String>,
    /// Response interpretation.
    pub dump: DumpMethod,
}

impl ApiRequest {
    /// Create a description from its parts with no body or query.
    pub fn new(method: Method, route: impl Into<String>, format: ApiFormat, dump: DumpMethod) -> Self {
        ApiRequest {
            method,
            route: route.into(),
            format,
            body: None,
            query: BTreeMap::new(),
            dump,
        }
    }

    /// A JSON read: `GET <route>/api/json`, decoding the body.
    pub fn get(route: impl Into<String>) -> Self {
        Self::new(Method::GET, route, ApiFormat::Json, DumpMethod::Json)
    }

    /// A mutating call on the raw route, ignoring the response.
    pub fn post(route: impl Into<String>) -> Self {
        Self::new(Method::POST, route, ApiFormat::Xml, DumpMethod::Omit)
    }

    /// Set a query parameter, replacing any previous value for `key`.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Attach a request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Override the URL format.
    #[must_use]
    pub fn with_format(mut self, format: ApiFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the dump strategy.
    #[must_use]
    pub fn with_dump(mut self, dump: DumpMethod) -> Self {
        self.dump = dump;
        self
    }

    /// True for calls that need a CSRF crumb.
    pub fn is_mutating(&self) -> bool {
        self.method == Method::POST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_method_from_raw() {
        assert_eq!(DumpMethod::try_from(0).unwrap(), DumpMethod::Omit);
        assert_eq!(DumpMethod::try_from(1).unwrap(), DumpMethod::Json);
        assert_eq!(DumpMethod::try_from(2).unwrap(), DumpMethod::Location);

        let err = DumpMethod::try_from(3).unwrap_err();
        assert!(matches!(err, JenkinsError::UnknownDumpMethod(3)));
        assert_eq!(err.kind(), crate::ErrorKind::Construction);
    }

    #[test]
    fn test_query_keys_are_unique() {
        let request = ApiRequest::get("/job/a")
            .with_query("depth", "1")
            .with_query("depth", "2");
        assert_eq!(request.query.len(), 1);
        assert_eq!(request.query["depth"], "2");
    }

    #[test]
    fn test_post_is_mutating() {
        assert!(ApiRequest::post("/job/a/doDelete").is_mutating());
        assert!(!ApiRequest::get("/job/a").is_mutating());
    }

    #[test]
    fn test_dumped_accessors() {
        let url = Url::parse("http://ci/queue/item/1/").unwrap();
        assert_eq!(Dumped::<()>::Location(url.clone()).into_location().unwrap(), url);
        assert_eq!(Dumped::Decoded(5).into_decoded().unwrap(), 5);

        let err = Dumped::<u32>::Nothing.into_decoded().unwrap_err();
        assert!(matches!(
            err,
            JenkinsError::DumpMismatch { expected: "decoded body", actual: "nothing" }
        ));
        assert!(Dumped::Decoded(1).into_location().is_err());
        assert_eq!(DumpMethod::Location.name(), "location");
    }
}
