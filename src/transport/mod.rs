//! HTTP transport seam.
//!
//! The request pipeline never talks to an HTTP library directly. It hands a
//! [`TransportRequest`] to a [`Transport`] and gets back a fully buffered
//! [`TransportResponse`]. The default implementation is [`ReqwestTransport`];
//! tests and embedders may plug in their own.
//!
//! # Contract
//!
//! | Concern | Requirement |
//! |---------|-------------|
//! | Redirects | never followed; 3xx responses are returned as-is |
//! | Body | read to the end before returning, so the connection goes back to the pool |
//! | Cookies | kept in a jar shared by every request of the transport |
//! | Concurrency | `send` may be called from many tasks at once |

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::Result;

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

/// A ready-to-send HTTP request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, query string included.
    pub url: Url,
    /// Request headers, credentials included.
    pub headers: HeaderMap,
    /// Optional request body.
    pub body: Option<Bytes>,
}

impl TransportRequest {
    /// Create a body-less request with no headers.
    pub fn new(method: Method, url: Url) -> Self {
        TransportRequest {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// A completed HTTP response with its body fully read.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response with an empty body and no headers.
    pub fn new(status: StatusCode) -> Self {
        TransportResponse {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// `Location` header as text, if present and valid UTF-8.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(http::header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

/// Executes single HTTP exchanges.
///
/// Implementations must be safe to share between tasks; connection pooling
/// and cookie storage are their own business.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the buffered response.
    ///
    /// Only failures to obtain a response are errors; any status code,
    /// including 3xx/4xx/5xx, is a successful exchange.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}
