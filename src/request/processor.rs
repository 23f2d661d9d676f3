//! The single entry point every API call goes through.
//!
//! The [`Processor`] owns the transport (connection pool and cookie jar),
//! the [`RequestBuilder`] and the [`Dumper`]. It offers three call shapes:
//!
//! | Shape | Content-Type | Crumb |
//! |-------|--------------|-------|
//! | [`Processor::get_json`] | `application/json` | no |
//! | [`Processor::post`] | none | yes |
//! | [`Processor::post_xml`] | `application/xml` | yes |
//!
//! # Redirects
//!
//! The transport never follows redirects. The processor does, so that Basic
//! credentials are put back on every hop; generic HTTP stacks drop them as
//! soon as a redirect changes host. `303`, and `301`/`302` answering a POST,
//! continue as a body-less `GET`; `307`/`308` replay method and body.
//!
//! # Failures
//!
//! Nothing is retried here. A crumb failure aborts the call before the
//! mutating request leaves the process. Timeouts, cancellation and connection
//! errors during the crumb fetch surface as themselves, not as crumb errors.

use std::sync::Arc;

use http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use super::{ApiRequest, CallContext, Crumb, DumpMethod, Dumped, Dumper, Receiver, RequestBuilder};
use crate::client::ClientConfig;
use crate::error::{ErrorKind, JenkinsError, Result};
use crate::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};

const JSON_CONTENT_TYPE: &str = "application/json";
const XML_CONTENT_TYPE: &str = "application/xml";

/// Builds, sends and interprets every request of a client.
pub struct Processor {
    transport: Arc<dyn Transport>,
    builder: RequestBuilder,
    dumper: Dumper,
    max_redirects: usize,
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("builder", &self.builder)
            .field("dumper", &self.dumper)
            .field("max_redirects", &self.max_redirects)
            .finish_non_exhaustive()
    }
}

impl Processor {
    /// Create a processor with the default `reqwest` transport.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a processor on top of a custom transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let builder = RequestBuilder::new(&config.base_url, &config.username, &config.password)?;
        Ok(Processor {
            transport,
            builder,
            dumper: Dumper::new(config.debug),
            max_redirects: config.max_redirects,
        })
    }

    /// The request builder in use.
    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// JSON read: no crumb, `Content-Type: application/json`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        api: &ApiRequest,
        receiver: Receiver,
    ) -> Result<Dumped<T>> {
        let mut request = self.builder.build(api)?;
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        self.process(ctx, api, request, receiver).await
    }

    /// Generic mutating call: crumb first, no forced content type.
    pub async fn post<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        api: &ApiRequest,
        receiver: Receiver,
    ) -> Result<Dumped<T>> {
        let mut request = self.builder.build(api)?;
        self.set_crumb(ctx, &mut request).await?;
        self.process(ctx, api, request, receiver).await
    }

    /// XML upload: crumb first, `Content-Type: application/xml`.
    pub async fn post_xml<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        api: &ApiRequest,
        receiver: Receiver,
    ) -> Result<Dumped<T>> {
        let mut request = self.builder.build(api)?;
        self.set_crumb(ctx, &mut request).await?;
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));
        self.process(ctx, api, request, receiver).await
    }

    /// Ask the crumb issuer for a fresh crumb.
    pub async fn fetch_crumb(&self, ctx: &CallContext) -> Result<Crumb> {
        let request = self.builder.crumb_request()?;
        tracing::debug!(url = %request.url, "fetching crumb");

        let (url, response) = self.execute(ctx, request).await?;
        let issued: Map<String, Value> = self
            .dumper
            .dump(&url, response, DumpMethod::Json, Receiver::Decode)?
            .into_decoded()?;
        Crumb::from_issuer(&issued)
    }

    async fn set_crumb(&self, ctx: &CallContext, request: &mut TransportRequest) -> Result<()> {
        let crumb = self.fetch_crumb(ctx).await.map_err(crumb_failure)?;
        crumb.apply(&mut request.headers).map_err(crumb_failure)
    }

    async fn process<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        api: &ApiRequest,
        request: TransportRequest,
        receiver: Receiver,
    ) -> Result<Dumped<T>> {
        tracing::debug!(
            method = %api.method,
            route = %api.route,
            dump = api.dump.name(),
            "processing call"
        );
        let (url, response) = self.execute(ctx, request).await?;
        self.dumper.dump(&url, response, api.dump, receiver)
    }

    /// Send `request`, following redirects. Returns the final URL with its response.
    async fn execute(
        &self,
        ctx: &CallContext,
        mut request: TransportRequest,
    ) -> Result<(Url, TransportResponse)> {
        let mut hops = 0;
        loop {
            tracing::debug!(method = %request.method, url = %request.url, "sending request");
            let response = ctx.run(self.transport.send(request.clone())).await?;

            let Some(next) = self.redirect(&request, &response)? else {
                return Ok((request.url, response));
            };
            if hops == self.max_redirects {
                return Err(JenkinsError::TooManyRedirects {
                    url: request.url.to_string(),
                    limit: self.max_redirects,
                });
            }
            hops += 1;

            tracing::debug!(
                status = %response.status,
                from = %request.url,
                to = %next.url,
                "following redirect"
            );
            request = next;
        }
    }

    /// The follow-up request for a redirect response, if `response` is one.
    fn redirect(
        &self,
        request: &TransportRequest,
        response: &TransportResponse,
    ) -> Result<Option<TransportRequest>> {
        let replay = match response.status {
            StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT => true,
            StatusCode::SEE_OTHER => request.method == Method::HEAD,
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => request.method != Method::POST,
            _ => return Ok(None),
        };
        let Some(location) = response.location() else {
            return Ok(None);
        };

        let url = request
            .url
            .join(location)
            .map_err(|e| JenkinsError::InvalidLocation {
                location: location.to_string(),
                reason: e.to_string(),
            })?;

        let mut next = TransportRequest::new(request.method.clone(), url);
        next.headers = request.headers.clone();
        if replay {
            next.body = request.body.clone();
        } else {
            next.method = Method::GET;
            next.headers.remove(CONTENT_TYPE);
            next.headers.remove(CONTENT_LENGTH);
        }
        self.builder.authorize(&mut next.headers);
        Ok(Some(next))
    }
}

/// Transport failures keep their identity; anything else the issuer did wrong
/// is reported as a crumb failure.
fn crumb_failure(error: JenkinsError) -> JenkinsError {
    match error.kind() {
        ErrorKind::Transport => error,
        _ => JenkinsError::Crumb(Box::new(error)),
    }
}
