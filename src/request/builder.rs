//! Turns call descriptions into transport requests.
//!
//! The builder holds the base URL and credentials. It performs no I/O; its
//! only failure mode is a URL that does not parse, which is always a caller
//! bug and never worth retrying.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use http::Method;
use url::Url;

use super::{ApiFormat, ApiRequest};
use crate::error::{JenkinsError, Result};
use crate::transport::TransportRequest;

const JSON_SUFFIX: &str = "/api/json";
const CRUMB_ISSUER_ROUTE: &str = "/crumbIssuer";

/// Builds authenticated requests against one Jenkins instance.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    authorization: HeaderValue,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    /// Create a builder, validating the base URL.
    ///
    /// # Errors
    ///
    /// Fails if `base_url` does not parse, is not `http`/`https`, or the
    /// credentials cannot be encoded as a header value.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let parsed = parse_url(base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(JenkinsError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let mut authorization = HeaderValue::from_str(&basic_auth(username, password))
            .map_err(|e| JenkinsError::InvalidRequest(format!("credentials: {e}")))?;
        authorization.set_sensitive(true);

        Ok(RequestBuilder {
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL text for a route in the given format.
    pub fn url_string(&self, route: &str, format: ApiFormat) -> String {
        let route = route.trim_end_matches('/');
        match format {
            ApiFormat::Json => format!("{}{}{}", self.base_url, route, JSON_SUFFIX),
            ApiFormat::Xml => format!("{}{}", self.base_url, route),
        }
    }

    /// Build the transport request for a call description.
    ///
    /// Content-Type is left to the caller, which knows the call shape.
    pub fn build(&self, request: &ApiRequest) -> Result<TransportRequest> {
        let mut url = parse_url(&self.url_string(&request.route, request.format))?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        let mut transport = TransportRequest::new(request.method.clone(), url);
        transport.body = request.body.clone();
        self.authorize(&mut transport.headers);
        Ok(transport)
    }

    /// Build the crumb issuer request: `GET /crumbIssuer/api/json`.
    pub fn crumb_request(&self) -> Result<TransportRequest> {
        let url = parse_url(&self.url_string(CRUMB_ISSUER_ROUTE, ApiFormat::Json))?;
        let mut transport = TransportRequest::new(Method::GET, url);
        self.authorize(&mut transport.headers);
        Ok(transport)
    }

    /// Set the Basic `Authorization` header, replacing any previous value.
    pub fn authorize(&self, headers: &mut HeaderMap) {
        headers.insert(AUTHORIZATION, self.authorization.clone());
    }
}

/// Encode `username:password` as an HTTP Basic credential.
pub(crate) fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

fn parse_url(text: &str) -> Result<Url> {
    Url::parse(text).map_err(|source| JenkinsError::InvalidUrl {
        url: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::DumpMethod;

    fn builder() -> RequestBuilder {
        RequestBuilder::new("http://localhost:8080/", "admin", "secret").unwrap()
    }

    #[test]
    fn test_basic_auth_encoding() {
        assert_eq!(basic_auth("admin", "secret"), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_json_route_gets_suffix() {
        let b = builder();
        assert_eq!(b.url_string("/job/a", ApiFormat::Json), "http://localhost:8080/job/a/api/json");
        assert_eq!(b.url_string("/", ApiFormat::Json), "http://localhost:8080/api/json");
        assert_eq!(b.url_string("", ApiFormat::Json), "http://localhost:8080/api/json");
    }

    #[test]
    fn test_xml_route_is_raw() {
        let b = builder();
        assert_eq!(b.url_string("/createItem", ApiFormat::Xml), "http://localhost:8080/createItem");
    }

    #[test]
    fn test_build_applies_query_and_credentials() {
        let request = ApiRequest::get("/job/a").with_query("tree", "builds[id,queueId,url]");
        let built = builder().build(&request).unwrap();

        assert_eq!(built.method, Method::GET);
        assert_eq!(built.url.path(), "/job/a/api/json");
        let pairs: Vec<(String, String)> = built.url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("tree".to_string(), "builds[id,queueId,url]".to_string())]);
        assert_eq!(built.headers[AUTHORIZATION], "Basic YWRtaW46c2VjcmV0");
        assert!(built.body.is_none());
    }

    #[test]
    fn test_build_carries_body() {
        let request = ApiRequest::post("/createItem")
            .with_query("name", "demo")
            .with_body("<project/>");
        let built = builder().build(&request).unwrap();
        assert_eq!(built.method, Method::POST);
        assert_eq!(built.url.as_str(), "http://localhost:8080/createItem?name=demo");
        assert_eq!(built.body.as_deref(), Some(&b"<project/>"[..]));
    }

    #[test]
    fn test_crumb_request() {
        let built = builder().crumb_request().unwrap();
        assert_eq!(built.method, Method::GET);
        assert_eq!(built.url.as_str(), "http://localhost:8080/crumbIssuer/api/json");
        assert!(built.headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_malformed_base_url_is_construction_error() {
        let err = RequestBuilder::new("localhost:8080", "a", "b").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Construction);

        let err = RequestBuilder::new("not a url", "a", "b").unwrap_err();
        assert!(matches!(err, JenkinsError::InvalidUrl { .. }));
    }

    #[test]
    fn test_malformed_route_is_construction_error() {
        let b = RequestBuilder::new("http://localhost:8080", "a", "b").unwrap();
        let request = ApiRequest::new(Method::GET, ":99999/x", ApiFormat::Xml, DumpMethod::Omit);
        let err = b.build(&request).unwrap_err();
        assert!(matches!(err, JenkinsError::InvalidUrl { .. }));
    }
}
