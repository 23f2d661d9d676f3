//! Response interpretation.
//!
//! Jenkins answers in several ways depending on the endpoint: JSON documents
//! for reads, bare `200`/`302` for form actions, and `201 Created` with a
//! `Location` header pointing at a queue item when a build is triggered.
//! The [`Dumper`] checks the status a [`DumpMethod`] expects and extracts
//! the matching payload.
//!
//! | Method | Required status | Payload |
//! |--------|-----------------|---------|
//! | [`DumpMethod::Omit`] | any | nothing |
//! | [`DumpMethod::Json`] | `200 OK` | decoded body, unless [`Receiver::Discard`] |
//! | [`DumpMethod::Location`] | `201 Created` | resolved `Location` URL |

use http::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use super::{DumpMethod, Dumped, Receiver};
use crate::error::{JenkinsError, Result};
use crate::transport::TransportResponse;

/// Interprets responses according to a [`DumpMethod`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Dumper {
    debug: bool,
}

impl Dumper {
    /// Create a dumper; with `debug` set, JSON bodies are logged verbatim.
    pub fn new(debug: bool) -> Self {
        Dumper { debug }
    }

    /// Interpret `response`, received for a request to `url`.
    ///
    /// The response body is already fully buffered by the transport, so the
    /// connection has been released whatever the outcome here.
    pub fn dump<T: DeserializeOwned>(
        &self,
        url: &Url,
        response: TransportResponse,
        method: DumpMethod,
        receiver: Receiver,
    ) -> Result<Dumped<T>> {
        match method {
            DumpMethod::Omit => Ok(Dumped::Nothing),
            DumpMethod::Json => self.json(url, response, receiver),
            DumpMethod::Location => self.location(url, response),
        }
    }

    fn json<T: DeserializeOwned>(
        &self,
        url: &Url,
        response: TransportResponse,
        receiver: Receiver,
    ) -> Result<Dumped<T>> {
        expect_status(url, &response, StatusCode::OK)?;

        if self.debug {
            tracing::info!(
                url = %url,
                body = %String::from_utf8_lossy(&response.body),
                "response body"
            );
        }

        match receiver {
            Receiver::Discard => Ok(Dumped::Nothing),
            Receiver::Decode => serde_json::from_slice(&response.body)
                .map(Dumped::Decoded)
                .map_err(|source| JenkinsError::Decode {
                    url: url.to_string(),
                    source,
                }),
        }
    }

    fn location<T>(&self, url: &Url, response: TransportResponse) -> Result<Dumped<T>> {
        expect_status(url, &response, StatusCode::CREATED)?;

        let raw = response
            .headers
            .get(http::header::LOCATION)
            .ok_or_else(|| JenkinsError::MissingLocation {
                url: url.to_string(),
            })?;

        let text = raw.to_str().map_err(|e| JenkinsError::InvalidLocation {
            location: String::from_utf8_lossy(raw.as_bytes()).into_owned(),
            reason: e.to_string(),
        })?;

        let location = url.join(text).map_err(|e| JenkinsError::InvalidLocation {
            location: text.to_string(),
            reason: e.to_string(),
        })?;

        if self.debug {
            tracing::info!(url = %url, location = %location, "response location");
        }

        Ok(Dumped::Location(location))
    }
}

fn expect_status(url: &Url, response: &TransportResponse, expected: StatusCode) -> Result<()> {
    if response.status == expected {
        return Ok(());
    }
    Err(JenkinsError::UnexpectedStatus {
        url: url.to_string(),
        status: response.status,
        location: response.location().map(str::to_string),
    })
}
