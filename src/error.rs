//! Error types for the Jenkins client.
//!
//! Every failure a call can produce is a [`JenkinsError`]. Errors are grouped
//! into an [`ErrorKind`] so callers can decide on their own retry policy; the
//! client itself never retries.
//!
//! | Kind | Typical cause | Retrying helps? |
//! |------|---------------|-----------------|
//! | [`ErrorKind::Construction`] | malformed URL, bad call description | never |
//! | [`ErrorKind::Transport`] | DNS, refused connection, deadline, cancel | sometimes |
//! | [`ErrorKind::Protocol`] | unexpected status, bad `Location` | rarely |
//! | [`ErrorKind::Decode`] | body does not match the expected schema | never |
//! | [`ErrorKind::NotFound`] | queue id absent from the build list | caller decides |
//! | [`ErrorKind::Crumb`] | CSRF crumb could not be obtained | rarely |

use http::StatusCode;
use thiserror::Error;

/// Coarse classification of a [`JenkinsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller bug: the request could not even be built.
    Construction,
    /// The HTTP exchange itself failed or was cut short.
    Transport,
    /// The server answered, but not the way the call expected.
    Protocol,
    /// The body could not be decoded into the target type.
    Decode,
    /// A valid negative outcome, e.g. a queue id with no build.
    NotFound,
    /// The CSRF crumb could not be fetched or was malformed.
    Crumb,
}

/// Errors returned by the Jenkins client.
#[derive(Debug, Error)]
pub enum JenkinsError {
    /// A URL could not be parsed.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },

    /// The base URL does not use `http` or `https`.
    #[error("unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    /// The call description or its arguments are invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A raw dump method discriminant did not name a known strategy.
    #[error("unknown response dump method {0}")]
    UnknownDumpMethod(u8),

    /// The dumper produced a different kind of value than the caller asked for.
    #[error("response dump mismatch: expected {expected}, got {actual}")]
    DumpMismatch {
        /// What the caller asked for.
        expected: &'static str,
        /// What the dumper produced.
        actual: &'static str,
    },

    /// Configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The call deadline passed before the exchange completed.
    #[error("deadline exceeded")]
    Timeout,

    /// The call was cancelled by its caller.
    #[error("request cancelled")]
    Cancelled,

    /// The server replied with a status the dump strategy does not accept.
    #[error("{url}: unexpected response status {status}{}", location_suffix(.location))]
    UnexpectedStatus {
        /// Requested URL.
        url: String,
        /// Status line, e.g. `403 Forbidden`.
        status: StatusCode,
        /// `Location` header, when the server sent one.
        location: Option<String>,
    },

    /// A `201 Created` response carried no `Location` header.
    #[error("{url}: response has no Location header")]
    MissingLocation {
        /// Requested URL.
        url: String,
    },

    /// The `Location` header could not be read or resolved.
    #[error("invalid Location header '{location}': {reason}")]
    InvalidLocation {
        /// Raw header value.
        location: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A build-invocation location did not point at a queue item.
    #[error("location '{0}' does not match 'queue/item/<id>/'")]
    InvalidQueueLocation(String),

    /// The redirect chain was longer than the configured limit.
    #[error("{url}: stopped after {limit} redirects")]
    TooManyRedirects {
        /// Last requested URL.
        url: String,
        /// Configured hop limit.
        limit: usize,
    },

    /// The crumb issuer answered without one of the expected fields.
    #[error("crumb issuer response has no string field '{0}'")]
    MissingCrumbField(&'static str),

    /// The crumb could not be turned into a request header.
    #[error("invalid crumb header: {0}")]
    InvalidCrumb(String),

    /// Obtaining the CSRF crumb failed; the mutating request was not sent.
    #[error("failed to obtain CSRF crumb: {0}")]
    Crumb(#[source] Box<JenkinsError>),

    /// The response body could not be decoded.
    #[error("{url}: failed to decode response body: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },

    /// A build id in the build list was not numeric.
    #[error("build id '{0}' is not a number")]
    InvalidBuildId(String),

    /// No build of `job` was started from queue item `queue_id`.
    #[error("build for job '{job}' with queue id {queue_id} was not found")]
    BuildNotFound {
        /// Job name.
        job: String,
        /// Queue id that was searched for.
        queue_id: u64,
    },
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, JenkinsError>;

fn location_suffix(location: &Option<String>) -> String {
    match location {
        Some(location) => format!(" (location: {location})"),
        None => String::new(),
    }
}

impl JenkinsError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            JenkinsError::InvalidUrl { .. }
            | JenkinsError::UnsupportedScheme(_)
            | JenkinsError::InvalidRequest(_)
            | JenkinsError::UnknownDumpMethod(_)
            | JenkinsError::DumpMismatch { .. }
            | JenkinsError::Config(_) => ErrorKind::Construction,
            JenkinsError::Transport(_) | JenkinsError::Timeout | JenkinsError::Cancelled => {
                ErrorKind::Transport
            }
            JenkinsError::UnexpectedStatus { .. }
            | JenkinsError::MissingLocation { .. }
            | JenkinsError::InvalidLocation { .. }
            | JenkinsError::InvalidQueueLocation(_)
            | JenkinsError::TooManyRedirects { .. }
            | JenkinsError::MissingCrumbField(_)
            | JenkinsError::InvalidCrumb(_) => ErrorKind::Protocol,
            JenkinsError::Decode { .. } | JenkinsError::InvalidBuildId(_) => ErrorKind::Decode,
            JenkinsError::BuildNotFound { .. } => ErrorKind::NotFound,
            JenkinsError::Crumb(_) => ErrorKind::Crumb,
        }
    }

    /// True for domain "not found" outcomes.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// HTTP status of an unexpected response, looking through crumb failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            JenkinsError::UnexpectedStatus { status, .. } => Some(*status),
            JenkinsError::Crumb(inner) => inner.status(),
            _ => None,
        }
    }
}
