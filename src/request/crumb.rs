//! CSRF crumbs.
//!
//! Jenkins 2.x rejects state-mutating requests that do not carry a crumb:
//! a header whose name and value are handed out by `/crumbIssuer/api/json`,
//!
//! ```text
//! {"_class":"hudson.security.csrf.DefaultCrumbIssuer",
//!  "crumb":"abc123","crumbRequestField":"Jenkins-Crumb"}
//! ```
//!
//! A crumb is bound to the session cookie it was issued with, so the
//! processor fetches a fresh one for every mutating call instead of caching.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

use crate::error::{JenkinsError, Result};

const FIELD_KEY: &str = "crumbRequestField";
const VALUE_KEY: &str = "crumb";

/// A CSRF header issued by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    /// Header name, usually `Jenkins-Crumb`.
    pub field: String,
    /// Header value.
    pub value: String,
}

impl Crumb {
    /// Extract the crumb from a decoded crumb issuer response.
    ///
    /// # Errors
    ///
    /// [`JenkinsError::MissingCrumbField`] when either field is absent or not
    /// a string, which usually means CSRF protection is disabled.
    pub fn from_issuer(response: &Map<String, Value>) -> Result<Self> {
        let field = string_field(response, FIELD_KEY)?;
        let value = string_field(response, VALUE_KEY)?;
        Ok(Crumb { field, value })
    }

    /// Add the crumb header to an outgoing request.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        let name = HeaderName::from_bytes(self.field.as_bytes())
            .map_err(|e| JenkinsError::InvalidCrumb(format!("{}: {e}", self.field)))?;
        let value = HeaderValue::from_str(&self.value)
            .map_err(|e| JenkinsError::InvalidCrumb(format!("{}: {e}", self.field)))?;
        headers.insert(name, value);
        Ok(())
    }
}

fn string_field(response: &Map<String, Value>, key: &'static str) -> Result<String> {
    response
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(JenkinsError::MissingCrumbField(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_from_issuer() {
        let crumb = Crumb::from_issuer(&map(json!({
            "_class": "hudson.security.csrf.DefaultCrumbIssuer",
            "crumbRequestField": "Jenkins-Crumb",
            "crumb": "abc123"
        })))
        .unwrap();
        assert_eq!(crumb.field, "Jenkins-Crumb");
        assert_eq!(crumb.value, "abc123");
    }

    #[test]
    fn test_missing_fields() {
        let err = Crumb::from_issuer(&map(json!({ "crumb": "abc123" }))).unwrap_err();
        assert!(matches!(err, JenkinsError::MissingCrumbField("crumbRequestField")));

        let err = Crumb::from_issuer(&map(json!({ "crumbRequestField": "Jenkins-Crumb" }))).unwrap_err();
        assert!(matches!(err, JenkinsError::MissingCrumbField("crumb")));

        let err = Crumb::from_issuer(&map(json!({ "crumbRequestField": 1, "crumb": "x" }))).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Protocol);
    }

    #[test]
    fn test_apply() {
        let crumb = Crumb {
            field: "Jenkins-Crumb".to_string(),
            value: "abc123".to_string(),
        };
        let mut headers = HeaderMap::new();
        crumb.apply(&mut headers).unwrap();
        assert_eq!(headers["jenkins-crumb"], "abc123");
    }

    #[test]
    fn test_apply_rejects_bad_header_name() {
        let crumb = Crumb {
            field: "Bad Header".to_string(),
            value: "abc".to_string(),
        };
        let err = crumb.apply(&mut HeaderMap::new()).unwrap_err();
        assert!(matches!(err, JenkinsError::InvalidCrumb(_)));
    }
}
