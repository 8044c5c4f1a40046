//! Error types for the Statamic API client.
//!
//! # Design
//! Three failure families exist. `ConfigError` covers anything wrong with how
//! the client or a query was set up and is reported before any I/O happens.
//! `RequestError` covers a single round-trip going wrong and always carries
//! the resolved URL and the request options so the failure can be diagnosed
//! from the message alone. `ApiError::Usage` is returned when a client is
//! requested from a provider that was never configured.

use thiserror::Error;

use crate::config::RequestOptions;

/// Boxed error produced by a `Transport` implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error returned by every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] RequestError),

    /// The client was accessed without being set up first.
    #[error("{0}")]
    Usage(String),
}

impl ApiError {
    /// True when the server answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Request(e) if e.status() == Some(404))
    }
}

/// Invalid client configuration or query parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API URL provided")]
    MissingBaseUrl,

    #[error("API URL must end with a slash: {0}")]
    MissingTrailingSlash(String),

    #[error("invalid API URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// An extra query parameter reused a name owned by `select`, `filter` or `sort`.
    #[error("query parameter '{0}' is reserved")]
    ReservedParam(String),

    /// An extra query parameter held a value that cannot be stringified.
    #[error("query parameter '{key}' must be a string, number or boolean, got {kind}")]
    NonPrimitiveParam { key: String, kind: &'static str },

    #[error("query parameter '{0}' must be a positive integer")]
    NotPositive(&'static str),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// A single request that failed at any stage of the round-trip.
#[derive(Debug, Error)]
#[error("{kind}\nURL: {url}\n{}", options_json(.options))]
pub struct RequestError {
    pub url: String,
    pub options: RequestOptions,
    #[source]
    pub kind: RequestErrorKind,
}

impl RequestError {
    pub fn new(url: impl Into<String>, options: RequestOptions, kind: RequestErrorKind) -> Self {
        Self {
            url: url.into(),
            options,
            kind,
        }
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            RequestErrorKind::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// What went wrong during a request.
#[derive(Debug, Error)]
pub enum RequestErrorKind {
    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),

    #[error("request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The response parsed but had no `data` member to unwrap.
    #[error("response has no `data` member")]
    MissingData,
}

fn options_json(options: &RequestOptions) -> String {
    serde_json::to_string_pretty(options).unwrap_or_else(|_| format!("{options:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> RequestError {
        RequestError::new(
            "https://cms.test/api/globals",
            RequestOptions::default(),
            RequestErrorKind::Status {
                status,
                body: "Not Found".to_string(),
            },
        )
    }

    #[test]
    fn request_error_message_carries_url_and_options() {
        let msg = status_error(404).to_string();
        assert!(msg.starts_with("request failed with status code 404: Not Found"));
        assert!(msg.contains("URL: https://cms.test/api/globals"));
        assert!(msg.contains("\"headers\""));
    }

    #[test]
    fn not_found_is_detected_through_api_error() {
        assert!(ApiError::from(status_error(404)).is_not_found());
        assert!(!ApiError::from(status_error(500)).is_not_found());
        assert!(!ApiError::from(ConfigError::MissingBaseUrl).is_not_found());
    }

    #[test]
    fn config_errors_pass_through_transparently() {
        let err = ApiError::from(ConfigError::MissingTrailingSlash("https://cms.test/api".into()));
        assert_eq!(err.to_string(), "API URL must end with a slash: https://cms.test/api");
    }
}
