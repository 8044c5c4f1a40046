//! Client configuration captured once at construction time.
//!
//! # Design
//! `ClientConfig` is plain data and deserializes from JSON/TOML-like sources,
//! or is read from `STATAMIC_API_URL` / `STATAMIC_DEFAULT_SITE`. Validation
//! happens when a client is built from it, so a bad base URL fails before any
//! request is attempted.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const API_URL_ENV: &str = "STATAMIC_API_URL";
pub const DEFAULT_SITE_ENV: &str = "STATAMIC_DEFAULT_SITE";

/// Headers every request starts from; configured headers are merged on top.
pub const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Accept", "application/json"),
    ("Content-Type", "application/json"),
];

/// Settings for a `StatamicClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, for example `https://example.com/api/`. Must end with `/`.
    pub base_url: String,
    #[serde(default)]
    pub request_options: RequestOptions,
    /// Site handle applied to site-scoped endpoints when a call leaves
    /// `site` unset. Only meaningful on multisite installs.
    #[serde(default)]
    pub default_site: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_options: RequestOptions::default(),
            default_site: None,
        }
    }

    #[must_use]
    pub fn with_default_site(mut self, site: impl Into<String>) -> Self {
        self.default_site = Some(site.into());
        self
    }

    #[must_use]
    pub fn with_request_options(mut self, options: RequestOptions) -> Self {
        self.request_options = options;
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnv` when `STATAMIC_API_URL` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(API_URL_ENV)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnv(API_URL_ENV))?;
        let default_site = lookup(DEFAULT_SITE_ENV).filter(|v| !v.is_empty());
        Ok(Self {
            base_url,
            request_options: RequestOptions::default(),
            default_site,
        })
    }
}

/// Options attached to every request a client sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Per-request timeout in milliseconds, enforced by the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl RequestOptions {
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Merge these options over the JSON defaults.
    ///
    /// Headers are matched case-insensitively: a configured header replaces a
    /// default of the same name in place, new names are appended in order.
    pub fn merged_over_defaults(&self) -> Result<RequestOptions, ConfigError> {
        let mut headers: Vec<(String, String)> = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        for (name, value) in &self.headers {
            validate_header(name, value)?;
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some(existing) => *existing = (name.clone(), value.clone()),
                None => headers.push((name.clone(), value.clone())),
            }
        }

        Ok(RequestOptions {
            headers,
            timeout_ms: self.timeout_ms,
        })
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidHeader {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if name.is_empty() {
        return Err(invalid("empty name"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
    {
        return Err(invalid("name contains characters outside the token set"));
    }
    if value.bytes().any(|b| b == b'\r' || b == b'\n') {
        return Err(invalid("value contains a line break"));
    }
    Ok(())
}

/// Check the base URL and parse it.
///
/// # Errors
/// Empty input, a missing trailing slash, or an unparsable URL.
pub fn parse_base_url(base_url: &str) -> Result<Url, ConfigError> {
    if base_url.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }
    if !base_url.ends_with('/') {
        return Err(ConfigError::MissingTrailingSlash(base_url.to_string()));
    }
    Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })
}
