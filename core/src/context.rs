//! Explicit hand-off of a shared client to code that needs one.
//!
//! A `ClientProvider` is passed down to whatever issues requests. Asking an
//! unconfigured provider for its client is a usage error, reported as
//! `ApiError::Usage` instead of silently falling back to some default.

use std::sync::Arc;

use crate::client::StatamicClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::transport::UreqTransport;

pub struct ClientProvider<T = UreqTransport> {
    client: Option<Arc<StatamicClient<T>>>,
}

impl<T> Clone for ClientProvider<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl ClientProvider<UreqTransport> {
    /// # Errors
    /// The configuration is invalid (see `StatamicClient::new`).
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_client(StatamicClient::new(config)?))
    }
}

impl<T> ClientProvider<T> {
    pub fn from_client(client: StatamicClient<T>) -> Self {
        Self {
            client: Some(Arc::new(client)),
        }
    }

    /// A provider with no client behind it.
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// # Errors
    /// `ApiError::Usage` when the provider was never given a client.
    pub fn client(&self) -> Result<Arc<StatamicClient<T>>, ApiError> {
        self.client.clone().ok_or_else(|| {
            ApiError::Usage("client requested from an unconfigured ClientProvider".to_string())
        })
    }
}

impl<T> Default for ClientProvider<T> {
    fn default() -> Self {
        Self::unconfigured()
    }
}
