//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The client describes each call as a plain `HttpRequest` and consumes a plain
//! `HttpResponse`. Anything able to perform a GET can sit in between: the
//! bundled `UreqTransport`, a host application's own stack, or a canned
//! responder in tests. Non-2xx statuses travel back as data; only failing to
//! get any response at all is a transport error.

use crate::config::RequestOptions;
use crate::error::TransportError;

/// A fully resolved GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL including the query string.
    pub url: String,
    /// Headers (already merged over the JSON defaults) and timeout.
    pub options: RequestOptions,
}

impl HttpRequest {
    pub fn headers(&self) -> &[(String, String)] {
        &self.options.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.options
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the network round-trip for a client.
///
/// Implementations must return non-2xx responses as `Ok`; the client decides
/// what counts as failure.
pub trait Transport {
    /// # Errors
    /// The request could not be sent or no response was received.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
