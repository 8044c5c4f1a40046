//! Resource client for the Statamic REST API.
//!
//! # Design
//! `StatamicClient` holds only immutable configuration (API root, merged
//! request options, default site) plus a transport. Every operation is split
//! into `build_request`, which produces an `HttpRequest` without I/O, and
//! `parse_response`, which validates and shapes an `HttpResponse`. The `get_*`
//! methods run the two halves around a single `Transport::execute` call;
//! hosts that do their own I/O can call the halves directly.

use std::borrow::Cow;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::{ParseError, Url};

use crate::config::{parse_base_url, ClientConfig, RequestOptions};
use crate::endpoint::{Endpoint, Shape};
use crate::error::{ApiError, ConfigError, RequestError, RequestErrorKind};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::params::{build_query, Params};
use crate::transport::UreqTransport;
use crate::types::{
    Asset, CollectionTreeNode, Entry, Form, Global, Listing, NavigationTreeNode, Paginated, Term,
    User,
};

/// Client bound to one Statamic API root.
#[derive(Clone)]
pub struct StatamicClient<T = UreqTransport> {
    base_url: Url,
    options: RequestOptions,
    default_site: Option<String>,
    transport: T,
}

impl<T> fmt::Debug for StatamicClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatamicClient")
            .field("base_url", &self.base_url.as_str())
            .field("options", &self.options)
            .field("default_site", &self.default_site)
            .finish_non_exhaustive()
    }
}

impl StatamicClient<UreqTransport> {
    /// Build a client that talks HTTP through `ureq`.
    ///
    /// # Errors
    /// The base URL is empty, lacks a trailing slash or does not parse, or a
    /// configured header is invalid.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T> StatamicClient<T> {
    /// # Errors
    /// Same as `StatamicClient::new`.
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&config.base_url)?;
        let options = config.request_options.merged_over_defaults()?;
        Ok(Self {
            base_url,
            options,
            default_site: config.default_site.clone(),
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn default_site(&self) -> Option<&str> {
        self.default_site.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve `endpoint` against the API root and encode `params`.
    ///
    /// Handles and ids are percent-encoded as single path segments; asset
    /// paths keep their `/` separators. Site-scoped endpoints get the default
    /// site when no site is requested, then have the site rewritten into a
    /// `filter[site]` clause.
    ///
    /// # Errors
    /// The path does not resolve or `params` cannot be encoded.
    pub fn build_request(
        &self,
        endpoint: &Endpoint<'_>,
        params: &Params,
    ) -> Result<HttpRequest, ConfigError> {
        let mut url = self.resolve(endpoint)?;

        let params = self.effective_params(endpoint, params);
        let query = build_query(&params)?;
        if !query.is_empty() {
            url.set_query(Some(&query));
        }

        Ok(HttpRequest {
            url: url.into(),
            options: self.options.clone(),
        })
    }

    fn resolve(&self, endpoint: &Endpoint<'_>) -> Result<Url, ConfigError> {
        let Some(segments) = endpoint.segments() else {
            let path = endpoint.path();
            return self
                .base_url
                .join(&path)
                .map_err(|source| ConfigError::InvalidPath { path, source });
        };
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source: ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn effective_params<'p>(&self, endpoint: &Endpoint<'_>, params: &'p Params) -> Cow<'p, Params> {
        if !endpoint.is_site_scoped() {
            return Cow::Borrowed(params);
        }
        match (params.requested_site(), &self.default_site) {
            (Some(_), _) => Cow::Owned(params.scoped_to_site()),
            (None, Some(site)) => {
                let mut with_site = params.clone();
                with_site.site = Some(site.clone());
                Cow::Owned(with_site.scoped_to_site())
            }
            (None, None) => Cow::Borrowed(params),
        }
    }

    /// Check the status, parse the body and shape it as `R`.
    ///
    /// # Errors
    /// Non-2xx status, a body that is not JSON or does not match `R`, or a
    /// missing `data` member when `shape` is `Unwrapped`.
    pub fn parse_response<R: DeserializeOwned>(
        &self,
        request: &HttpRequest,
        shape: Shape,
        response: HttpResponse,
    ) -> Result<R, ApiError> {
        debug!(url = %request.url, status = response.status, "response received");
        if !response.is_success() {
            return Err(fail(
                request,
                RequestErrorKind::Status {
                    status: response.status,
                    body: response.body,
                },
            ));
        }

        let mut body: Value =
            serde_json::from_str(&response.body).map_err(|e| fail(request, e.into()))?;
        let payload = match shape {
            Shape::Envelope => body,
            Shape::Unwrapped => match body.get_mut("data").map(Value::take) {
                Some(data) => data,
                None => return Err(fail(request, RequestErrorKind::MissingData)),
            },
        };
        serde_json::from_value(payload).map_err(|e| fail(request, e.into()))
    }
}

fn fail(request: &HttpRequest, kind: RequestErrorKind) -> ApiError {
    warn!(url = %request.url, error = %kind, "statamic request failed");
    RequestError::new(request.url.clone(), request.options.clone(), kind).into()
}

impl<T: Transport> StatamicClient<T> {
    fn fetch<R: DeserializeOwned>(&self, endpoint: Endpoint<'_>, params: &Params) -> Result<R, ApiError> {
        let request = self.build_request(&endpoint, params)?;
        debug!(url = %request.url, "GET");
        let response = self
            .transport
            .execute(&request)
            .map_err(|e| fail(&request, RequestErrorKind::Transport(e)))?;
        self.parse_response(&request, endpoint.shape(), response)
    }

    /// GET any path under the API root and return the raw JSON body.
    ///
    /// # Errors
    /// See `build_request` and `parse_response`.
    pub fn get(&self, path: &str, params: &Params) -> Result<Value, ApiError> {
        self.fetch(Endpoint::Raw { path }, params)
    }

    /// Entries of a collection. `site` is applied as a filter.
    pub fn get_entries(&self, collection: &str, params: &Params) -> Result<Paginated<Entry>, ApiError> {
        self.fetch(Endpoint::Entries { collection }, params)
    }

    pub fn get_entry(&self, collection: &str, id: &str, params: &Params) -> Result<Entry, ApiError> {
        self.fetch(Endpoint::Entry { collection, id }, params)
    }

    /// Structure tree of a collection; `params.max_depth` limits its depth.
    pub fn get_collection_tree(
        &self,
        collection: &str,
        params: &Params,
    ) -> Result<Vec<CollectionTreeNode>, ApiError> {
        self.fetch(Endpoint::CollectionTree { collection }, params)
    }

    pub fn get_navigation_tree(
        &self,
        navigation: &str,
        params: &Params,
    ) -> Result<Vec<NavigationTreeNode>, ApiError> {
        self.fetch(Endpoint::NavigationTree { navigation }, params)
    }

    /// Terms of a taxonomy. `site` is applied as a filter.
    pub fn get_taxonomy_terms(&self, taxonomy: &str, params: &Params) -> Result<Paginated<Term>, ApiError> {
        self.fetch(Endpoint::TaxonomyTerms { taxonomy }, params)
    }

    pub fn get_taxonomy_term(&self, taxonomy: &str, slug: &str, params: &Params) -> Result<Term, ApiError> {
        self.fetch(Endpoint::TaxonomyTerm { taxonomy, slug }, params)
    }

    /// All global sets. `site` is applied as a filter.
    pub fn get_globals(&self, params: &Params) -> Result<Listing<Global>, ApiError> {
        self.fetch(Endpoint::Globals, params)
    }

    pub fn get_global(&self, handle: &str, params: &Params) -> Result<Global, ApiError> {
        self.fetch(Endpoint::Global { handle }, params)
    }

    pub fn get_forms(&self, params: &Params) -> Result<Listing<Form>, ApiError> {
        self.fetch(Endpoint::Forms, params)
    }

    pub fn get_form(&self, handle: &str, params: &Params) -> Result<Form, ApiError> {
        self.fetch(Endpoint::Form { handle }, params)
    }

    pub fn get_users(&self, params: &Params) -> Result<Paginated<User>, ApiError> {
        self.fetch(Endpoint::Users, params)
    }

    pub fn get_user(&self, id: &str, params: &Params) -> Result<User, ApiError> {
        self.fetch(Endpoint::User { id }, params)
    }

    pub fn get_assets(&self, container: &str, params: &Params) -> Result<Paginated<Asset>, ApiError> {
        self.fetch(Endpoint::Assets { container }, params)
    }

    /// `path` is the asset's path inside the container and may contain `/`.
    pub fn get_asset(&self, container: &str, path: &str, params: &Params) -> Result<Asset, ApiError> {
        self.fetch(Endpoint::Asset { container, path }, params)
    }
}
