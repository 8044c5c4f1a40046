//! Typed client for the Statamic headless CMS REST API.
//!
//! # Overview
//! Turns a structured query description (`Params`) into a Statamic query
//! string, sends it through a pluggable `Transport` and shapes the JSON
//! response into typed records.
//!
//! # Design
//! - `StatamicClient` is stateless between calls: API root, merged request
//!   options and default site are fixed at construction.
//! - Each operation is `build_request` (pure) + transport + `parse_response`,
//!   so the I/O boundary is explicit and hosts may perform it themselves.
//! - Multisite list endpoints (entries, terms, globals) get `site` rewritten
//!   into a `filter[site]` clause without touching the caller's `Params`.
//! - No retries, caching or pagination traversal.
//!
//! ```no_run
//! use statamic_core::{ClientConfig, Condition, Filter, Params, StatamicClient};
//!
//! # fn main() -> Result<(), statamic_core::ApiError> {
//! let client = StatamicClient::new(&ClientConfig::new("https://example.com/api/"))?;
//! let params = Params::new()
//!     .filter(Filter::with_condition("title", Condition::Contains, "rust"))
//!     .sort(statamic_core::Sort::desc("date"))
//!     .limit(10)
//!     .site("en");
//! let page = client.get_entries("blog", &params)?;
//! println!("{} of {}", page.data.len(), page.meta.total);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod params;
pub mod transport;
pub mod types;

pub use client::StatamicClient;
pub use config::{ClientConfig, RequestOptions};
pub use context::ClientProvider;
pub use endpoint::{Endpoint, Shape};
pub use error::{ApiError, ConfigError, RequestError, RequestErrorKind, TransportError};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use params::{build_query, Condition, Filter, OneOrMany, Params, Sort};
pub use transport::UreqTransport;
pub use types::{
    walk, Asset, CollectionTreeNode, Entry, Envelope, Form, Global, Links, Listing, Meta,
    NavigationItem, NavigationTreeNode, Page, Paginated, Term, TreeNode, User,
};
