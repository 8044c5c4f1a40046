//! The resource kinds exposed by the Statamic REST API.
//!
//! Handles and ids are opaque. The client percent-encodes each one as a
//! path segment and leaves validation to the server.

/// How a successful response body is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{data: {...}}` or `{data: [...tree]}`: the client returns `data`.
    Unwrapped,
    /// `{data: [...], links, meta}`: the client returns the envelope.
    Envelope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Entries { collection: &'a str },
    Entry { collection: &'a str, id: &'a str },
    CollectionTree { collection: &'a str },
    NavigationTree { navigation: &'a str },
    TaxonomyTerms { taxonomy: &'a str },
    TaxonomyTerm { taxonomy: &'a str, slug: &'a str },
    Globals,
    Global { handle: &'a str },
    Forms,
    Form { handle: &'a str },
    Users,
    User { id: &'a str },
    Assets { container: &'a str },
    Asset { container: &'a str, path: &'a str },
    /// Any other path, relative to the API root.
    Raw { path: &'a str },
}

impl<'a> Endpoint<'a> {
    /// Unencoded path segments below the API root. `None` for `Raw`, whose
    /// path is resolved as written.
    ///
    /// An asset path contributes one segment per `/`-separated piece.
    pub fn segments(&self) -> Option<Vec<&'a str>> {
        let segments: Vec<&'a str> = match *self {
            Endpoint::Entries { collection } => vec!["collections", collection, "entries"],
            Endpoint::Entry { collection, id } => vec!["collections", collection, "entries", id],
            Endpoint::CollectionTree { collection } => vec!["collections", collection, "tree"],
            Endpoint::NavigationTree { navigation } => vec!["navs", navigation, "tree"],
            Endpoint::TaxonomyTerms { taxonomy } => vec!["taxonomies", taxonomy, "terms"],
            Endpoint::TaxonomyTerm { taxonomy, slug } => vec!["taxonomies", taxonomy, "terms", slug],
            Endpoint::Globals => vec!["globals"],
            Endpoint::Global { handle } => vec!["globals", handle],
            Endpoint::Forms => vec!["forms"],
            Endpoint::Form { handle } => vec!["forms", handle],
            Endpoint::Users => vec!["users"],
            Endpoint::User { id } => vec!["users", id],
            Endpoint::Assets { container } => vec!["assets", container],
            Endpoint::Asset { container, path } => ["assets", container]
                .into_iter()
                .chain(path.split('/').filter(|piece| !piece.is_empty()))
                .collect(),
            Endpoint::Raw { .. } => return None,
        };
        Some(segments)
    }

    /// Path relative to the API root, before percent-encoding.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Raw { path } => (*path).to_string(),
            _ => self.segments().unwrap_or_default().join("/"),
        }
    }

    /// Multisite installs serve these from every site at once, so `site`
    /// has to become a filter.
    pub fn is_site_scoped(&self) -> bool {
        matches!(
            self,
            Endpoint::Entries { .. } | Endpoint::TaxonomyTerms { .. } | Endpoint::Globals
        )
    }

    pub fn shape(&self) -> Shape {
        match self {
            Endpoint::Entries { .. }
            | Endpoint::TaxonomyTerms { .. }
            | Endpoint::Globals
            | Endpoint::Forms
            | Endpoint::Users
            | Endpoint::Assets { .. }
            | Endpoint::Raw { .. } => Shape::Envelope,
            Endpoint::Entry { .. }
            | Endpoint::CollectionTree { .. }
            | Endpoint::NavigationTree { .. }
            | Endpoint::TaxonomyTerm { .. }
            | Endpoint::Global { .. }
            | Endpoint::Form { .. }
            | Endpoint::User { .. }
            | Endpoint::Asset { .. } => Shape::Unwrapped,
        }
    }
}
