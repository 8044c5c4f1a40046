//! Query parameters and their translation into a query string.
//!
//! # Design
//! `Params` describes one call's field selection, filters, sorting, pagination
//! and site. `Params::to_query_pairs` lowers it into ordered key/value pairs in
//! four passes (select, filter, sort, everything else) and `build_query`
//! form-urlencodes those pairs. Nothing here mutates its input: site scoping
//! returns a new `Params`.
//!
//! Filter keys are repeatable and always appended. Every other key is a
//! singleton and a later occurrence replaces the earlier value in place, so the
//! output order stays fixed for equal inputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// A single value or an ordered list of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    /// Append `value`, turning a single value into a list.
    #[must_use]
    pub fn pushed(self, value: T) -> Self {
        match self {
            OneOrMany::One(first) => OneOrMany::Many(vec![first, value]),
            OneOrMany::Many(mut values) => {
                values.push(value);
                OneOrMany::Many(values)
            }
        }
    }
}

/// Comparator applied by a filter clause. See
/// <https://statamic.dev/conditions> for the server-side semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[serde(rename = "is")]
    Equals,
    #[serde(rename = "not")]
    NotEquals,
    Exists,
    #[serde(rename = "doesnt_exist")]
    DoesNotExist,
    Contains,
    #[serde(rename = "doesnt_contain")]
    DoesNotContain,
    In,
    NotIn,
    StartsWith,
    #[serde(rename = "doesnt_start_with")]
    DoesNotStartWith,
    EndsWith,
    #[serde(rename = "doesnt_end_with")]
    DoesNotEndWith,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "lte")]
    LessThanOrEqual,
    Regex,
    NotRegex,
    IsAlpha,
    IsNumeric,
    #[serde(rename = "is_alpha_numeric")]
    IsAlphanumeric,
    IsUrl,
    IsEmbeddable,
    IsEmail,
    IsAfter,
    IsBefore,
}

impl Condition {
    /// Name used inside `filter[<field>:<condition>]`.
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Equals => "is",
            Condition::NotEquals => "not",
            Condition::Exists => "exists",
            Condition::DoesNotExist => "doesnt_exist",
            Condition::Contains => "contains",
            Condition::DoesNotContain => "doesnt_contain",
            Condition::In => "in",
            Condition::NotIn => "not_in",
            Condition::StartsWith => "starts_with",
            Condition::DoesNotStartWith => "doesnt_start_with",
            Condition::EndsWith => "ends_with",
            Condition::DoesNotEndWith => "doesnt_end_with",
            Condition::GreaterThan => "gt",
            Condition::GreaterThanOrEqual => "gte",
            Condition::LessThan => "lt",
            Condition::LessThanOrEqual => "lte",
            Condition::Regex => "regex",
            Condition::NotRegex => "not_regex",
            Condition::IsAlpha => "is_alpha",
            Condition::IsNumeric => "is_numeric",
            Condition::IsAlphanumeric => "is_alpha_numeric",
            Condition::IsUrl => "is_url",
            Condition::IsEmbeddable => "is_embeddable",
            Condition::IsEmail => "is_email",
            Condition::IsAfter => "is_after",
            Condition::IsBefore => "is_before",
        }
    }
}

/// One `field [condition] value` comparison. Clauses are AND-combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    /// Absent means the server's default equality check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    pub value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            condition: None,
            value: value.into(),
        }
    }

    pub fn with_condition(
        field: impl Into<String>,
        condition: Condition,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            condition: Some(condition),
            value: value.into(),
        }
    }

    fn key(&self) -> String {
        match self.condition {
            Some(condition) => format!("filter[{}:{}]", self.field, condition.as_str()),
            None => format!("filter[{}]", self.field),
        }
    }
}

/// A sort key: a bare field (ascending) or a field with direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sort {
    Field(String),
    Directed { field: String, reverse: bool },
}

impl Sort {
    pub fn desc(field: impl Into<String>) -> Self {
        Sort::Directed {
            field: field.into(),
            reverse: true,
        }
    }

    fn encode(&self) -> String {
        match self {
            Sort::Field(field) => field.clone(),
            Sort::Directed { field, reverse: true } => format!("-{field}"),
            Sort::Directed { field, reverse: false } => field.clone(),
        }
    }
}

impl From<&str> for Sort {
    fn from(field: &str) -> Self {
        Sort::Field(field.to_string())
    }
}

/// Parameters accepted by the Statamic REST API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Fields to return. Only honored by paginated endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<OneOrMany<String>>,
    /// Filters must be allow-listed server side before they take effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<OneOrMany<Filter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<OneOrMany<Sort>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size. Statamic defaults to 25.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Multisite handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Maximum depth of a tree response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// Parameters without a dedicated field, emitted after the known ones in
    /// key order. Values must be strings, numbers or booleans.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

const RESERVED: [&str; 3] = ["select", "filter", "sort"];

/// Pagination keys the API only accepts as integers of at least 1.
const POSITIVE: [&str; 2] = ["page", "limit"];

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn select<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.select = Some(OneOrMany::Many(fields));
        self
    }

    /// Add a filter clause after any existing ones.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.pushed(filter),
            None => OneOrMany::One(filter),
        });
        self
    }

    /// Add a sort key after any existing ones.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<Sort>) -> Self {
        let sort = sort.into();
        self.sort = Some(match self.sort.take() {
            Some(existing) => existing.pushed(sort),
            None => OneOrMany::One(sort),
        });
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The site to scope to: `site`, or an extra `site` parameter when the
    /// typed field is unset.
    pub fn requested_site(&self) -> Option<String> {
        self.site
            .clone()
            .or_else(|| self.extra.get("site").and_then(site_handle))
    }

    /// Re-express the requested site as a trailing `filter[site]` clause.
    ///
    /// List endpoints on a multisite install return every site's records
    /// merged together, so the site has to be filtered on rather than passed
    /// as a parameter. Without a site the result equals `self`.
    #[must_use]
    pub fn scoped_to_site(&self) -> Params {
        let mut scoped = self.clone();
        let Some(site) = self.requested_site() else {
            return scoped;
        };
        scoped.site = None;
        if scoped.extra.get("site").and_then(site_handle).is_some() {
            scoped.extra.remove("site");
        }
        let clause = Filter::new("site", site);
        scoped.filter = Some(match scoped.filter.take() {
            Some(existing) => existing.pushed(clause),
            None => OneOrMany::Many(vec![clause]),
        });
        scoped
    }

    /// Lower into ordered query pairs.
    ///
    /// # Errors
    /// An `extra` entry uses a reserved name or holds a non-primitive value,
    /// or `page` or `limit` is not a positive integer.
    pub fn to_query_pairs(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let mut pairs = QueryPairs::default();

        if let Some(select) = &self.select {
            pairs.set("fields", select.as_slice().join(","));
        }

        if let Some(filter) = &self.filter {
            for clause in filter.as_slice() {
                pairs.append(clause.key(), clause.value.clone());
            }
        }

        if let Some(sort) = &self.sort {
            let encoded: Vec<String> = sort.as_slice().iter().map(Sort::encode).collect();
            pairs.set("sort", encoded.join(","));
        }

        if let Some(page) = self.page {
            pairs.set("page", page.to_string());
        }
        if let Some(limit) = self.limit {
            pairs.set("limit", limit.to_string());
        }
        if let Some(site) = &self.site {
            pairs.set("site", site.clone());
        }
        if let Some(max_depth) = self.max_depth {
            pairs.set("max_depth", max_depth.to_string());
        }
        for (key, value) in &self.extra {
            if RESERVED.contains(&key.as_str()) {
                return Err(ConfigError::ReservedParam(key.clone()));
            }
            pairs.set(key, stringify(key, value)?);
        }

        for key in POSITIVE {
            if let Some(value) = pairs.get(key) {
                if value.parse::<i64>().is_ok_and(|n| n < 1) {
                    return Err(ConfigError::NotPositive(key));
                }
            }
        }

        Ok(pairs.0)
    }
}

fn site_handle(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn stringify(key: &str, value: &Value) -> Result<String, ConfigError> {
    let non_primitive = |kind| ConfigError::NonPrimitiveParam {
        key: key.to_string(),
        kind,
    };
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(non_primitive("null")),
        Value::Array(_) => Err(non_primitive("array")),
        Value::Object(_) => Err(non_primitive("object")),
    }
}

#[derive(Default)]
struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    fn append(&mut self, key: String, value: String) {
        self.0.push((key, value));
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }
}

/// Encode `params` as an `application/x-www-form-urlencoded` query string,
/// without the leading `?`. Empty when nothing is set.
///
/// # Errors
/// See `Params::to_query_pairs`.
pub fn build_query(params: &Params) -> Result<String, ConfigError> {
    let pairs = params.to_query_pairs()?;
    Ok(url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish())
}
