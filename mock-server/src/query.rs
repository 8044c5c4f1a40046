//! Server-side reading of Statamic query parameters.
//!
//! Covers the subset of conditions the client tests exercise; anything else
//! is answered with 400 so a typo in a test shows up immediately.

use std::cmp::Ordering;

use serde_json::{json, Map, Value};

pub const DEFAULT_LIMIT: usize = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub field: String,
    pub condition: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub fields: Option<Vec<String>>,
    pub filters: Vec<FilterClause>,
    pub sort: Vec<(String, bool)>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub max_depth: Option<usize>,
    /// `site` passed as a plain parameter rather than a filter.
    pub site: Option<String>,
}

impl ListQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, String> {
        let mut query = ListQuery::default();
        for (key, value) in pairs {
            if let Some(inner) = key.strip_prefix("filter[").and_then(|k| k.strip_suffix(']')) {
                let (field, condition) = match inner.split_once(':') {
                    Some((field, condition)) => (field, Some(condition.to_string())),
                    None => (inner, None),
                };
                query.filters.push(FilterClause {
                    field: field.to_string(),
                    condition,
                    value: value.clone(),
                });
                continue;
            }
            match key.as_str() {
                "fields" => query.fields = Some(value.split(',').map(str::to_string).collect()),
                "sort" => {
                    query.sort = value
                        .split(',')
                        .map(|f| match f.strip_prefix('-') {
                            Some(field) => (field.to_string(), true),
                            None => (f.to_string(), false),
                        })
                        .collect();
                }
                "page" => query.page = Some(parse_positive(key, value)?),
                "limit" => query.limit = Some(parse_positive(key, value)?),
                "max_depth" => {
                    query.max_depth = Some(value.parse().map_err(|_| format!("invalid max_depth: {value}"))?)
                }
                "site" => query.site = Some(value.clone()),
                _ => {}
            }
        }
        Ok(query)
    }

    /// Filter, sort, paginate and project `records` into a paginated envelope.
    pub fn paginate(&self, records: &[Value], path: &str) -> Result<Value, String> {
        let mut matched = Vec::new();
        for record in records {
            if self.matches(record)? {
                matched.push(record.clone());
            }
        }
        self.sort_records(&mut matched);

        let total = matched.len();
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let page = self.page.unwrap_or(1);
        let last_page = total.div_ceil(limit).max(1);
        let offset = (page - 1) * limit;
        let data: Vec<Value> = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|r| self.project(r))
            .collect();

        let page_url = |n: usize| format!("{path}?page={n}");
        let (from, to) = if data.is_empty() {
            (Value::Null, Value::Null)
        } else {
            (json!(offset + 1), json!(offset + data.len()))
        };
        let meta_links: Vec<Value> = (1..=last_page)
            .map(|n| json!({"url": page_url(n), "label": n.to_string(), "active": n == page}))
            .collect();

        Ok(json!({
            "data": data,
            "links": {
                "first": page_url(1),
                "last": page_url(last_page),
                "prev": (page > 1).then(|| page_url(page - 1)),
                "next": (page < last_page).then(|| page_url(page + 1)),
            },
            "meta": {
                "current_page": page,
                "from": from,
                "last_page": last_page,
                "links": meta_links,
                "path": path,
                "per_page": limit,
                "to": to,
                "total": total,
            }
        }))
    }

    /// Filter only; used by unpaginated listings.
    pub fn filter_records(&self, records: &[Value]) -> Result<Vec<Value>, String> {
        let mut out = Vec::new();
        for record in records {
            if self.matches(record)? {
                out.push(record.clone());
            }
        }
        Ok(out)
    }

    fn matches(&self, record: &Value) -> Result<bool, String> {
        for clause in &self.filters {
            if !clause_matches(record, clause)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn sort_records(&self, records: &mut [Value]) {
        if self.sort.is_empty() {
            return;
        }
        records.sort_by(|a, b| {
            for (field, reverse) in &self.sort {
                let ord = compare_values(a.get(field), b.get(field));
                let ord = if *reverse { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    fn project(&self, record: Value) -> Value {
        let (Some(fields), Value::Object(map)) = (&self.fields, &record) else {
            return record;
        };
        let projected: Map<String, Value> = fields
            .iter()
            .filter_map(|f| map.get(f).map(|v| (f.clone(), v.clone())))
            .collect();
        Value::Object(projected)
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{key} must be a positive integer, got {value}")),
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn clause_matches(record: &Value, clause: &FilterClause) -> Result<bool, String> {
    let field = record.get(&clause.field).filter(|v| !v.is_null());
    let text = field.and_then(as_text);
    let value = clause.value.as_str();
    let matched = match clause.condition.as_deref() {
        None | Some("is") => text.as_deref() == Some(value),
        Some("not") => text.as_deref() != Some(value),
        Some("exists") => field.is_some(),
        Some("doesnt_exist") => field.is_none(),
        Some("contains") => text.is_some_and(|t| t.to_lowercase().contains(&value.to_lowercase())),
        Some("starts_with") => text.is_some_and(|t| t.starts_with(value)),
        Some("ends_with") => text.is_some_and(|t| t.ends_with(value)),
        Some("gt") => compare_text(text.as_deref(), value) == Some(Ordering::Greater),
        Some("lt") => compare_text(text.as_deref(), value) == Some(Ordering::Less),
        Some(other) => return Err(format!("unsupported condition: {other}")),
    };
    Ok(matched)
}

fn compare_text(left: Option<&str>, right: &str) -> Option<Ordering> {
    let left = left?;
    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r),
        _ => Some(left.cmp(right)),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.and_then(as_text), b.and_then(as_text)) {
        (Some(a), Some(b)) => compare_text(Some(&a), &b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Drop children below `max_depth` from a tree of `{depth, children}` nodes.
pub fn prune_tree(nodes: &[Value], max_depth: Option<usize>) -> Vec<Value> {
    nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            let depth = node["depth"].as_u64().unwrap_or(1);
            if let Some(children) = node.get_mut("children") {
                let kept = match max_depth {
                    Some(max) if depth >= max as u64 => Vec::new(),
                    _ => prune_tree(children.as_array().map_or(&[][..], Vec::as_slice), max_depth),
                };
                *children = Value::Array(kept);
            }
            node
        })
        .collect()
}
