//! Response shapes returned by the Statamic REST API.
//!
//! # Design
//! The API documents only part of what it returns, and blueprints add
//! arbitrary fields to entries, terms and globals. Every record therefore
//! names the fields the client relies on and collects the rest in a flattened
//! `extra` map, so unknown fields survive a round-trip without `Value`-typed
//! records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped fields of a record.
pub type Extra = Map<String, Value>;

/// `{ "data": ... }` wrapper around single records and trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Page of records with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub links: Links,
    pub meta: Meta,
}

/// Unpaginated list. `links`/`meta` are kept if the server sends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> Listing<T> {
    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub first: Option<String>,
    pub last: Option<String>,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub current_page: u64,
    /// Null on an empty page.
    pub from: Option<u64>,
    pub last_page: u64,
    #[serde(default)]
    pub links: Vec<PageLink>,
    pub path: String,
    pub per_page: u64,
    pub to: Option<u64>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Entry {
    /// String-valued blueprint field, e.g. `title` or `slug`.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(Value::as_str)
    }
}

/// Display view of a tree node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// One node of a collection's structure tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionTreeNode {
    pub entry: Entry,
    pub depth: u32,
    #[serde(default)]
    pub page: Page,
    #[serde(default)]
    pub children: Vec<CollectionTreeNode>,
}

/// Navigation items that link to entries carry the entry's fields in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// One node of a navigation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationTreeNode {
    pub item: NavigationItem,
    pub depth: u32,
    #[serde(default)]
    pub page: Page,
    #[serde(default)]
    pub children: Vec<NavigationTreeNode>,
}

/// Nodes that form an ordered forest.
pub trait TreeNode: Sized {
    fn children(&self) -> &[Self];
    fn depth(&self) -> u32;
}

impl TreeNode for CollectionTreeNode {
    fn children(&self) -> &[Self] {
        &self.children
    }

    fn depth(&self) -> u32 {
        self.depth
    }
}

impl TreeNode for NavigationTreeNode {
    fn children(&self) -> &[Self] {
        &self.children
    }

    fn depth(&self) -> u32 {
        self.depth
    }
}

/// Depth-first, pre-order walk over a forest in document order.
pub fn walk<N: TreeNode>(forest: &[N]) -> Walk<'_, N> {
    Walk {
        stack: forest.iter().rev().collect(),
    }
}

pub struct Walk<'a, N> {
    stack: Vec<&'a N>,
}

impl<'a, N: TreeNode> Iterator for Walk<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub edit_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub entries_count: Option<u64>,
    #[serde(default)]
    pub is_term: Option<bool>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub updated_by: Option<Author>,
    #[serde(default)]
    pub taxonomy: Option<Taxonomy>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub handle: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Global {
    pub handle: String,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub handle: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    /// `[]` when the form has no fields, otherwise an object keyed by field
    /// handle.
    #[serde(default)]
    pub fields: Value,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Form {
    /// Field handles in key order.
    pub fn field_handles(&self) -> Vec<&str> {
        match &self.fields {
            Value::Object(fields) => fields.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, depth: u32, children: Vec<CollectionTreeNode>) -> CollectionTreeNode {
        CollectionTreeNode {
            entry: Entry {
                id: id.to_string(),
                extra: Extra::new(),
            },
            depth,
            page: Page::default(),
            children,
        }
    }

    #[test]
    fn unknown_entry_fields_are_kept() {
        let entry: Entry =
            serde_json::from_value(json!({"id": "e1", "title": "Home", "blocks": [1, 2]})).unwrap();
        assert_eq!(entry.id, "e1");
        assert_eq!(entry.str_field("title"), Some("Home"));
        assert_eq!(entry.extra["blocks"], json!([1, 2]));
        assert_eq!(serde_json::to_value(&entry).unwrap()["blocks"], json!([1, 2]));
    }

    #[test]
    fn paginated_meta_with_empty_page() {
        let page: Paginated<Entry> = serde_json::from_value(json!({
            "data": [],
            "links": {"first": "https://cms.test/api/x?page=1", "last": null, "next": null, "prev": null},
            "meta": {
                "current_page": 1, "from": null, "last_page": 1, "links": [],
                "path": "https://cms.test/api/x", "per_page": 25, "to": null, "total": 0
            }
        }))
        .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total, 0);
        assert_eq!(page.meta.from, None);
    }

    #[test]
    fn listing_tolerates_missing_metadata() {
        let listing: Listing<Global> =
            serde_json::from_value(json!({"data": [{"handle": "settings"}]})).unwrap();
        assert!(listing.meta.is_none());
        assert_eq!(listing.into_data()[0].handle, "settings");
    }

    #[test]
    fn form_fields_may_be_empty_array() {
        let empty: Form = serde_json::from_value(json!({"handle": "c", "fields": []})).unwrap();
        assert!(empty.field_handles().is_empty());

        let form: Form = serde_json::from_value(json!({
            "handle": "contact",
            "fields": {"name": {"type": "text"}, "email": {"type": "text"}}
        }))
        .unwrap();
        assert_eq!(form.field_handles(), vec!["email", "name"]);
    }

    #[test]
    fn walk_is_pre_order() {
        let forest = vec![
            node("a", 1, vec![node("a1", 2, vec![node("a1x", 3, vec![])]), node("a2", 2, vec![])]),
            node("b", 1, vec![]),
        ];
        let ids: Vec<&str> = walk(&forest).map(|n| n.entry.id.as_str()).collect();
        assert_eq!(ids, ["a", "a1", "a1x", "a2", "b"]);
        assert_eq!(walk(&forest).map(TreeNode::depth).max(), Some(3));
    }
}
