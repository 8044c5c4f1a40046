//! In-memory content served by the mock API: a small two-site install
//! (`en` and `fr`) with pages, a blog, tags, a navigation, globals, forms,
//! users and an image container.

use std::collections::BTreeMap;

use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct Fixtures {
    pub collections: BTreeMap<String, Vec<Value>>,
    pub collection_trees: BTreeMap<String, Vec<Value>>,
    pub navigations: BTreeMap<String, Vec<Value>>,
    pub taxonomies: BTreeMap<String, Vec<Value>>,
    pub globals: Vec<Value>,
    pub forms: Vec<Value>,
    pub users: Vec<Value>,
    pub assets: BTreeMap<String, Vec<Value>>,
}

impl Fixtures {
    pub fn find_entry(&self, collection: &str, id: &str) -> Option<&Value> {
        find_by(self.collections.get(collection)?, "id", id)
    }

    pub fn find_term(&self, taxonomy: &str, slug: &str) -> Option<&Value> {
        find_by(self.taxonomies.get(taxonomy)?, "slug", slug)
    }

    pub fn find_global(&self, handle: &str, site: Option<&str>) -> Option<&Value> {
        let site = site.unwrap_or("en");
        self.globals
            .iter()
            .find(|g| g["handle"] == handle && g["site"] == site)
    }

    pub fn find_form(&self, handle: &str) -> Option<&Value> {
        find_by(&self.forms, "handle", handle)
    }

    pub fn find_user(&self, id: &str) -> Option<&Value> {
        find_by(&self.users, "id", id)
    }

    pub fn find_asset(&self, container: &str, path: &str) -> Option<&Value> {
        find_by(self.assets.get(container)?, "path", path)
    }
}

fn find_by<'a>(records: &'a [Value], key: &str, value: &str) -> Option<&'a Value> {
    records.iter().find(|r| r[key] == value)
}

fn entry(collection: &str, id: &str, site: &str, title: &str, slug: &str, date: &str) -> Value {
    json!({
        "id": id,
        "collection": {"handle": collection, "title": collection},
        "site": site,
        "title": title,
        "slug": slug,
        "date": date,
        "published": true,
        "url": format!("/{slug}"),
        "api_url": format!("/api/collections/{collection}/entries/{id}"),
    })
}

fn page(entry: &Value, depth: u64) -> Value {
    json!({"title": entry["title"], "url": entry["url"], "depth": depth, "id": entry["id"]})
}

fn term(slug: &str, title: &str, site: &str, count: u64) -> Value {
    json!({
        "id": format!("tags::{slug}"),
        "slug": slug,
        "title": title,
        "site": site,
        "locale": site,
        "entries_count": count,
        "is_term": true,
        "url": format!("/tags/{slug}"),
        "api_url": format!("/api/taxonomies/tags/terms/{slug}"),
        "taxonomy": {"handle": "tags", "title": "Tags"},
        "updated_by": {"id": 1, "name": "Jane", "email": "jane@example.com"},
    })
}

pub fn seed() -> Fixtures {
    let pages = vec![
        entry("pages", "home", "en", "Home", "", "2024-01-01"),
        entry("pages", "about", "en", "About", "about", "2024-01-02"),
        entry("pages", "contact", "en", "Contact", "contact", "2024-01-03"),
        entry("pages", "accueil", "fr", "Accueil", "", "2024-01-01"),
    ];
    let blog = vec![
        entry("blog", "p1", "en", "Hello world", "hello-world", "2024-03-01"),
        entry("blog", "p2", "en", "Rust clients", "rust-clients", "2024-04-15"),
        entry("blog", "p3", "fr", "Bonjour", "bonjour", "2024-03-10"),
        entry("blog", "p4", "en", "Headless CMS notes", "headless-cms-notes", "2024-02-20"),
    ];

    let pages_tree = vec![json!({
        "entry": pages[0], "depth": 1, "page": page(&pages[0], 1),
        "children": [{
            "entry": pages[1], "depth": 2, "page": page(&pages[1], 2),
            "children": [{
                "entry": pages[2], "depth": 3, "page": page(&pages[2], 3), "children": []
            }]
        }]
    })];

    let main_nav = vec![
        json!({
            "item": {"id": "nav-home", "title": "Home", "url": "/", "uri": "/", "permalink": "https://example.com/"},
            "depth": 1,
            "page": {"title": "Home", "url": "/", "depth": 1},
            "children": [{
                "item": {"id": "nav-about", "title": "About", "url": "/about", "entry_id": "about"},
                "depth": 2,
                "page": {"title": "About", "url": "/about", "depth": 2},
                "children": []
            }]
        }),
        json!({
            "item": {"id": "nav-docs", "title": "Docs", "url": "https://docs.example.com"},
            "depth": 1,
            "page": {"title": "Docs", "url": "https://docs.example.com", "depth": 1},
            "children": []
        }),
    ];

    let tags = vec![
        term("rust", "Rust", "en", 2),
        term("cms", "CMS", "en", 1),
        term("web", "Web", "fr", 1),
    ];

    let globals = vec![
        json!({"handle": "settings", "site": "en", "api_url": "/api/globals/settings", "site_name": "Example"}),
        json!({"handle": "settings", "site": "fr", "api_url": "/api/globals/settings", "site_name": "Exemple"}),
        json!({"handle": "footer", "site": "en", "api_url": "/api/globals/footer", "copyright": "2024"}),
    ];

    let forms = vec![
        json!({
            "handle": "contact",
            "title": "Contact",
            "api_url": "/api/forms/contact",
            "fields": {"name": {"type": "text"}, "email": {"type": "text", "validate": ["email"]}}
        }),
        json!({"handle": "newsletter", "title": "Newsletter", "api_url": "/api/forms/newsletter", "fields": []}),
    ];

    let users = vec![
        json!({"id": "u1", "email": "jane@example.com", "name": "Jane", "api_url": "/api/users/u1"}),
        json!({"id": "u2", "email": "max@example.com", "name": "Max", "api_url": "/api/users/u2"}),
    ];

    let images = vec![
        json!({"id": "images::logo.png", "path": "logo.png", "url": "/assets/logo.png", "api_url": "/api/assets/images/logo.png"}),
        json!({"id": "images::team/jane.jpg", "path": "team/jane.jpg", "url": "/assets/team/jane.jpg", "api_url": "/api/assets/images/team/jane.jpg"}),
    ];

    Fixtures {
        collections: BTreeMap::from([("pages".to_string(), pages), ("blog".to_string(), blog)]),
        collection_trees: BTreeMap::from([("pages".to_string(), pages_tree)]),
        navigations: BTreeMap::from([("main".to_string(), main_nav)]),
        taxonomies: BTreeMap::from([("tags".to_string(), tags)]),
        globals,
        forms,
        users,
        assets: BTreeMap::from([("images".to_string(), images)]),
    }
}
