//! Every resource operation against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client over real
//! HTTP through the default `ureq` transport. Validates that request building,
//! site scoping and response shaping agree with a server that actually reads
//! the query string.

use statamic_core::{
    walk, ApiError, ClientConfig, ClientProvider, Condition, Filter, Params, RequestOptions, Sort,
    StatamicClient,
};

/// Start the mock server on a random port and return its API root.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/api/")
}

fn client(base_url: &str) -> StatamicClient {
    StatamicClient::new(&ClientConfig::new(base_url)).unwrap()
}

fn entry_ids(entries: &[statamic_core::Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn entries_site_scoping_and_query_semantics() {
    let base = start_server();
    let client = client(&base);

    // Step 1: unscoped listing returns every site.
    let all = client.get_entries("blog", &Params::default()).unwrap();
    assert_eq!(all.meta.total, 4);

    // Step 2: `site` becomes a filter and narrows to one site.
    let params = Params::new().site("fr");
    let fr = client.get_entries("blog", &params).unwrap();
    assert_eq!(entry_ids(&fr.data), ["p3"]);
    assert_eq!(params.site.as_deref(), Some("fr"));

    // Step 3: caller filters and the site filter are AND-combined.
    let params = Params::new()
        .filter(Filter::with_condition("title", Condition::Contains, "rust"))
        .site("en");
    let found = client.get_entries("blog", &params).unwrap();
    assert_eq!(entry_ids(&found.data), ["p2"]);

    // Step 4: sort, select and pagination round-trip through the server.
    let params = Params::new().sort(Sort::desc("date")).select(["id", "date"]).limit(2).page(2);
    let page = client.get_entries("blog", &params).unwrap();
    assert_eq!(entry_ids(&page.data), ["p1", "p4"]);
    assert!(page.data[0].str_field("title").is_none());
    assert_eq!(page.meta.current_page, 2);
    assert_eq!(page.meta.last_page, 2);
    assert!(page.links.next.is_none());
}

#[test]
fn default_site_scopes_list_endpoints() {
    let base = start_server();
    let config = ClientConfig::new(&base).with_default_site("fr");
    let client = StatamicClient::new(&config).unwrap();

    let entries = client.get_entries("pages", &Params::default()).unwrap();
    assert_eq!(entry_ids(&entries.data), ["accueil"]);

    let terms = client.get_taxonomy_terms("tags", &Params::default()).unwrap();
    assert_eq!(terms.data.len(), 1);
    assert_eq!(terms.data[0].slug, "web");

    // Explicit site wins over the default.
    let globals = client.get_globals(&Params::new().site("en")).unwrap();
    assert_eq!(globals.data.len(), 2);
}

#[test]
fn single_items_are_unwrapped() {
    let base = start_server();
    let client = client(&base);

    let entry = client.get_entry("pages", "about", &Params::default()).unwrap();
    assert_eq!(entry.str_field("title"), Some("About"));

    let term = client.get_taxonomy_term("tags", "rust", &Params::default()).unwrap();
    assert_eq!(term.title.as_deref(), Some("Rust"));
    assert_eq!(term.taxonomy.unwrap().handle, "tags");
    assert_eq!(term.entries_count, Some(2));

    let global = client.get_global("settings", &Params::new().site("fr")).unwrap();
    assert_eq!(global.extra["site_name"], "Exemple");

    let form = client.get_form("contact", &Params::default()).unwrap();
    assert_eq!(form.field_handles(), vec!["email", "name"]);

    let user = client.get_user("u2", &Params::default()).unwrap();
    assert_eq!(user.email.as_deref(), Some("max@example.com"));

    let asset = client.get_asset("images", "team/jane.jpg", &Params::default()).unwrap();
    assert_eq!(asset.id, "images::team/jane.jpg");
}

#[test]
fn collections_keep_their_envelope() {
    let base = start_server();
    let client = client(&base);

    let users = client.get_users(&Params::new().limit(1)).unwrap();
    assert_eq!(users.data.len(), 1);
    assert_eq!(users.meta.total, 2);
    assert_eq!(users.meta.per_page, 1);

    let assets = client.get_assets("images", &Params::default()).unwrap();
    assert_eq!(assets.meta.total, 2);

    let forms = client.get_forms(&Params::default()).unwrap();
    assert_eq!(forms.data.len(), 2);
    assert!(forms.meta.is_none());
}

#[test]
fn trees_are_unwrapped_forests() {
    let base = start_server();
    let client = client(&base);

    let tree = client.get_collection_tree("pages", &Params::default()).unwrap();
    let ids: Vec<&str> = walk(&tree).map(|n| n.entry.id.as_str()).collect();
    assert_eq!(ids, ["home", "about", "contact"]);
    assert_eq!(tree[0].page.title.as_deref(), Some("Home"));

    let shallow = client
        .get_collection_tree("pages", &Params::new().max_depth(2))
        .unwrap();
    assert_eq!(walk(&shallow).count(), 2);

    let nav = client.get_navigation_tree("main", &Params::default()).unwrap();
    assert_eq!(nav.len(), 2);
    assert_eq!(nav[0].children[0].item.extra["entry_id"], "about");
}

#[test]
fn failures_carry_the_url() {
    let base = start_server();
    let client = client(&base);

    let err = client.get_entry("pages", "missing", &Params::default()).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains(&format!("{base}collections/pages/entries/missing")));

    // A `?` in the id stays part of the id instead of starting a query.
    let err = client.get_entry("pages", "about?x", &Params::default()).unwrap_err();
    assert!(err.is_not_found());

    // The mock rejects conditions it does not implement.
    let params = Params::new().filter(Filter::with_condition("title", Condition::IsEmail, "x"));
    let err = client.get_entries("blog", &params).unwrap_err();
    assert!(matches!(&err, ApiError::Request(e) if e.status() == Some(400)));
}

#[test]
fn unreachable_server_is_a_request_error() {
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base = format!("http://127.0.0.1:{port}/api/");
    let options = RequestOptions::default().with_timeout(std::time::Duration::from_secs(2));
    let client = StatamicClient::new(&ClientConfig::new(&base).with_request_options(options)).unwrap();

    let err = client.get_globals(&Params::default()).unwrap_err();
    match err {
        ApiError::Request(e) => {
            assert_eq!(e.status(), None);
            assert_eq!(e.url, format!("{base}globals"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn provider_hands_out_a_working_client() {
    let base = start_server();
    let provider = ClientProvider::new(&ClientConfig::new(&base)).unwrap();
    let client = provider.client().unwrap();
    let globals = client.get_globals(&Params::default()).unwrap();
    assert_eq!(globals.data.len(), 3);

    let empty: ClientProvider = ClientProvider::unconfigured();
    assert!(matches!(empty.client(), Err(ApiError::Usage(_))));
}
