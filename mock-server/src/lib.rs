pub mod fixtures;
pub mod query;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::fixtures::Fixtures;
use crate::query::{prune_tree, ListQuery};

pub type Store = Arc<Fixtures>;

type Pairs = Query<Vec<(String, String)>>;

pub fn app() -> Router {
    app_with(fixtures::seed())
}

pub fn app_with(fixtures: Fixtures) -> Router {
    let api = Router::new()
        .route("/collections/{collection}/entries", get(list_entries))
        .route("/collections/{collection}/entries/{id}", get(get_entry))
        .route("/collections/{collection}/tree", get(collection_tree))
        .route("/navs/{nav}/tree", get(navigation_tree))
        .route("/taxonomies/{taxonomy}/terms", get(list_terms))
        .route("/taxonomies/{taxonomy}/terms/{slug}", get(get_term))
        .route("/globals", get(list_globals))
        .route("/globals/{handle}", get(get_global))
        .route("/forms", get(list_forms))
        .route("/forms/{handle}", get(get_form))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/assets/{container}", get(list_assets))
        .route("/assets/{container}/{*path}", get(get_asset));

    Router::new().nest("/api", api).with_state(Arc::new(fixtures))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Handler failure rendered the way Statamic renders it.
pub enum ApiFailure {
    NotFound,
    BadRequest(String),
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self {
            ApiFailure::NotFound => (StatusCode::NOT_FOUND, Json(json!({"message": "Not found."}))).into_response(),
            ApiFailure::BadRequest(message) => {
                tracing::debug!(%message, "rejecting query");
                (StatusCode::BAD_REQUEST, Json(json!({"message": message}))).into_response()
            }
        }
    }
}

type ApiResult = Result<Json<Value>, ApiFailure>;

fn parse(pairs: &[(String, String)]) -> Result<ListQuery, ApiFailure> {
    ListQuery::from_pairs(pairs).map_err(ApiFailure::BadRequest)
}

fn single(record: Option<&Value>) -> ApiResult {
    record.map(|r| Json(json!({"data": r}))).ok_or(ApiFailure::NotFound)
}

fn paginated(records: Option<&Vec<Value>>, pairs: &[(String, String)], path: String) -> ApiResult {
    let records = records.ok_or(ApiFailure::NotFound)?;
    let query = parse(pairs)?;
    query.paginate(records, &path).map(Json).map_err(ApiFailure::BadRequest)
}

fn listing(records: &[Value], pairs: &[(String, String)]) -> ApiResult {
    let query = parse(pairs)?;
    let data = query.filter_records(records).map_err(ApiFailure::BadRequest)?;
    Ok(Json(json!({"data": data})))
}

fn tree(nodes: Option<&Vec<Value>>, pairs: &[(String, String)]) -> ApiResult {
    let nodes = nodes.ok_or(ApiFailure::NotFound)?;
    let query = parse(pairs)?;
    Ok(Json(json!({"data": prune_tree(nodes, query.max_depth)})))
}

async fn list_entries(State(db): State<Store>, Path(collection): Path<String>, Query(pairs): Pairs) -> ApiResult {
    let path = format!("/api/collections/{collection}/entries");
    paginated(db.collections.get(&collection), &pairs, path)
}

async fn get_entry(State(db): State<Store>, Path((collection, id)): Path<(String, String)>) -> ApiResult {
    single(db.find_entry(&collection, &id))
}

async fn collection_tree(State(db): State<Store>, Path(collection): Path<String>, Query(pairs): Pairs) -> ApiResult {
    tree(db.collection_trees.get(&collection), &pairs)
}

async fn navigation_tree(State(db): State<Store>, Path(nav): Path<String>, Query(pairs): Pairs) -> ApiResult {
    tree(db.navigations.get(&nav), &pairs)
}

async fn list_terms(State(db): State<Store>, Path(taxonomy): Path<String>, Query(pairs): Pairs) -> ApiResult {
    let path = format!("/api/taxonomies/{taxonomy}/terms");
    paginated(db.taxonomies.get(&taxonomy), &pairs, path)
}

async fn get_term(State(db): State<Store>, Path((taxonomy, slug)): Path<(String, String)>) -> ApiResult {
    single(db.find_term(&taxonomy, &slug))
}

async fn list_globals(State(db): State<Store>, Query(pairs): Pairs) -> ApiResult {
    listing(&db.globals, &pairs)
}

async fn get_global(State(db): State<Store>, Path(handle): Path<String>, Query(pairs): Pairs) -> ApiResult {
    let query = parse(&pairs)?;
    single(db.find_global(&handle, query.site.as_deref()))
}

async fn list_forms(State(db): State<Store>, Query(pairs): Pairs) -> ApiResult {
    listing(&db.forms, &pairs)
}

async fn get_form(State(db): State<Store>, Path(handle): Path<String>) -> ApiResult {
    single(db.find_form(&handle))
}

async fn list_users(State(db): State<Store>, Query(pairs): Pairs) -> ApiResult {
    paginated(Some(&db.users), &pairs, "/api/users".to_string())
}

async fn get_user(State(db): State<Store>, Path(id): Path<String>) -> ApiResult {
    single(db.find_user(&id))
}

async fn list_assets(State(db): State<Store>, Path(container): Path<String>, Query(pairs): Pairs) -> ApiResult {
    let path = format!("/api/assets/{container}");
    paginated(db.assets.get(&container), &pairs, path)
}

async fn get_asset(State(db): State<Store>, Path((container, path)): Path<(String, String)>) -> ApiResult {
    single(db.find_asset(&container, &path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_fixtures_cover_both_sites() {
        let db = fixtures::seed();
        let sites: Vec<&str> = db.collections["blog"].iter().filter_map(|e| e["site"].as_str()).collect();
        assert!(sites.contains(&"en") && sites.contains(&"fr"));
        assert_eq!(db.find_global("settings", Some("fr")).unwrap()["site_name"], "Exemple");
    }

    #[test]
    fn lookups_miss_unknown_handles() {
        let db = fixtures::seed();
        assert!(db.find_entry("nope", "home").is_none());
        assert!(db.find_entry("pages", "nope").is_none());
        assert!(db.find_asset("images", "team/jane.jpg").is_some());
    }

    #[test]
    fn single_wraps_in_data() {
        let Json(body) = single(Some(&json!({"id": "x"}))).ok().unwrap();
        assert_eq!(body, json!({"data": {"id": "x"}}));
    }
}
