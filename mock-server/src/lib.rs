use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const POINT_HANDLE: &str = "SG_6sRJczWZHdzNj4qSeRzpzz_40.005274_-105.048054@1291669259";
pub const POLYGON_HANDLE: &str = "SG_4b10i9vCyPnKAYiYBLKZN7";

pub const POINT_BODY: &str = r#"{"geometry":{"type":"Point","coordinates":[-105.048054,40.005274]},"type":"Feature","id":"SG_6sRJczWZHdzNj4qSeRzpzz_40.005274_-105.048054@1291669259","properties":{"province":"CO","city":"Erie","name":"CMD Colorado Inc","tags":["sandwich"],"country":"US","phone":"+1 303 664 9448","address":"305 Baron Ct","owner":"simplegeo","classifiers":[{"category":"Restaurants","type":"Food & Drink","subcategory":""}],"postcode":"80516"}}"#;

pub const POLYGON_BODY: &str = r#"{"geometry":{"type":"Polygon","coordinates":[[[-86.3672637,33.4041157],[-86.3676356,33.4039745],[-86.3681259,33.40365],[-86.3685992,33.4034242],[-86.3672637,33.4041157]]]},"type":"Feature","properties":{"category":"Island","handle":"SG_4b10i9vCyPnKAYiYBLKZN7_33.400800_-86.370802","name":"Elliott Island","type":"Physical Feature"},"id":"SG_4b10i9vCyPnKAYiYBLKZN7"}"#;

/// Stored bodies keyed by handle. Bodies are served verbatim, valid JSON
/// or not.
pub type Db = Arc<RwLock<HashMap<String, String>>>;

pub fn app() -> Router {
    let mut seed = HashMap::new();
    seed.insert(POINT_HANDLE.to_string(), POINT_BODY.to_string());
    seed.insert(POLYGON_HANDLE.to_string(), POLYGON_BODY.to_string());
    app_with(seed)
}

pub fn app_with(features: HashMap<String, String>) -> Router {
    let db: Db = Arc::new(RwLock::new(features));
    Router::new()
        .route("/{version}/features/{file}", get(get_feature).put(put_feature))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock server listening");
    axum::serve(listener, app()).await
}

type Reply = (StatusCode, [(header::HeaderName, &'static str); 1], String);

fn reply(status: StatusCode, body: String) -> Reply {
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

fn error(status: StatusCode, message: &str) -> Reply {
    reply(status, json!({ "message": message }).to_string())
}

/// `SG_xxx.json` -> `SG_xxx`
fn handle_of(file: &str) -> Option<&str> {
    file.strip_suffix(".json")
}

fn is_signed(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("OAuth realm=") && v.contains("oauth_signature=\""))
}

async fn get_feature(
    State(db): State<Db>,
    Path((version, file)): Path<(String, String)>,
    headers: HeaderMap,
) -> Reply {
    if !is_signed(&headers) {
        return error(StatusCode::UNAUTHORIZED, "missing or malformed OAuth authorization");
    }
    let Some(handle) = handle_of(&file) else {
        return error(StatusCode::NOT_FOUND, "no such endpoint");
    };
    debug!(%version, %handle, "get feature");
    match db.read().await.get(handle) {
        Some(body) => reply(StatusCode::OK, body.clone()),
        None => error(StatusCode::NOT_FOUND, "feature not found"),
    }
}

async fn put_feature(
    State(db): State<Db>,
    Path((_version, file)): Path<(String, String)>,
    body: String,
) -> Reply {
    let Some(handle) = handle_of(&file) else {
        return error(StatusCode::NOT_FOUND, "no such endpoint");
    };
    db.write().await.insert(handle.to_string(), body);
    reply(StatusCode::CREATED, json!({ "id": handle }).to_string())
}
