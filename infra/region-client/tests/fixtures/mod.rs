use axum::Json;
use axum::Router;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Regions of the stub: 1 Europe > 2 France > 3 Paris. Other ids trigger edge cases.
pub const SLOW_REGION: u64 = 9;

type Params = Query<HashMap<String, String>>;

/// In-process stand-in for the region service, bound to an ephemeral port.
pub struct StubServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn() -> StubServer {
    let router = Router::new()
        .route("/api/regions/hierarchies", get(hierarchies))
        .route("/api/regions/root", get(root))
        .route("/api/regions/{id}", get(region))
        .route("/api/regions/{id}/subregions", get(subregions))
        .route("/api/regions/{id}/geometry", get(geometry))
        .route("/api/regions/{id}/ancestors", get(ancestors));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });

    StubServer { base_url: format!("http://{addr}"), handle }
}

/// A base URL nothing listens on.
pub async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind a free port");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{addr}")
}

fn hierarchy_of(params: &Params) -> String {
    params.get("hierarchyId").cloned().unwrap_or_default()
}

async fn hierarchies() -> Response {
    Json(json!([
        { "hierarchyId": 1, "hierarchyName": "Continents" },
        { "hierarchyId": 2, "name": "Biomes" }
    ]))
    .into_response()
}

async fn root(params: Params) -> Response {
    match hierarchy_of(&params).as_str() {
        "404" => StatusCode::NO_CONTENT.into_response(),
        h => Json(json!([{ "id": 1, "name": format!("Europe@{h}"), "hasSubregions": true }])).into_response(),
    }
}

async fn region(Path(id): Path<u64>, params: Params) -> Response {
    match id {
        2 => Json(json!({ "id": 2, "name": format!("France@{}", hierarchy_of(&params)), "hasSubregions": true }))
            .into_response(),
        3 => Json(json!({ "id": 3, "name": "Paris", "hasSubregions": false, "area": 105.4 })).into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn subregions(Path(id): Path<u64>) -> Response {
    match id {
        1 => Json(json!([{ "id": 2, "name": "France" }])).into_response(),
        3 => StatusCode::NO_CONTENT.into_response(),
        4 => Json(json!([])).into_response(),
        _ => StatusCode::BAD_GATEWAY.into_response(),
    }
}

async fn geometry(Path(id): Path<u64>, params: Params) -> Response {
    match id {
        2 => Json(json!({
            "type": "Polygon",
            "resolveEmpty": params.get("resolveEmpty"),
            "hierarchyId": params.get("hierarchyId")
        }))
        .into_response(),
        3 => StatusCode::NO_CONTENT.into_response(),
        4 => StatusCode::NOT_FOUND.into_response(),
        _ => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn ancestors(Path(id): Path<u64>) -> Response {
    match id {
        3 => Json(json!([
            { "id": 3, "name": "Paris", "hasSubregions": false },
            { "id": 2, "name": "France", "hasSubregions": true },
            { "id": 1, "name": "Europe", "hasSubregions": true }
        ]))
        .into_response(),
        7 => StatusCode::NO_CONTENT.into_response(),
        8 => Json(json!({ "ancestors": "not a list" })).into_response(),
        SLOW_REGION => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!([])).into_response()
        },
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
