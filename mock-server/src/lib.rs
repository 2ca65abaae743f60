use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const HASH_LEN: usize = 6;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub hash: String,
    pub long_url: String,
    pub total_visits: u64,
}

#[derive(Debug, Default)]
pub struct Links {
    by_hash: HashMap<String, Link>,
    by_url: HashMap<String, String>,
}

impl Links {
    /// Hash for `long_url`, minting one on first sight.
    fn shorten(&mut self, long_url: &str) -> String {
        if let Some(hash) = self.by_url.get(long_url) {
            return hash.clone();
        }
        let hash = loop {
            let candidate = Uuid::new_v4().simple().to_string()[..HASH_LEN].to_string();
            if !self.by_hash.contains_key(&candidate) {
                break candidate;
            }
        };
        self.by_hash.insert(
            hash.clone(),
            Link {
                hash: hash.clone(),
                long_url: long_url.to_string(),
                total_visits: 0,
            },
        );
        self.by_url.insert(long_url.to_string(), hash.clone());
        hash
    }
}

#[derive(Deserialize)]
pub struct ShortenParams {
    pub long_url: Option<String>,
}

#[derive(Deserialize)]
pub struct StatsParams {
    pub hash: Option<String>,
}

pub type Db = Arc<RwLock<Links>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Links::default()));
    Router::new()
        .route("/", get(index))
        .route("/api/v1/shorten", get(shorten))
        .route("/api/v1/stats", get(stats))
        .route("/{hash}", get(visit))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn index() -> &'static str {
    "mock shortener"
}

async fn shorten(State(db): State<Db>, Query(params): Query<ShortenParams>) -> Response {
    let Some(long_url) = params.long_url.filter(|url| !url.trim().is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "long_url is required");
    };
    let hash = db.write().await.shorten(&long_url);
    Json(json!({ "data": { "hash": hash, "long_url": long_url } })).into_response()
}

async fn stats(State(db): State<Db>, Query(params): Query<StatsParams>) -> Response {
    let links = db.read().await;
    match params.hash.as_deref().and_then(|hash| links.by_hash.get(hash)) {
        Some(link) => Json(json!({
            "data": {
                "hash": link.hash,
                "long_url": link.long_url,
                "stats": { "total_visits": link.total_visits },
            }
        }))
        .into_response(),
        None => error(StatusCode::NOT_FOUND, "not found"),
    }
}

async fn visit(State(db): State<Db>, Path(hash): Path<String>) -> Response {
    let mut links = db.write().await;
    match links.by_hash.get_mut(&hash) {
        Some(link) => {
            link.total_visits += 1;
            Redirect::to(&link.long_url).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "not found"),
    }
}
