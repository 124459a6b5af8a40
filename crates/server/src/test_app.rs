use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use config::{Config, DatabaseConfig};
use db::DBService;
use db_migration::SchemaVersion;
use test_support::TestStorage;
use tower::ServiceExt;

use crate::{AppState, http};

/// Router over a freshly bootstrapped database in a temporary directory.
pub struct TestApp {
    pub router: Router,
    _storage: TestStorage,
}

impl TestApp {
    pub async fn new() -> Self {
        let storage = TestStorage::new().unwrap();
        let config = Config {
            db: DatabaseConfig::with_storage_path(storage.path()),
            ..Config::default()
        };
        let db = DBService::bootstrap(&config.db, &SchemaVersion::new(0, 0, 0))
            .await
            .unwrap();
        let router = http::router(AppState::new(db.db, config));
        Self {
            router,
            _storage: storage,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/json");
    }
    let request = request
        .body(body.map(|raw| Body::from(raw.to_string())).unwrap_or_default())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}
