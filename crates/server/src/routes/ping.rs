use axum::{Router, routing::get};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}

async fn ping() -> &'static str {
    "pong"
}
