use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderName, Request},
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{AppState, routes};

/// Upper bound for handling a single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(routes::ping::router())
        .merge(routes::repository::router())
        .merge(routes::branch::router())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::test_app::{TestApp, send};

    #[tokio::test]
    async fn ping_answers_pong() {
        let app = TestApp::new().await;

        let response = send(&app.router, Method::GET, "/ping", None).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "pong");
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let app = TestApp::new().await;

        let response = send(&app.router, Method::GET, "/ping", None).await;

        let request_id = response
            .headers
            .get(super::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap();
        assert!(!request_id.is_empty());
    }

    #[tokio::test]
    async fn unknown_routes_are_404() {
        let app = TestApp::new().await;

        let response = send(&app.router, Method::GET, "/versions/1", None).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
