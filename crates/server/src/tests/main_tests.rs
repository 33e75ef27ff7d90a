use super::*;
use async_trait::async_trait;
use axum::{body, body::Body, http::Request};
use server_api::{RelayError, RelayMessage};
use shared::protocol::ContactAccepted;
use tokio::time::Instant;
use tower::ServiceExt;

struct DownRelay;

#[async_trait]
impl EmailRelay for DownRelay {
    async fn forward(&self, _message: &RelayMessage) -> Result<(), RelayError> {
        Err(RelayError::Rejected("relay offline".to_string()))
    }
}

fn test_app(relay: Option<Arc<dyn EmailRelay>>, response_delay: Duration) -> Router {
    build_router(Arc::new(AppState {
        api: ApiContext { relay },
        response_delay,
    }))
}

fn contact_request(body: serde_json::Value) -> Request<Body> {
    Request::post(CONTACT_ROUTE)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "message": "Project Type: web\nBudget: 5k-10k\n\nDetails:\nA new storefront",
    })
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app(None, Duration::ZERO);
    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn valid_contact_is_accepted() {
    let app = test_app(None, Duration::ZERO);
    let response = app
        .oneshot(contact_request(valid_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let accepted: ContactAccepted =
        serde_json::from_value(json_body(response).await).expect("accepted body");
    assert_eq!(accepted, ContactAccepted::thank_you());
}

#[tokio::test]
async fn long_message_is_truncated_and_accepted() {
    let app = test_app(None, Duration::ZERO);
    let body = serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "message": "x".repeat(70_000),
    });
    let response = app.oneshot(contact_request(body)).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);
}

#[tokio::test(start_paused = true)]
async fn body_over_buffer_limit_is_a_delayed_json_client_error() {
    let app = test_app(None, Duration::from_millis(500));
    let body = serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "message": "x".repeat(MAX_BODY_BYTES + 1),
    })
    .to_string();
    let request = Request::post(CONTACT_ROUTE)
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .expect("request");

    let started = Instant::now();
    let response = app.oneshot(request).await.expect("response");
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid request body");
}

#[tokio::test]
async fn relay_outage_still_returns_success() {
    let app = test_app(Some(Arc::new(DownRelay)), Duration::ZERO);
    let response = app
        .oneshot(contact_request(valid_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn validation_failures_map_to_bad_request() {
    let cases = [
        (
            serde_json::json!({ "name": "Ada", "email": "ada@example.com" }),
            "All fields are required",
        ),
        (
            serde_json::json!({ "name": "Ada", "email": "bad", "message": "long enough text" }),
            "Invalid email format",
        ),
        (
            serde_json::json!({ "name": "A", "email": "a@b.co", "message": "long enough text" }),
            "Name must be between 2 and 100 characters",
        ),
        (
            serde_json::json!({ "name": "Ada", "email": "a@b.co", "message": "short" }),
            "Message must be between 10 and 1000 characters",
        ),
    ];

    for (body, reason) in cases {
        let app = test_app(None, Duration::ZERO);
        let response = app.oneshot(contact_request(body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], reason);
    }
}

#[tokio::test]
async fn unreadable_body_is_a_client_error() {
    let app = test_app(None, Duration::ZERO);
    let request = Request::post(CONTACT_ROUTE)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid request body");
}

#[tokio::test]
async fn get_on_contact_route_is_method_not_allowed() {
    let app = test_app(None, Duration::ZERO);
    let response = app
        .oneshot(Request::get(CONTACT_ROUTE).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json_body(response).await["error"], "Method not allowed");
}

#[tokio::test(start_paused = true)]
async fn response_is_delayed_for_every_outcome() {
    for body in [valid_body(), serde_json::json!({})] {
        let app = test_app(None, Duration::from_millis(500));
        let started = Instant::now();
        let response = app.oneshot(contact_request(body)).await.expect("response");
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert!(response.status() == StatusCode::OK || response.status() == StatusCode::BAD_REQUEST);
    }
}

async fn exploding_handler() -> &'static str {
    panic!("boom")
}

fn exploding_app(response_delay: Duration) -> Router {
    let state = Arc::new(AppState {
        api: ApiContext::default(),
        response_delay,
    });
    Router::new()
        .route(CONTACT_ROUTE, contact_endpoint(exploding_handler, &state))
        .with_state(state)
}

#[tokio::test]
async fn panicking_handler_becomes_internal_server_error() {
    let response = exploding_app(Duration::ZERO)
        .oneshot(contact_request(valid_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Internal server error");
}

#[tokio::test(start_paused = true)]
async fn panic_response_is_delayed_too() {
    let started = Instant::now();
    let response = exploding_app(Duration::from_millis(500))
        .oneshot(contact_request(valid_body()))
        .await
        .expect("response");
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test(start_paused = true)]
async fn method_not_allowed_is_not_delayed() {
    let app = test_app(None, Duration::from_millis(500));
    let started = Instant::now();
    let response = app
        .oneshot(Request::get(CONTACT_ROUTE).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
