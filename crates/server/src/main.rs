use std::{any::Any, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Request, State},
    handler::Handler,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use server_api::{submit_contact, ApiContext, EmailRelay, RawContactRequest, Web3FormsRelay};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ContactErrorBody, CONTACT_ROUTE},
};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

// Fields are truncated after decoding, so this only bounds buffering. Bodies
// over it are answered like any other unreadable body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings()?;
    let relay = settings.web3forms_access_key.as_ref().map(|key| {
        Arc::new(Web3FormsRelay::new(
            settings.relay_url.clone(),
            key.clone(),
            settings.site_url.clone(),
        )) as Arc<dyn EmailRelay>
    });
    if relay.is_none() {
        warn!("no relay access key configured; contact submissions will only be logged");
    }

    let state = AppState {
        api: ApiContext { relay },
        response_delay: Duration::from_millis(settings.response_delay_ms),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(CONTACT_ROUTE, contact_endpoint(http_contact, &state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// POST-only route whose every outcome, a handler panic included, is held
/// back by the configured response delay. Other methods get an immediate 405.
fn contact_endpoint<H, T>(handler: H, state: &Arc<AppState>) -> MethodRouter<Arc<AppState>>
where
    H: Handler<T, Arc<AppState>>,
    T: 'static,
{
    post(handler)
        .fallback(method_not_allowed)
        .route_layer(CatchPanicLayer::custom(handle_panic))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            respond_after_delay,
        ))
}

async fn respond_after_delay(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    tokio::time::sleep(state.response_delay).await;
    response
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_contact(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RawContactRequest>, JsonRejection>,
) -> Response {
    let outcome = match body {
        Ok(Json(raw)) => submit_contact(&state.api, raw).await,
        Err(rejection) => {
            warn!(%rejection, "unreadable contact body");
            Err(ApiError::validation("Invalid request body"))
        }
    };

    match outcome {
        Ok(accepted) => (StatusCode::OK, Json(accepted)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn method_not_allowed() -> Response {
    error_response(ApiError::new(
        ErrorCode::MethodNotAllowed,
        "Method not allowed",
    ))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: ApiError) -> Response {
    (status_for(err.code), Json(ContactErrorBody::new(err.message))).into_response()
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "request handler panicked");
    error_response(ApiError::internal())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
