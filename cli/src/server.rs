use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use forage_core::error::StoreError;
use forage_core::models::{
    AnalyticsReport, DEFAULT_WINDOW_DAYS, InventoryAlerts, validate_window_days,
};
use forage_core::service::AnalyticsService;

// Only GET endpoints; anything larger is not a legitimate request.
const BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone)]
struct AppState {
    service: AnalyticsService,
}

#[derive(Deserialize)]
struct SummaryQuery {
    days: Option<u32>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Error handling ---

enum ApiError {
    BadRequest(String),
    StorageUnavailable(StoreError),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::StorageUnavailable(err) => {
                error!(error = %err, "storage unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage unavailable".to_string(),
                )
            }
            Self::Internal(err) => {
                error!(error = format!("{err:#}"), "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::StorageUnavailable(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

// --- Middleware ---

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'"),
    );
    response
}

// --- Handlers ---

/// Store calls are synchronous; keep them off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .context("analytics task failed")?;
    Ok(result?)
}

async fn health() -> &'static str {
    "ok"
}

async fn analytics_summary(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let days = validate_window_days(query.days.unwrap_or(DEFAULT_WINDOW_DAYS))
        .map_err(|e| ApiError::BadRequest(format!("{e}")))?;
    let service = state.service.clone();
    let report = run_blocking(move || service.analytics_summary(&owner_id, days)).await?;
    Ok(Json(report))
}

async fn inventory_alerts(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<InventoryAlerts>, ApiError> {
    let service = state.service.clone();
    let alerts = run_blocking(move || service.inventory_alerts(&owner_id)).await?;
    Ok(Json(alerts))
}

// --- Router builder ---

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/analytics/{owner_id}/summary", get(analytics_summary))
        .route("/api/inventory/{owner_id}/alerts", get(inventory_alerts))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// --- Server startup ---

pub async fn start_server(service: AnalyticsService, port: u16, bind: &str) -> anyhow::Result<()> {
    let app = build_router(AppState { service });

    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}"))
        .await
        .with_context(|| format!("failed to bind {bind}:{port}"))?;
    info!("listening on http://{bind}:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
