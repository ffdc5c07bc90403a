//! HTTP request handlers for the interaction checker.
//!
//! Implements the stack check and health check endpoints using axum.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use ssb_domain::{CheckError, Mode, StackChecker, StackReport, SubstanceCounts};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Minimum number of items a check request must carry
pub const MIN_ITEMS: usize = 2;

/// Maximum number of items a check request may carry
///
/// Bounds the pair count and the length of the interaction filter URL.
pub const MAX_ITEMS: usize = 25;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Interaction checker over the configured stores
    pub checker: StackChecker,
    /// Deadline for a whole check
    pub request_timeout: Duration,
}

/// Stack check request
#[derive(Debug, Default, Deserialize)]
pub struct CheckStackRequest {
    /// Substance identifiers to check against each other
    #[serde(default)]
    pub items: Option<Vec<String>>,

    /// Checking mode (defaults to "supplements-drugs")
    #[serde(default)]
    pub mode: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Whether the substance store answered
    pub ok: bool,
    /// Overall health status: "healthy" or "unhealthy"
    pub status: String,
    /// Active substance counts, when the store answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substances: Option<SubstanceCounts>,
    /// Failure detail, when it did not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request failed validation before reaching the checker
    Validation(String),
    /// A store lookup failed
    Upstream(CheckError),
    /// The check did not finish before the deadline
    Timeout,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(CheckError::SubstanceLookup(_)) => (
                StatusCode::BAD_GATEWAY,
                "Failed to fetch substance types".to_string(),
            ),
            AppError::Upstream(CheckError::InteractionLookup(_)) => (
                StatusCode::BAD_GATEWAY,
                "Failed to query interactions".to_string(),
            ),
            AppError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Interaction check timed out".to_string(),
            ),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<CheckError> for AppError {
    fn from(e: CheckError) -> Self {
        AppError::Upstream(e)
    }
}

impl CheckStackRequest {
    /// Validate the request, returning the items and the resolved mode
    ///
    /// Items are counted before deduplication. A missing or empty mode means
    /// the default; an unrecognized one is a validation error rather than an
    /// empty report.
    pub fn validate(self) -> Result<(Vec<String>, Mode), AppError> {
        let items = match self.items {
            Some(items) if items.len() > MAX_ITEMS => {
                return Err(AppError::Validation(format!(
                    "Please provide at most {} substance IDs in the items array",
                    MAX_ITEMS
                )))
            }
            Some(items) if items.len() >= MIN_ITEMS => items,
            _ => {
                return Err(AppError::Validation(
                    "Please provide at least 2 substance IDs in the items array".to_string(),
                ))
            }
        };

        let mode = match self.mode.as_deref() {
            None | Some("") => Mode::default(),
            Some(name) => Mode::parse(name).ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid mode: {}. Expected \"{}\" or \"{}\"",
                    name,
                    Mode::SupplementsDrugs.as_str(),
                    Mode::SupplementsSupplements.as_str()
                ))
            })?,
        };

        Ok((items, mode))
    }
}

/// POST /check-stack - Check a list of substances for pairwise interactions
async fn check_stack(
    State(state): State<AppState>,
    payload: Result<Json<CheckStackRequest>, JsonRejection>,
) -> Result<Json<StackReport>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected check request: {}", rejection.body_text());
        AppError::Validation(rejection.body_text())
    })?;
    let (items, mode) = request.validate()?;

    let check = state.checker.check(items.as_slice(), mode);
    let report = tokio::time::timeout(state.request_timeout, check)
        .await
        .map_err(|_| {
            error!(
                "Stack check exceeded {:?} ({} items)",
                state.request_timeout,
                items.len()
            );
            AppError::Timeout
        })??;

    Ok(Json(report))
}

/// GET /health - Store connectivity and substance counts
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthCheckResponse>) {
    let counts = tokio::time::timeout(
        state.request_timeout,
        state.checker.substance_store().substance_counts(),
    )
    .await;

    match counts {
        Ok(Ok(substances)) => (
            StatusCode::OK,
            Json(HealthCheckResponse {
                ok: true,
                status: "healthy".to_string(),
                substances: Some(substances),
                error: None,
            }),
        ),
        Ok(Err(e)) => {
            error!("Health check store query failed: {}", e);
            unhealthy(e.to_string())
        }
        Err(_) => unhealthy("Store request timed out".to_string()),
    }
}

fn unhealthy(message: String) -> (StatusCode, Json<HealthCheckResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthCheckResponse {
            ok: false,
            status: "unhealthy".to_string(),
            substances: None,
            error: Some(message),
        }),
    )
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    AxumRouter::new()
        .route("/check-stack", post(check_stack))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
