//! HTTP interface.
//!
//! Axum router serving the match form flow (HTML) and a JSON endpoint for
//! the same analysis.

pub mod render;
pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::analyze::AnalysisError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Render as a bare HTML page for the form flow.
    ///
    /// Server-side failures get a generic message; the cause is only logged.
    pub fn into_html_response(self) -> Response {
        let (status, _) = self.status_and_code();
        let message = match &self {
            ApiError::BadRequest(_) => "Invalid match URL",
            ApiError::Upstream(_) => "An error occurred while fetching the data",
            ApiError::Internal(_) => "An error occurred while rendering the page",
        };
        (status, Html(message)).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidMatchUrl(url) => {
                warn!("Rejected match URL: {:?}", url);
                ApiError::BadRequest(format!("Invalid match URL: {}", url))
            }
            AnalysisError::Upstream(e) => {
                error!("FACEIT API failure: {}", e);
                ApiError::Upstream(e.to_string())
            }
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        error!("Template rendering failed: {}", err);
        ApiError::Internal(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(routes::pages::index))
        .route("/form", get(routes::pages::form))
        .route("/match", post(routes::pages::analyze_match_form))
        .route("/api/match", post(routes::matches::analyze_match))
        .route("/health", get(routes::health))
        .nest_service("/static", static_files)
        .with_state(state)
}

/// CORS layer for a configured origin; `*` allows any origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::exact(HeaderValue::from_str(origin.trim())?)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
