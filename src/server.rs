//! HTTP surface for live analysis.
//!
//! Exposes the point and region evaluations over a small JSON API plus a
//! root liveness probe. CORS is restricted to the frontend dev servers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{AggregationError, DataError};
use crate::models::{ComfortProfile, ScoreWeights};
use crate::scoring::region::{evaluate_point, evaluate_region};
use crate::services::ClimatologyProvider;

/// Body of `POST /api/analyze/point`.
#[derive(Debug, Deserialize)]
pub struct PointRequest {
    pub lat: f64,
    pub lon: f64,
    pub month: u32,
    /// Accepted for interface symmetry; monthly climatology has no
    /// per-day resolution.
    #[serde(default)]
    pub day: Option<u32>,
    #[serde(default)]
    pub profile: ComfortProfile,
    #[serde(default)]
    pub weights: ScoreWeights,
}

/// Body of `POST /api/analyze/region`.
#[derive(Debug, Deserialize)]
pub struct RegionRequest {
    /// Polygon ring as `[lon, lat]` pairs.
    pub polygon: Vec<[f64; 2]>,
    pub month: u32,
    #[serde(default)]
    pub day: Option<u32>,
    #[serde(default)]
    pub profile: ComfortProfile,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
}

fn default_sample_count() -> usize {
    16
}

/// Errors a handler can surface, mapped onto HTTP statuses.
///
/// Caller mistakes (bad month, unusable polygon) are 400s; anything that
/// went wrong between us and the upstream data source is a 502. Bodies
/// are `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Data(DataError::InvalidMonth(_)) => StatusCode::BAD_REQUEST,
            ApiError::Data(_) => StatusCode::BAD_GATEWAY,
            ApiError::Aggregation(AggregationError::InvalidPolygon(_)) => StatusCode::BAD_REQUEST,
            ApiError::Aggregation(AggregationError::AllSamplesFailed) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Analysis routes.
pub struct AnalyzeRoutes;

impl AnalyzeRoutes {
    /// Builds the full application router around one shared provider.
    pub fn routes(provider: Arc<dyn ClimatologyProvider>) -> Router {
        Router::new()
            .route("/", get(Self::handle_root))
            .route("/api/analyze/point", post(Self::handle_point))
            .route("/api/analyze/region", post(Self::handle_region))
            .with_state(provider)
            .layer(cors_layer())
            .layer(TraceLayer::new_for_http())
    }

    async fn handle_root() -> impl IntoResponse {
        Json(json!({ "status": "atmo_rater backend is running" }))
    }

    async fn handle_point(
        State(provider): State<Arc<dyn ClimatologyProvider>>,
        Json(request): Json<PointRequest>,
    ) -> Result<Response, ApiError> {
        check_month(request.month)?;

        let result = evaluate_point(
            provider.as_ref(),
            request.lat,
            request.lon,
            request.month,
            &request.profile,
            &request.weights,
        )
        .await?;

        Ok((StatusCode::OK, Json(result)).into_response())
    }

    async fn handle_region(
        State(provider): State<Arc<dyn ClimatologyProvider>>,
        Json(request): Json<RegionRequest>,
    ) -> Result<Response, ApiError> {
        check_month(request.month)?;

        let ring: Vec<(f64, f64)> = request.polygon.iter().map(|p| (p[0], p[1])).collect();

        let result = evaluate_region(
            provider.clone(),
            &ring,
            request.month,
            &request.profile,
            &request.weights,
            request.sample_count,
        )
        .await?;

        Ok((StatusCode::OK, Json(result)).into_response())
    }
}

fn check_month(month: u32) -> Result<(), ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::BadRequest(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    Ok(())
}

/// Browser clients come from the Vite dev servers. Credentials are
/// allowed, so origins must be listed explicitly rather than `Any`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://localhost:5174"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

/// Binds the listener and serves the API until Ctrl+C.
pub async fn serve(provider: Arc<dyn ClimatologyProvider>, bind: &str) -> anyhow::Result<()> {
    let app = AnalyzeRoutes::routes(provider);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(bind, "API listening");

    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = tokio::signal::ctrl_c() => { info!("Shutdown signal received"); }
    }

    Ok(())
}
