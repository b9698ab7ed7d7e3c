//! HTTP service exposing detected surebets.
//!
//! - `GET /api/surebets?minRoi=&stake=` runs a live detection cycle.
//! - `POST /api/surebets` runs the detector over a caller-supplied market list,
//!   for testing and benchmarking without live fetches.
//! - `GET /health` is a liveness check.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::App;
use crate::domain::{detect, DetectorConfig, MarketOdds, Surebet};
use crate::error::Result;

/// Query parameters of `GET /api/surebets`.
///
/// Kept as raw strings: a value that does not parse falls back to its
/// default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct SurebetsQuery {
    #[serde(rename = "minRoi")]
    pub min_roi: Option<String>,
    pub stake: Option<String>,
}

impl SurebetsQuery {
    fn detector(&self) -> DetectorConfig {
        // Missing, empty or unparseable values become NaN, which
        // `DetectorConfig::from_f64` replaces with its defaults.
        let parse = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .unwrap_or(f64::NAN)
        };
        DetectorConfig::from_f64(parse(&self.stake), parse(&self.min_roi))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SurebetsResponse {
    pub count: usize,
    pub surebets: Vec<Surebet>,
}

impl From<Vec<Surebet>> for SurebetsResponse {
    fn from(surebets: Vec<Surebet>) -> Self {
        Self {
            count: surebets.len(),
            surebets,
        }
    }
}

/// Errors surfaced to HTTP callers.
#[derive(Debug)]
pub enum ApiError {
    InvalidPayload(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidPayload(reason) => {
                warn!(reason = %reason, "Rejected request body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid payload" })),
                )
                    .into_response()
            }
        }
    }
}

/// Build the service router around a shared app.
pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/api/surebets", get(live_surebets).post(posted_surebets))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn live_surebets(
    State(app): State<Arc<App>>,
    Query(query): Query<SurebetsQuery>,
) -> Json<SurebetsResponse> {
    let detector = query.detector();
    info!(
        total_stake = %detector.total_stake,
        min_roi_pct = %detector.min_roi_pct,
        "Live surebets requested"
    );

    let report = app.cycle_with(&detector).await;
    Json(report.surebets.into())
}

async fn posted_surebets(body: Bytes) -> std::result::Result<Json<SurebetsResponse>, ApiError> {
    let (markets, detector) = parse_posted(&body)?;
    Ok(Json(detect(&markets, &detector).into()))
}

/// Decode a `POST /api/surebets` body.
///
/// `markets` defaults to an empty list; `totalStake` and `minRoiPct` default
/// to 100 and 0 unless they are JSON numbers.
fn parse_posted(body: &[u8]) -> std::result::Result<(Vec<MarketOdds>, DetectorConfig), ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidPayload(e.to_string()))?;

    let markets = match value.get("markets") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => serde_json::from_value(raw.clone())
            .map_err(|e| ApiError::InvalidPayload(e.to_string()))?,
    };

    // Non-finite inputs fall back to the detector defaults.
    let number = |key: &str| value.get(key).and_then(Value::as_f64).unwrap_or(f64::NAN);
    let detector = DetectorConfig::from_f64(number("totalStake"), number("minRoiPct"));

    Ok((markets, detector))
}

async fn health() -> &'static str {
    "ok"
}

/// Serve until Ctrl-C.
pub async fn serve(app: Arc<App>, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "HTTP service listening");

    axum::serve(listener, router(app))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
