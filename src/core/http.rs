//! Axum HTTP surface: health, metrics export, and the evaluation API.

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::db::QuestDatabase;
use crate::metrics::Metrics;
use crate::models::signal::{Evaluation, SignalOutput};
use crate::models::snapshot::{IndicatorSnapshot, SessionState};
use crate::signals::aggregation::{Aggregator, MarketSummary};
use crate::signals::engine::SignalEngine;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub database: Option<Arc<QuestDatabase>>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "tickpulse-signal-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Records the request counter, in-flight gauge, and latency histogram
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "request failed"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct EvaluateRequest {
    snapshot: IndicatorSnapshot,
    session: SessionState,
}

#[derive(Debug, Deserialize)]
struct SignalsQuery {
    symbol: Option<String>,
    limit: Option<usize>,
}

/// Evaluate a single snapshot on demand
async fn evaluate_snapshot(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<Evaluation>, StatusCode> {
    let start = Instant::now();

    state.metrics.signal_evaluations_active.inc();
    let evaluation = SignalEngine::evaluate(&request.snapshot, request.session);
    state.metrics.signal_evaluations_total.inc();
    state
        .metrics
        .signal_evaluation_duration_seconds
        .observe(start.elapsed().as_secs_f64());
    state.metrics.signal_evaluations_active.dec();

    if !evaluation.is_ready() {
        state.metrics.insufficient_data_total.inc();
    }

    Ok(Json(evaluation))
}

/// Aggregate a batch of signals into a market-wide summary
async fn summarize_signals(
    Json(signals): Json<Vec<SignalOutput>>,
) -> Result<Json<MarketSummary>, StatusCode> {
    Ok(Json(Aggregator::summarize(&signals)))
}

/// List stored signals, optionally filtered by symbol, newest first
async fn list_signals(
    State(state): State<AppState>,
    Query(params): Query<SignalsQuery>,
) -> Result<Json<Value>, StatusCode> {
    let db = state
        .database
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let signals = db
        .get_signals(params.symbol.as_deref(), params.limit)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load signals");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(json!(signals)))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/evaluate", post(evaluate_snapshot))
        .route("/api/summary", post(summarize_signals))
        .route("/api/signals", get(list_signals))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());

    // Optional: signal history endpoints return 503 without it
    let database = match crate::db::QuestDatabase::new().await {
        Ok(db) => {
            info!("questdb connection established");
            Some(Arc::new(db))
        }
        Err(e) => {
            tracing::warn!(error = %e, "questdb unavailable, signal history disabled");
            None
        }
    };

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: start_time.clone(),
        database,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port, "http server listening, metrics exported at /metrics");
    axum::serve(listener, app).await?;

    Ok(())
}
