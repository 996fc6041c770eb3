use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use common::config::{Config, ConfigError, ServerConfig};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::{error::Error, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    analyzer::Analyzer,
    error::AnalysisError,
    model::{AnalyzeRequest, AnalyzeResponse, RawAd},
    scorers::Scorer,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "target/debug/config/total_config.yaml")]
    pub config: String,
}

pub fn initialize_executable() -> Result<Config, ConfigError> {
    // A missing .env file is the normal production case.
    let dotenv = dotenvy::dotenv().ok();

    let args = Args::parse();
    println!("Loading config from: {}", args.config);
    if let Some(path) = dotenv {
        println!("Loaded environment from: {:?}", path);
    }

    Config::load(&args.config)
}

/// `RUST_LOG` takes precedence over the configured level.
pub fn initialize_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("Tracing already initialized: {}", e);
    }
}

pub struct AppState<S: Scorer + 'static> {
    analyzer: Arc<Analyzer<S>>,
    metrics: Option<PrometheusHandle>,
}

impl<S: Scorer + 'static> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            analyzer: self.analyzer.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: Scorer + 'static> AppState<S> {
    pub fn new(analyzer: Arc<Analyzer<S>>, metrics: Option<PrometheusHandle>) -> Self {
        Self { analyzer, metrics }
    }
}

pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = match allowed_origin.trim() {
        "*" => AllowOrigin::any(),
        exact => AllowOrigin::exact(
            HeaderValue::from_str(exact)
                .map_err(|e| ConfigError::Invalid(format!("server.allowed_origin {:?}: {}", exact, e)))?,
        ),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}

pub fn build_router<S: Scorer + 'static>(
    state: AppState<S>,
    config: &ServerConfig,
) -> Result<Router, ConfigError> {
    Ok(Router::new()
        .route("/analyze", post(analyze::<S>))
        .route("/.netlify/functions/analyze", post(analyze::<S>))
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origin)?)
        .with_state(state))
}

/// An empty body counts as `{}`.
pub fn parse_request(body: &str) -> Result<RawAd, AnalysisError> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    let request: AnalyzeRequest = serde_json::from_str(body)?;
    request.into_ad()
}

pub async fn analyze<S: Scorer + 'static>(
    State(state): State<AppState<S>>,
    body: String,
) -> Response {
    let ad = match parse_request(&body) {
        Ok(ad) => ad,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected analysis request");
            return e.into_response();
        }
    };

    tracing::info!(title = %ad.title, model = state.analyzer.has_model(), "Analyzing listing");
    let assessment = state.analyzer.analyze(&ad).await;
    tracing::info!(
        score = assessment.overall_score,
        risk_level = %assessment.risk_level,
        decision = %assessment.decision,
        "Analysis complete"
    );

    (StatusCode::OK, Json(AnalyzeResponse::success(assessment))).into_response()
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK").into_response()
}

pub async fn render_metrics<S: Scorer + 'static>(State(state): State<AppState<S>>) -> Response {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

pub async fn run_server<S: Scorer + 'static>(
    config: ServerConfig,
    analyzer: Analyzer<S>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Metrics recorder unavailable, /metrics disabled");
            None
        }
    };

    let state = AppState::new(Arc::new(analyzer), metrics);
    let app = build_router(state, &config)?;

    tracing::info!("Starting analysis service at {}", config.server_address);
    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
