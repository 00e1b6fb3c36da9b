pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod upstream;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{any, get},
    Router,
};
use lambda_http::{run, Error};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::{info, Level};

use crate::config::{ApiKey, Config, Runtime};
use crate::routes::health;
use crate::upstream::{HttpOddsApi, OddsApi, ODDS_API_BASE_URL};

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn OddsApi>,
    pub base_url: String,
    pub api_key: Option<ApiKey>,
}

impl AppState {
    pub fn new(api: Arc<dyn OddsApi>, api_key: Option<ApiKey>) -> Self {
        Self {
            api,
            base_url: ODDS_API_BASE_URL.to_string(),
            api_key,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", any(routes::proxy::handler))
        .route("/api/proxy", any(routes::proxy::handler))
        .route("/health", get(health::health))
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::make_span)
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

pub async fn run_app(config: Config) -> Result<(), Error> {
    logging::init_logger(config.log_level);

    let api = HttpOddsApi::new().context("Failed to create HTTP client")?;
    let state = AppState::new(Arc::new(api), config.api_key);
    let app = create_app(state);

    match config.runtime {
        Runtime::Lambda => run(app).await,
        Runtime::Local(addr) => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;
            info!(%addr, "Listening");
            axum::serve(listener, app)
                .await
                .context("Local server failed")?;
            Ok(())
        }
    }
}
