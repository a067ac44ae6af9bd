use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::SummaryClient;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::{Config, SecurityConfig};
use crate::middleware::{metrics_handler, metrics_middleware, security_headers_middleware, trace_id};
use crate::routes::{gatherings, health};
use crate::services::{AnthropicSummaryClient, GatheringService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// `None` when no summarization credential is configured.
    pub summary_client: Option<Arc<dyn SummaryClient>>,
}

impl AppState {
    pub fn gathering_service(&self) -> GatheringService {
        GatheringService::new(self.pool.clone(), self.summary_client.clone())
    }
}

/// Builds the router, creating the summary client from configuration.
pub fn create_app(config: Config, pool: PgPool) -> Router {
    let summary_client = build_summary_client(&config);
    create_app_with_summary_client(config, pool, summary_client)
}

/// Builds the router with an explicit summary client.
pub fn create_app_with_summary_client(
    config: Config,
    pool: PgPool,
    summary_client: Option<Arc<dyn SummaryClient>>,
) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        summary_client,
    };

    let cors = cors_layer(&config.security);

    let gathering_routes = Router::new()
        .route(
            "/api/gatherings",
            post(gatherings::create_gathering).get(gatherings::search_gatherings),
        )
        .route("/api/gatherings/:id", get(gatherings::get_gathering))
        .route(
            "/api/gatherings/:id/ratings",
            post(gatherings::submit_rating),
        )
        .route("/api/gatherings/:id/results", get(gatherings::get_results))
        .route(
            "/api/gatherings/:id/ai-summary",
            get(gatherings::get_ai_summary),
        );

    let operational_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(gathering_routes)
        .merge(operational_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

fn build_summary_client(config: &Config) -> Option<Arc<dyn SummaryClient>> {
    if !config.summary.is_configured() {
        info!("Summary API key not set, comment summaries use fallback messages");
        return None;
    }

    match AnthropicSummaryClient::new(config.summary.clone()) {
        Ok(client) => {
            info!(model = %config.summary.model, "Summary client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!(error = %e, "Failed to initialize summary client, using fallback messages");
            None
        }
    }
}

/// Any origin when none are configured (development), otherwise only the
/// listed ones.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origin = if security.cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<_> = security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
