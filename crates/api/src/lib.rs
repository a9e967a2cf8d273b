mod config;
mod error;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Json, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use venture_core::{PromptSettings, TripRequest};
use venture_observability::AppMetrics;
use venture_planner::{ItineraryPlanner, OpenAiCompletionClient};
use venture_storage::{MemoryPlaceStore, Store};

pub use config::{ServiceConfig, DEFAULT_ALLOWED_ORIGIN, DEFAULT_BIND, MAX_REQUEST_BODY_BYTES};
pub use error::ApiError;

pub type Planner = ItineraryPlanner<Store, OpenAiCompletionClient>;

#[derive(Clone)]
pub struct ApiState {
    pub planner: Arc<Planner>,
    pub metrics: Arc<AppMetrics>,
    pub store_backend: &'static str,
    pub allowed_origins: Arc<Vec<String>>,
    pub max_body_bytes: usize,
    pub legacy_error_status: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    store: &'static str,
    model: String,
    metrics: venture_observability::MetricsSnapshot,
}

/// Connects the configured store and builds the router.
pub async fn build_app(config: ServiceConfig) -> Result<Router> {
    let store = if let Some(settings) = config.mongo.as_ref() {
        Store::mongo(settings).await?
    } else if let Some(seed) = config.places_seed.as_ref() {
        Store::Memory(MemoryPlaceStore::from_seed_file(seed)?)
    } else {
        Store::memory()
    };

    build_app_with_store(config, store)
}

pub fn build_app_with_store(config: ServiceConfig, store: Store) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let store_backend = store.backend_name();

    let completion = OpenAiCompletionClient::new(config.openai.clone())
        .context("failed to initialize completion client")?;

    let planner = Arc::new(ItineraryPlanner::new(
        Arc::new(store),
        Arc::new(completion),
        PromptSettings {
            destination_country: config.destination_country.clone(),
        },
        metrics.clone(),
    ));

    info!(
        store = store_backend,
        model = %planner.model(),
        legacy_error_status = config.legacy_error_status,
        "itinerary planner ready"
    );

    let state = ApiState {
        planner,
        metrics,
        store_backend,
        allowed_origins: Arc::new(config.allowed_origins),
        max_body_bytes: config.max_body_bytes,
        legacy_error_status: config.legacy_error_status,
    };

    Ok(build_router(state))
}

/// Oversized bodies surface as a `JsonRejection`, so they share the handler's
/// error body and the legacy status switch.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate_itinerary", post(generate_itinerary))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        store: state.store_backend,
        model: state.planner.model().to_string(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn generate_itinerary(
    State(state): State<ApiState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let api_error = ApiError::from(rejection);
            state.metrics.inc_validation_rejection();
            error!(error = %api_error.message, "rejected itinerary request body");
            return api_error.respond(state.legacy_error_status);
        }
    };

    match state.planner.generate(request).await {
        Ok(itinerary) => (StatusCode::OK, Json(itinerary)).into_response(),
        Err(failure) => {
            let api_error = ApiError::from(&failure);
            error!(
                error = %failure,
                status = api_error.status.as_u16(),
                "itinerary request failed"
            );
            api_error.respond(state.legacy_error_status)
        }
    }
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN)]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
