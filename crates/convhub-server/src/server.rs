use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use convhub_config::Config;
use convhub_core::{FilterError, FilterPolicy};
use convhub_privacy::Redactor;

use crate::middleware::{privacy_filter, FILTERED_HEADER};

#[derive(Deserialize)]
struct FilterRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

pub struct HubServer {
    pub config: Config,
    pub redactor: Redactor,
}

#[derive(Clone)]
pub struct AppState {
    pub server: Arc<HubServer>,
}

impl HubServer {
    /// Build a server whose matchers use the configured dictionaries
    pub fn new(config: Config) -> Self {
        let redactor = Redactor::with_options(&config.privacy.matcher_options());
        Self { config, redactor }
    }

    pub fn router(self: Arc<Self>) -> Router {
        let state = AppState { server: self };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // The filter endpoint redacts its own body, a second pass would skew its counts
        let unfiltered = Router::new().route("/api/privacy/filter", post(api_privacy_filter));

        Router::new()
            .route("/", get(handle_info))
            .route("/api/health", get(api_health))
            .route("/api/privacy/settings", get(api_privacy_settings))
            .layer(middleware::from_fn_with_state(state.clone(), privacy_filter))
            .merge(unfiltered)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(state)
    }

    pub async fn serve(self, host: &str, port: u16) -> anyhow::Result<()> {
        // Fail at startup rather than on the first response
        let policy = self.config.privacy.resolve_policy()?;
        self.redactor.check_policy(&policy)?;

        let app = Arc::new(self).router();

        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        info!("ConversationHub server listening on {}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Policy for the current request, or the identity policy when filtering is off
    pub(crate) fn request_policy(&self) -> Result<FilterPolicy, FilterError> {
        if !self.config.privacy.enabled {
            return Ok(FilterPolicy::disabled());
        }
        let policy = self.config.privacy.resolve_policy()?;
        self.redactor.check_policy(&policy)?;
        Ok(policy)
    }
}

/// GET / - server info
async fn handle_info() -> Json<Value> {
    Json(json!({
        "name": "convhub",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/health
async fn api_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/privacy/settings - effective filter and retention settings
async fn api_privacy_settings(State(state): State<AppState>) -> Json<Value> {
    let config = &state.server.config;
    let categories: Vec<_> = config.privacy.filters.enabled().collect();

    Json(json!({
        "filter_enabled": config.privacy.enabled,
        "enabled_categories": categories,
        "replacement_text": config.privacy.replacement_text,
        "confidence_threshold": config.privacy.confidence_threshold,
        "retention": config.retention,
    }))
}

/// POST /api/privacy/filter - redact `text`, or walk `data`
async fn api_privacy_filter(
    State(state): State<AppState>,
    Json(req): Json<FilterRequest>,
) -> Response {
    let server = &state.server;
    let policy = match server.request_policy() {
        Ok(policy) => policy,
        Err(e) => {
            warn!("Rejecting filter request: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match req {
        FilterRequest {
            text: Some(text), ..
        } => {
            let result = server.redactor.redact(&text, &policy);
            (filtered_header(result.total()), Json(result)).into_response()
        }
        FilterRequest {
            data: Some(data), ..
        } => match server.redactor.walk_with_summary(&data, &policy) {
            Ok((data, summary)) => (
                filtered_header(summary.values().sum()),
                Json(json!({
                    "data": data,
                    "categories_filtered": summary,
                })),
            )
                .into_response(),
            Err(e @ FilterError::DepthExceeded { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
            }
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        },
        _ => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Request body needs a 'text' or 'data' field",
        )
            .into_response(),
    }
}

fn filtered_header(total: usize) -> [(HeaderName, HeaderValue); 1] {
    [(FILTERED_HEADER, HeaderValue::from(total as u64))]
}
