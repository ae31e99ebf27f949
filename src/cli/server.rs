//! HTTP server mode
//!
//! Every `GET /<path>` is translated into an upstream query and answered
//! with a streamed JSON array.

use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::engine::FetchEngine;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::output::stream_json_array;
use crate::query::translate;
use crate::template::parse_query;

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServiceConfig>,
    engine: FetchEngine,
}

impl AppState {
    /// Build the state with an authenticated upstream client
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = HttpClient::with_auth(config.http.clone(), config.auth.clone())?;
        Ok(Self::with_engine(config, FetchEngine::new(Arc::new(client))))
    }

    /// Build the state around an existing engine
    pub fn with_engine(config: ServiceConfig, engine: FetchEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine,
        }
    }

    /// Shared configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Build the router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/*path", get(entities))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let port = config.port;
    let app = build_router(AppState::new(config)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to port {port}"))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Adapter endpoint
async fn entities(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let params = parse_query(query.as_deref().unwrap_or_default());
    let config = state.config();
    let translated = translate(&path, &params, &config.templates, &config.defaults);

    match stream_json_array(state.engine.stream(translated)).await {
        Ok(body) => (
            [(header::CONTENT_TYPE, "application/json")],
            Body::from_stream(body),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Map a failure before the first byte to a response
fn error_response(err: &Error) -> Response {
    match err {
        Error::Upstream { status, body } => {
            warn!("Upstream answered {status}: {body}");
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, body.clone()).into_response()
        }
        _ => {
            let diagnostic = err.diagnostic();
            error!("{diagnostic}");
            (StatusCode::INTERNAL_SERVER_ERROR, diagnostic).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_mirrors_upstream_status() {
        let response = error_response(&Error::upstream(404, "not found"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = error_response(&Error::upstream(503, "busy"));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_response_internal() {
        let response = error_response(&Error::decode("bad body"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
