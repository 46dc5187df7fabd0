// src/server.rs

//! Serves the configuration document at its fixed resource path.

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{future::Future, net::SocketAddr, path::PathBuf, sync::Arc, time::Instant};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ServerState {
    pub document_path: PathBuf,
}

/// Builds the router: the document at `resource_path` plus `/health`.
pub fn create_router(resource_path: &str, state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(resource_path, get(serve_document))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(trace_requests))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn serve_document(State(state): State<Arc<ServerState>>) -> Result<impl IntoResponse> {
    let body = tokio::fs::read(&state.document_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::DocumentNotFound {
                path: state.document_path.display().to_string(),
            }
        } else {
            AppError::io("read_document", &e)
        }
    })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Tags each request with an id and logs its outcome.
async fn trace_requests(
    mut req: Request<Body>,
    next: axum::middleware::Next,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        http.method = %method,
        url.path = %path,
    );

    req.extensions_mut().insert(request_id);

    async move {
        let mut response = next.run(req).await;
        let elapsed = start_time.elapsed();

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert("X-Request-ID", value);
        }

        info!(
            http.response.duration = ?elapsed,
            http.status_code = response.status().as_u16(),
            "Finished processing request"
        );

        response
    }
    .instrument(span)
    .await
}

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn run_server<F>(config: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| {
            AppError::config_validation(
                format!("Invalid server address: {e}"),
                Some("server.host"),
            )
        })?;

    let document_path = PathBuf::from(&config.document_path);
    if !document_path.exists() {
        info!(
            document.path = %document_path.display(),
            "Document file does not exist yet; requests will get 404 until it does"
        );
    }

    let state = Arc::new(ServerState { document_path });
    let app = create_router(&config.resource_path, state);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!(server.address = %addr, error = ?e, "Failed to bind to address");
        AppError::io("bind", &e)
    })?;
    info!(server.address = %addr, resource.path = %config.resource_path, "Server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Server {
            message: e.to_string(),
        })?;

    info!("Server shut down gracefully.");
    Ok(())
}
