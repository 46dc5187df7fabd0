// tests/server_tests.rs

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{fixture_document, source_for, FIXTURE_JSON};
use portfolio_config::{
    error::ErrorResponse,
    server::{create_router, ServerState},
    ConfigStore,
};
use serde_json::Value;
use std::{io::Write, path::PathBuf, sync::Arc};
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

const RESOURCE: &str = "/portfolio-config.json";

fn document_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn test_server(document_path: PathBuf) -> TestServer {
    let state = Arc::new(ServerState { document_path });
    TestServer::new(create_router(RESOURCE, state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = test_server(PathBuf::from("does-not-matter.json"));

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_serves_document_as_json() {
    let file = document_file(FIXTURE_JSON);
    let server = test_server(file.path().to_path_buf());

    let response = server.get(RESOURCE).await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "application/json"
    );
    let served: portfolio_config::ConfigurationDocument = response.json();
    assert_eq!(served, fixture_document());
}

#[tokio::test]
async fn test_missing_document_is_not_found() {
    let server = test_server(PathBuf::from("/nonexistent/portfolio-config.json"));

    let response = server.get(RESOURCE).await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error_type, "document_not_found");
    assert_eq!(body.status, 404);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = test_server(PathBuf::from("does-not-matter.json"));

    let response = server.get("/health").await;

    let request_id = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_store_loads_from_served_document() {
    let file = document_file(FIXTURE_JSON);
    let state = Arc::new(ServerState {
        document_path: file.path().to_path_buf(),
    });
    let app = create_router(RESOURCE, state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    let store = ConfigStore::from_source(&source_for(format!("http://{addr}"))).unwrap();
    store.ensure_loaded().await;

    assert!(store.error().is_none());
    assert_eq!(store.social_links().len(), 2);
    assert_eq!(store.planets(), fixture_document().planets);
}

#[tokio::test]
async fn test_store_reports_missing_served_document() {
    let state = Arc::new(ServerState {
        document_path: PathBuf::from("/nonexistent/portfolio-config.json"),
    });
    let app = create_router(RESOURCE, state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    let store = ConfigStore::from_source(&source_for(format!("http://{addr}"))).unwrap();
    store.ensure_loaded().await;

    assert!(store.error().unwrap().contains("Not Found"));
    assert!(store.document().is_none());
}
