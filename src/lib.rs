// src/lib.rs

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod server;
pub mod store;
pub mod transport;
pub mod views;

use crate::cli::Section;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub use config::AppConfig;
pub use document::ConfigurationDocument;
pub use error::{AppError, FetchError, Result};
pub use store::{ConfigStore, StoreSnapshot};
pub use transport::{ConfigTransport, HttpTransport, TransportResponse};

/// Loads, validates and logs the settings file.
pub fn setup_configuration(config_path_override: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = config_path_override.unwrap_or_else(|| PathBuf::from("portfolio.yaml"));

    let config_path_display = config_path.display().to_string();
    if config_path.exists() {
        info!(config.path = %config_path_display, "Using configuration file");
    } else {
        info!(
            config.path = %config_path_display,
            "Optional configuration file not found. Using defaults and environment variables."
        );
    }

    let app_config = config::load_config(&config_path).map_err(|e| {
        error!(
            config.path = %config_path_display,
            error = ?e,
            "Failed to load or validate configuration."
        );
        e
    })?;

    info!(
        source.base_url = %app_config.source.base_url,
        source.resource_path = %app_config.source.resource_path,
        server.port = app_config.server.port,
        "Configuration loaded and validated successfully."
    );

    Ok(app_config)
}

/// Projects one section of the loaded store into JSON.
///
/// Unloaded stores yield empty arrays or `null`, matching the accessors.
pub fn section_json(store: &ConfigStore, section: Option<Section>) -> Result<Value> {
    let value = match section {
        None => serde_json::to_value(store.document().as_deref())?,
        Some(Section::Personal) => serde_json::to_value(store.personal_info())?,
        Some(Section::Brand) => serde_json::to_value(store.brand_assets())?,
        Some(Section::Social) => serde_json::to_value(store.social_links())?,
        Some(Section::Planets) => serde_json::to_value(store.planets())?,
        Some(Section::Certifications) => serde_json::to_value(store.certifications())?,
        Some(Section::Experience) => serde_json::to_value(store.experience())?,
        Some(Section::Projects) => serde_json::to_value(store.projects())?,
        Some(Section::Skills) => serde_json::to_value(store.skills())?,
        Some(Section::Education) => serde_json::to_value(store.education())?,
        Some(Section::Community) => serde_json::to_value(store.community())?,
    };
    Ok(value)
}

/// Loads the document through `store` and returns the requested section.
///
/// A failed load surfaces as `AppError::ConfigUnavailable` carrying the
/// store's error message.
pub async fn show(store: &ConfigStore, section: Option<Section>) -> Result<Value> {
    store.ensure_loaded().await;

    let snapshot = store.snapshot();
    if let Some(message) = snapshot.error {
        return Err(AppError::ConfigUnavailable { message });
    }
    section_json(store, section)
}

/// Parses a local document and returns its per-section entry counts.
pub fn validate_document(path: &Path) -> Result<Vec<(&'static str, usize)>> {
    let body = std::fs::read(path).map_err(|e| AppError::io("read_document", &e))?;
    let document = ConfigurationDocument::from_slice(&body).map_err(FetchError::from)?;
    info!(document.path = %path.display(), "Document parsed successfully");
    Ok(document.section_counts())
}
