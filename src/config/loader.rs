// src/config/loader.rs

use crate::config::{AppConfig, ConfigValidator};
use crate::error::{AppError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Load settings from file, apply environment overrides and validate
pub fn load_config(config_path: &Path) -> Result<AppConfig> {
    let mut config = if config_path.exists() {
        info!("Loading configuration from file: {}", config_path.display());
        load_from_file(config_path)?
    } else {
        info!("Configuration file not found, using defaults");
        AppConfig::default()
    };

    override_with_env(&mut config);

    ConfigValidator::validate(&config)?;

    debug!("Configuration loaded and validated successfully");
    Ok(config)
}

fn load_from_file(config_path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(config_path).map_err(|_| AppError::ConfigNotFound {
        path: config_path.display().to_string(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| AppError::ConfigParse {
        message: format!("Failed to parse config file: {e}"),
        line: e.location().map(|loc| loc.line()),
    })
}

fn override_with_env(config: &mut AppConfig) {
    if let Ok(base_url) = std::env::var("PORTFOLIO_BASE_URL") {
        info!("Overriding base URL from environment variable");
        config.source.base_url = base_url;
    }

    if let Ok(resource_path) = std::env::var("PORTFOLIO_RESOURCE_PATH") {
        info!("Overriding resource path from environment variable: {}", resource_path);
        config.source.resource_path = resource_path.clone();
        config.server.resource_path = resource_path;
    }

    if let Ok(document_path) = std::env::var("PORTFOLIO_DOCUMENT_PATH") {
        info!("Overriding document path from environment variable: {}", document_path);
        config.server.document_path = document_path;
    }

    if let Ok(port_str) = std::env::var("PORT") {
        if let Ok(port) = port_str.parse::<u16>() {
            info!("Overriding server port from environment variable: {}", port);
            config.server.port = port;
        } else {
            warn!("Invalid PORT environment variable: {}", port_str);
        }
    }
}
