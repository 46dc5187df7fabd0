// src/config/app.rs

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Where the configuration document is fetched from.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_resource_path")]
    pub resource_path: String,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            resource_path: default_resource_path(),
            connect_timeout_secs: None,
        }
    }
}

impl SourceConfig {
    /// Full URL of the configuration resource.
    pub fn resource_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            AppError::config_validation(
                format!("Invalid base URL '{}': {e}", self.base_url),
                Some("source.base_url"),
            )
        })?;
        base.join(&self.resource_path).map_err(|e| {
            AppError::config_validation(
                format!("Invalid resource path '{}': {e}", self.resource_path),
                Some("source.resource_path"),
            )
        })
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_document_path")]
    pub document_path: String,
    #[serde(default = "default_resource_path")]
    pub resource_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            document_path: default_document_path(),
            resource_path: default_resource_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_resource_path() -> String {
    "/portfolio-config.json".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_document_path() -> String {
    "portfolio-config.json".to_string()
}
