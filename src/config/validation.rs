// src/config/validation.rs

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use tracing::{debug, warn};
use url::Url;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AppConfig) -> Result<()> {
        debug!("Starting configuration validation");

        if let Err(e) = Self::validate_source(config) {
            warn!("Source validation failed: {}", e);
            return Err(e);
        }
        debug!("Source validation passed");

        if let Err(e) = Self::validate_server(config) {
            warn!("Server config validation failed: {}", e);
            return Err(e);
        }
        debug!("Server config validation passed");

        Ok(())
    }

    fn validate_source(config: &AppConfig) -> Result<()> {
        let url = Url::parse(&config.source.base_url).map_err(|e| {
            AppError::config_validation(
                format!("Invalid URL in source.base_url: {} - {}", config.source.base_url, e),
                Some("source.base_url"),
            )
        })?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::config_validation(
                    format!("Unsupported scheme '{scheme}' in source.base_url. Supported: http, https"),
                    Some("source.base_url"),
                ))
            }
        }

        Self::validate_resource_path(&config.source.resource_path, "source.resource_path")?;

        if config.source.connect_timeout_secs == Some(0) {
            return Err(AppError::config_validation(
                "Connect timeout cannot be 0",
                Some("source.connect_timeout_secs"),
            ));
        }
        Ok(())
    }

    fn validate_server(config: &AppConfig) -> Result<()> {
        if config.server.port == 0 {
            return Err(AppError::config_validation(
                "Server port cannot be 0",
                Some("server.port"),
            ));
        }

        if config.server.document_path.trim().is_empty() {
            return Err(AppError::config_validation(
                "Document path cannot be empty",
                Some("server.document_path"),
            ));
        }

        Self::validate_resource_path(&config.server.resource_path, "server.resource_path")
    }

    fn validate_resource_path(path: &str, field_name: &str) -> Result<()> {
        if !path.starts_with('/') {
            return Err(AppError::config_validation(
                format!("{field_name} must start with '/': {path}"),
                Some(field_name),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = AppConfig::default();
        config.source.base_url = "ftp://example.com".to_string();
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(
            err,
            AppError::ConfigValidation { field: Some(ref f), .. } if f == "source.base_url"
        ));
    }

    #[test]
    fn rejects_relative_resource_path() {
        let mut config = AppConfig::default();
        config.server.resource_path = "portfolio-config.json".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn rejects_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
