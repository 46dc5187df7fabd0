// src/transport.rs

use crate::config::SourceConfig;
use crate::error::{AppError, FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Raw answer of the configuration resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// A `200 OK` response carrying `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    /// A bodiless response with the given status line.
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// The network seam of the store: one GET of the configuration resource.
#[async_trait]
pub trait ConfigTransport: Send + Sync {
    async fn fetch(&self) -> std::result::Result<TransportResponse, FetchError>;
}

/// `ConfigTransport` over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
}

impl HttpTransport {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Builds a client from the source settings and resolves the resource URL.
    pub fn from_source(source: &SourceConfig) -> Result<Self> {
        let url = source.resource_url()?;
        let mut builder = Client::builder();
        if let Some(secs) = source.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| AppError::HttpClientBuild {
            message: e.to_string(),
        })?;
        info!(config.url = %url, "HTTP transport created");
        Ok(Self::new(client, url))
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ConfigTransport for HttpTransport {
    async fn fetch(&self) -> std::result::Result<TransportResponse, FetchError> {
        debug!(config.url = %self.url, "Requesting portfolio config");
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("Unknown Status").to_string();

        if !status.is_success() {
            return Ok(TransportResponse::status(status.as_u16(), status_text));
        }

        let body = response.bytes().await?;
        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            body: body.to_vec(),
        })
    }
}
