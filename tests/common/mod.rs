//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use portfolio_config::{
    config::SourceConfig, ConfigStore, ConfigTransport, ConfigurationDocument, FetchError,
    TransportResponse,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const FIXTURE_JSON: &str = include_str!("../fixtures/portfolio-config.json");

pub fn fixture_document() -> ConfigurationDocument {
    serde_json::from_str(FIXTURE_JSON).expect("fixture must parse")
}

pub fn source_for(base_url: impl Into<String>) -> SourceConfig {
    SourceConfig {
        base_url: base_url.into(),
        ..SourceConfig::default()
    }
}

type Scripted = Result<TransportResponse, FetchError>;

/// Fake transport that replays scripted responses and counts calls.
///
/// The last scripted response repeats once the script runs out. With a gate,
/// every fetch blocks until `release` hands out a permit.
pub struct ScriptedTransport {
    calls: AtomicUsize,
    script: Mutex<VecDeque<Scripted>>,
    gate: Option<Semaphore>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Scripted>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(responses.into()),
            gate: None,
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(vec![Ok(TransportResponse::ok(body))])
    }

    pub fn status(status: u16, status_text: &str) -> Self {
        Self::new(vec![Ok(TransportResponse::status(status, status_text))])
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> Scripted {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script
                .front()
                .cloned()
                .unwrap_or_else(|| Err(FetchError::transport("no scripted response")))
        }
    }
}

#[async_trait]
impl ConfigTransport for ScriptedTransport {
    async fn fetch(&self) -> Result<TransportResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.next_response()
    }
}

/// Transport whose fetch panics, tearing down the load task.
pub struct PanickingTransport;

#[async_trait]
impl ConfigTransport for PanickingTransport {
    async fn fetch(&self) -> Result<TransportResponse, FetchError> {
        panic!("transport exploded");
    }
}

pub fn store_with(transport: &Arc<ScriptedTransport>) -> ConfigStore {
    ConfigStore::new(Arc::clone(transport) as Arc<dyn ConfigTransport>)
}

/// Polls until the transport has seen `expected` calls.
pub async fn wait_for_calls(transport: &ScriptedTransport, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while transport.calls() < expected {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("transport was not called in time");
}
