// src/store.rs

//! Shared, fetch-once store for the portfolio configuration document.
//!
//! One `ConfigStore` is built at application start and cloned into every
//! consumer. The first `ensure_loaded` call starts the only fetch; every
//! caller that arrives before it settles awaits the same task. Failures are
//! recorded in the snapshot's `error` cell and are never returned to callers.

use crate::config::SourceConfig;
use crate::document::{
    BrandAssets, Certification, CommunityEntry, ConfigurationDocument, Education, Experience,
    PersonalInfo, Planet, Project, Skills, SocialLink,
};
use crate::error::{FetchError, Result};
use crate::transport::{ConfigTransport, HttpTransport};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type SharedLoad = Shared<BoxFuture<'static, ()>>;

/// Point-in-time view of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub document: Option<Arc<ConfigurationDocument>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl StoreSnapshot {
    const fn initial() -> Self {
        Self {
            document: None,
            loading: true,
            error: None,
        }
    }

    /// True once a load attempt has settled, successfully or not.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !self.loading
    }
}

struct Inner {
    transport: Arc<dyn ConfigTransport>,
    state: RwLock<StoreSnapshot>,
    // Lock order: `in_flight` before `state`.
    in_flight: Mutex<Option<SharedLoad>>,
}

/// Cheaply clonable handle to the shared configuration store.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("state", &*self.inner.state.read())
            .finish_non_exhaustive()
    }
}

impl ConfigStore {
    pub fn new(transport: Arc<dyn ConfigTransport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                state: RwLock::new(StoreSnapshot::initial()),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Builds a store backed by an `HttpTransport` for `source`.
    pub fn from_source(source: &SourceConfig) -> Result<Self> {
        let transport = HttpTransport::from_source(source)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Makes sure the document has been requested and waits for that request.
    ///
    /// Returns immediately once a document is present. A failed load stays
    /// failed; use [`ConfigStore::reload`] to try again. Must be called from
    /// within a tokio runtime.
    pub async fn ensure_loaded(&self) {
        if let Some(load) = self.join_or_start(false) {
            load.await;
        }
    }

    /// Like `ensure_loaded`, but starts a fresh attempt if the last one failed.
    ///
    /// A document that loaded successfully is never replaced.
    pub async fn reload(&self) {
        if let Some(load) = self.join_or_start(true) {
            load.await;
        }
    }

    fn join_or_start(&self, retry_failed: bool) -> Option<SharedLoad> {
        let mut in_flight = self.inner.in_flight.lock();

        let failed = {
            let state = self.inner.state.read();
            if state.document.is_some() {
                return None;
            }
            state.error.is_some() && !state.loading
        };

        if let Some(load) = in_flight.as_ref() {
            if !(retry_failed && failed) {
                debug!("Joining existing portfolio config load");
                return Some(load.clone());
            }
            info!("Retrying failed portfolio config load");
        }

        let load = Self::start_load(Arc::clone(&self.inner));
        *in_flight = Some(load.clone());
        Some(load)
    }

    // Runs with `in_flight` held, so the handle is installed before any await.
    fn start_load(inner: Arc<Inner>) -> SharedLoad {
        {
            let mut state = inner.state.write();
            state.loading = true;
            state.error = None;
        }

        let task = tokio::spawn(async move {
            let guard = SettleGuard::new(Arc::clone(&inner));
            let outcome = fetch_document(inner.transport.as_ref()).await;
            match &outcome {
                Ok(document) => info!(
                    planets = document.planets.len(),
                    certifications = document.certifications.len(),
                    "Portfolio config loaded"
                ),
                Err(e) => error!(
                    error.kind = e.error_type(),
                    error = %e,
                    "Error loading portfolio config"
                ),
            }
            guard.settle(outcome);
        });

        async move {
            if let Err(e) = task.await {
                error!(error = %e, "Portfolio config load task did not complete");
            }
        }
        .boxed()
        .shared()
    }

    /// Consistent copy of `document`, `loading` and `error`.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.state.read().clone()
    }

    #[must_use]
    pub fn document(&self) -> Option<Arc<ConfigurationDocument>> {
        self.inner.state.read().document.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.read().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.state.read().error.clone()
    }

    fn section<T>(&self, project: impl FnOnce(&ConfigurationDocument) -> T) -> Option<T> {
        self.document().map(|document| project(&document))
    }

    #[must_use]
    pub fn social_links(&self) -> Vec<SocialLink> {
        self.section(|d| d.social.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn planets(&self) -> Vec<Planet> {
        self.section(|d| d.planets.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn certifications(&self) -> Vec<Certification> {
        self.section(|d| d.certifications.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn experience(&self) -> Vec<Experience> {
        self.section(|d| d.experience.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn projects(&self) -> Vec<Project> {
        self.section(|d| d.projects.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn education(&self) -> Vec<Education> {
        self.section(|d| d.education.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn community(&self) -> Vec<CommunityEntry> {
        self.section(|d| d.community.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn skills(&self) -> Option<Skills> {
        self.section(|d| d.skills.clone()).flatten()
    }

    #[must_use]
    pub fn personal_info(&self) -> Option<PersonalInfo> {
        self.section(|d| d.personal.clone()).flatten()
    }

    #[must_use]
    pub fn brand_assets(&self) -> Option<BrandAssets> {
        self.section(|d| d.brand.clone()).flatten()
    }
}

async fn fetch_document(
    transport: &dyn ConfigTransport,
) -> std::result::Result<ConfigurationDocument, FetchError> {
    let response = transport.fetch().await?;
    if !response.is_success() {
        return Err(FetchError::load(response.status, response.status_text));
    }
    Ok(ConfigurationDocument::from_slice(&response.body)?)
}

/// Writes the outcome of one load attempt and clears `loading` exactly once,
/// including when the task unwinds before reaching an outcome.
struct SettleGuard {
    inner: Arc<Inner>,
    settled: bool,
}

impl SettleGuard {
    fn new(inner: Arc<Inner>) -> Self {
        Self {
            inner,
            settled: false,
        }
    }

    fn settle(mut self, outcome: std::result::Result<ConfigurationDocument, FetchError>) {
        self.apply(outcome);
        self.settled = true;
    }

    fn apply(&self, outcome: std::result::Result<ConfigurationDocument, FetchError>) {
        let mut state = self.inner.state.write();
        match outcome {
            Ok(document) => {
                state.document = Some(Arc::new(document));
                state.error = None;
            }
            Err(e) => state.error = Some(e.to_string()),
        }
        state.loading = false;
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Portfolio config load ended without an outcome");
            self.apply(Err(FetchError::Aborted));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportResponse;
    use async_trait::async_trait;

    struct Fixed(TransportResponse);

    #[async_trait]
    impl ConfigTransport for Fixed {
        async fn fetch(&self) -> std::result::Result<TransportResponse, FetchError> {
            Ok(self.0.clone())
        }
    }

    fn store(response: TransportResponse) -> ConfigStore {
        ConfigStore::new(Arc::new(Fixed(response)))
    }

    #[test]
    fn fresh_store_reports_loading_without_document() {
        let store = store(TransportResponse::ok("{}"));
        let snapshot = store.snapshot();
        assert!(snapshot.document.is_none());
        assert!(snapshot.loading);
        assert!(snapshot.error.is_none());
        assert!(store.planets().is_empty());
        assert!(store.personal_info().is_none());
    }

    #[test]
    fn dropped_guard_settles_as_aborted() {
        let store = store(TransportResponse::ok("{}"));
        drop(SettleGuard::new(Arc::clone(&store.inner)));

        let snapshot = store.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error.as_deref(), Some("Portfolio config load was aborted"));
    }

    #[test]
    fn settled_guard_does_not_overwrite_outcome() {
        let store = store(TransportResponse::ok("{}"));
        SettleGuard::new(Arc::clone(&store.inner)).settle(Ok(ConfigurationDocument::default()));

        let snapshot = store.snapshot();
        assert!(snapshot.document.is_some());
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn partial_document_yields_empty_sections() {
        let store = store(TransportResponse::ok(r#"{"personal": {"name": "Ada"}}"#));
        store.ensure_loaded().await;

        assert_eq!(store.personal_info().map(|p| p.name), Some("Ada".to_string()));
        assert!(store.brand_assets().is_none());
        assert!(store.skills().is_none());
        assert!(store.experience().is_empty());
        assert!(store.community().is_empty());
    }
}
