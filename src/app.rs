//! Centrally owned application state.
//!
//! [`ClassifierApp`] wires the components together and is the only place
//! that reacts to a rejected credential: any `Unauthorized` outcome tears the
//! session down and returns every slot to its signed-out state.

use crate::batch::{BatchOrchestrator, BatchState};
use crate::client::classify::ClassificationState;
use crate::client::{ApiClient, ClassificationClient};
use crate::error::{Error, ErrorKind};
use crate::fence::Settled;
use crate::history::{HistoryLoader, HistoryState};
use crate::registry::{RegistryStatus, VariantRegistry};
use crate::session::SessionManager;
use crate::types::{
    AuthSession, BatchItemResult, ClassificationEvent, ClassificationResult, StoredVariant,
    VariantDescriptor, VariantId,
};
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Owned view of everything a rendering layer needs.
#[derive(Debug, Clone)]
pub struct AppSnapshot {
    pub authenticated: bool,
    pub classification: ClassificationState,
    pub batch: BatchState,
    pub variants: Arc<Vec<StoredVariant>>,
    pub registry: RegistryStatus,
    pub history: HistoryState,
}

pub struct ClassifierApp {
    api: ApiClient,
    session: SessionManager,
    registry: Arc<VariantRegistry>,
    classifier: ClassificationClient,
    batch: BatchOrchestrator,
    history: HistoryLoader,
}

impl ClassifierApp {
    pub fn new(api: ApiClient) -> Self {
        let registry = Arc::new(VariantRegistry::new(api.clone()));
        Self {
            session: SessionManager::new(api.clone()),
            classifier: ClassificationClient::new(api.clone(), registry.clone()),
            batch: BatchOrchestrator::new(api.clone(), registry.clone()),
            history: HistoryLoader::new(api.clone()),
            registry,
            api,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let session = self.session.login(email, password).await?;
        self.install(session).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        let session = self.session.register(email, password).await?;
        self.install(session).await
    }

    // Fails if the first refresh shows the new credential is already rejected.
    async fn install(&self, session: AuthSession) -> Result<()> {
        self.session.set_credential(session.token);
        self.registry.refresh().await;
        self.enforce_session();
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(Error::unauthorized("Session was rejected by the server"))
        }
    }

    /// Drop the credential and every piece of per-user state.
    pub fn logout(&self) {
        self.session.logout();
        self.registry.clear();
        self.classifier.reset();
        self.batch.reset();
        self.history.clear();
        info!("signed out");
    }

    pub async fn classify(
        &self,
        descriptor: impl Into<VariantDescriptor>,
    ) -> Result<Settled<ClassificationResult>> {
        let outcome = self.classifier.classify(descriptor).await;
        match &outcome {
            Err(e) if e.kind() == ErrorKind::Unauthorized => self.teardown("classification"),
            _ => self.enforce_session(),
        }
        outcome
    }

    pub async fn run_batch(&self, raw: &str) -> Vec<BatchItemResult> {
        let results = self.batch.run_batch(raw).await;
        let rejected = results.iter().any(|r| {
            matches!(r, BatchItemResult::Failed(err)
                if err.descriptor.is_none() && err.kind == ErrorKind::Unauthorized)
        });
        if rejected {
            self.teardown("batch");
        } else {
            self.enforce_session();
        }
        results
    }

    /// Make `id` the selected variant and load its history.
    pub async fn select_variant(&self, id: VariantId) -> Settled<Vec<ClassificationEvent>> {
        let (outcome, failure) = self.history.load(id).await;
        if failure == Some(ErrorKind::Unauthorized) {
            self.teardown("history");
        }
        outcome
    }

    pub async fn refresh_variants(&self) -> Arc<Vec<StoredVariant>> {
        let variants = self.registry.refresh().await;
        self.enforce_session();
        variants
    }

    pub fn dismiss_classification_error(&self) {
        self.classifier.dismiss();
    }

    // A refresh that bounced off a rejected credential means the session is dead.
    fn enforce_session(&self) {
        if self.registry.status()
            == (RegistryStatus::Stale {
                kind: ErrorKind::Unauthorized,
            })
        {
            self.teardown("registry refresh");
        }
    }

    fn teardown(&self, origin: &str) {
        if self.session.is_authenticated() {
            warn!(origin, "credential rejected; ending session");
        }
        self.logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            authenticated: self.session.is_authenticated(),
            classification: self.classifier.state(),
            batch: self.batch.state(),
            variants: self.registry.variants(),
            registry: self.registry.status(),
            history: self.history.state(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    pub fn history(&self) -> &HistoryLoader {
        &self.history
    }
}
