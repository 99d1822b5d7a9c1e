//! Typed endpoint calls.
//!
//! One method per API route. No state lives here beyond the shared
//! transport; sequencing and fencing belong to the components built on top.

use crate::config::ClientConfig;
use crate::error::Error;
use crate::transport::{Access, HttpTransport};
use crate::types::batch::{BatchRequest, BatchWireItem, ClassifyRequest};
use crate::types::{
    ClassificationEvent, ClassificationResult, Credentials, StoredVariant, TokenResponse,
    VariantDescriptor, VariantId, VariantQuery,
};
use crate::Result;
use reqwest::Method;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<HttpTransport>,
    genome_build: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(
            Arc::new(HttpTransport::new(config)?),
            config.genome_build.clone(),
        ))
    }

    pub fn with_transport(transport: Arc<HttpTransport>, genome_build: Option<String>) -> Self {
        Self {
            transport,
            genome_build,
        }
    }

    pub fn transport(&self) -> &Arc<HttpTransport> {
        &self.transport
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.transport
            .execute::<()>(Method::GET, "/health", Access::Public, None, &[])
            .await?
            .into_result()
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<TokenResponse> {
        self.credential_call("/auth/register", credentials).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        self.credential_call("/auth/login", credentials).await
    }

    async fn credential_call(&self, path: &str, credentials: &Credentials) -> Result<TokenResponse> {
        let reply = self
            .transport
            .execute(Method::POST, path, Access::Public, Some(credentials), &[])
            .await?;
        if !reply.is_success() {
            return Err(Error::authentication(Some(reply.status), &reply.error_body()));
        }
        reply.decode()
    }

    pub async fn classify(&self, descriptor: &VariantDescriptor) -> Result<ClassificationResult> {
        let body = ClassifyRequest {
            hgvs: descriptor.as_str(),
            genome_build: self.genome_build.as_deref(),
        };
        self.transport.post_json("/variants/classify", &body).await
    }

    pub(crate) async fn classify_batch(
        &self,
        descriptors: &[VariantDescriptor],
    ) -> Result<Vec<BatchWireItem>> {
        let body = BatchRequest {
            variants: descriptors
                .iter()
                .map(|d| ClassifyRequest {
                    hgvs: d.as_str(),
                    genome_build: self.genome_build.as_deref(),
                })
                .collect(),
        };
        self.transport.post_json("/variants/batch", &body).await
    }

    /// The full variant list, exactly as the server returns it.
    pub async fn list_variants(&self) -> Result<Vec<StoredVariant>> {
        self.transport.get_json("/variants", &[]).await
    }

    pub async fn search_variants(&self, query: &VariantQuery) -> Result<Vec<StoredVariant>> {
        self.transport.get_json("/variants", &query.to_pairs()).await
    }

    pub async fn get_variant(&self, id: VariantId) -> Result<StoredVariant> {
        self.transport
            .get_json(&format!("/variants/{}", id), &[])
            .await
    }

    /// Chronological event log for one variant; order is preserved as received.
    pub async fn variant_history(&self, id: VariantId) -> Result<Vec<ClassificationEvent>> {
        self.transport
            .get_json(&format!("/variants/{}/history", id), &[])
            .await
    }
}
