//! Single-variant classification with last-request-wins fencing.

use crate::client::ApiClient;
use crate::error::ErrorKind;
use crate::fence::{FencedSlot, Settled, SlotState, Ticket};
use crate::registry::VariantRegistry;
use crate::types::{ClassificationResult, VariantDescriptor};
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub type ClassificationState = SlotState<VariantDescriptor, ClassificationResult>;

pub struct ClassificationClient {
    api: ApiClient,
    registry: Arc<VariantRegistry>,
    slot: FencedSlot<VariantDescriptor, ClassificationResult>,
}

impl ClassificationClient {
    pub fn new(api: ApiClient, registry: Arc<VariantRegistry>) -> Self {
        Self {
            api,
            registry,
            slot: FencedSlot::new(),
        }
    }

    /// Classify one descriptor and make it the current result.
    ///
    /// Returns `Settled::Superseded` when another `classify` was issued while
    /// this one was in flight; its outcome is dropped. A stale `Unauthorized`
    /// is still returned as an error, with the slot left untouched.
    /// The registry refresh runs after the response arrives, whatever the
    /// outcome, except when the credential was rejected.
    ///
    /// Errors are the current request's own failure: `Transient` returns the
    /// slot to `Idle`, `Validation` and `Unauthorized` leave a dismissible
    /// notice. Tearing the session down on `Unauthorized` is the caller's job.
    pub async fn classify(
        &self,
        descriptor: impl Into<VariantDescriptor>,
    ) -> Result<Settled<ClassificationResult>> {
        let descriptor = descriptor.into();
        let ticket = self.slot.begin(descriptor.clone());
        debug!(hgvs = descriptor.as_str(), seq = ticket.seq(), "classification issued");

        let outcome = self.api.classify(&descriptor).await;
        let refresh = !matches!(&outcome, Err(e) if e.kind() == ErrorKind::Unauthorized);

        let settled = self.settle(ticket, descriptor, outcome);
        if refresh {
            self.registry.refresh().await;
        }
        settled
    }

    pub(crate) fn settle(
        &self,
        ticket: Ticket,
        descriptor: VariantDescriptor,
        outcome: Result<ClassificationResult>,
    ) -> Result<Settled<ClassificationResult>> {
        match outcome {
            Ok(result) => {
                let next = SlotState::Ready {
                    key: descriptor.clone(),
                    value: result.clone(),
                };
                if self.slot.settle(ticket, next) {
                    info!(
                        hgvs = descriptor.as_str(),
                        classification = result.classification.as_str(),
                        "classification applied"
                    );
                    Ok(Settled::Applied(result))
                } else {
                    debug!(hgvs = descriptor.as_str(), seq = ticket.seq(), "stale classification discarded");
                    Ok(Settled::Superseded)
                }
            }
            Err(e) => {
                let next = match e.kind() {
                    ErrorKind::Transient => SlotState::Idle,
                    _ => SlotState::Failed {
                        key: descriptor.clone(),
                        notice: e.notice(),
                    },
                };
                if self.slot.settle(ticket, next) {
                    Err(e)
                } else if e.kind() == ErrorKind::Unauthorized {
                    // A rejected credential outlives the request that saw it.
                    Err(e)
                } else {
                    debug!(hgvs = descriptor.as_str(), error = %e, "stale classification error discarded");
                    Ok(Settled::Superseded)
                }
            }
        }
    }

    pub fn state(&self) -> ClassificationState {
        self.slot.state()
    }

    pub fn dismiss(&self) {
        self.slot.dismiss();
    }

    pub fn reset(&self) {
        self.slot.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::Error;

    fn client() -> ClassificationClient {
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let registry = Arc::new(VariantRegistry::new(api.clone()));
        ClassificationClient::new(api, registry)
    }

    fn verdict(label: &str) -> ClassificationResult {
        ClassificationResult {
            classification: label.to_string(),
            applied_rules: Vec::new(),
            rationale: String::new(),
            id: None,
            hgvs: None,
            genome_build: None,
        }
    }

    #[test]
    fn slower_first_request_cannot_overwrite_second() {
        let c = client();
        let d1 = VariantDescriptor::new("NM_1:c.1A>T");
        let d2 = VariantDescriptor::new("NM_2:c.2G>C");
        let t1 = c.slot.begin(d1.clone());
        let t2 = c.slot.begin(d2.clone());

        let second = c.settle(t2, d2.clone(), Ok(verdict("Benign"))).unwrap();
        assert_eq!(second, Settled::Applied(verdict("Benign")));

        let first = c.settle(t1, d1, Ok(verdict("Pathogenic"))).unwrap();
        assert!(first.is_superseded());

        assert_eq!(
            c.state(),
            SlotState::Ready {
                key: d2,
                value: verdict("Benign")
            }
        );
    }

    #[test]
    fn stale_error_is_swallowed() {
        let c = client();
        let d1 = VariantDescriptor::new("bad");
        let t1 = c.slot.begin(d1.clone());
        c.slot.begin(VariantDescriptor::new("good"));
        let out = c.settle(
            t1,
            d1,
            Err(Error::Validation {
                status: 422,
                message: "nope".into(),
            }),
        );
        assert!(matches!(out, Ok(Settled::Superseded)));
        assert!(c.state().is_pending());
    }

    #[test]
    fn stale_unauthorized_is_reported_without_touching_slot() {
        let c = client();
        let d1 = VariantDescriptor::new("NM_1:c.1A>T");
        let t1 = c.slot.begin(d1.clone());
        let d2 = VariantDescriptor::new("NM_2:c.2G>C");
        let t2 = c.slot.begin(d2.clone());
        c.settle(t2, d2.clone(), Ok(verdict("Benign"))).unwrap();

        let err = c
            .settle(t1, d1, Err(Error::unauthorized("Could not validate credentials")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            c.state(),
            SlotState::Ready {
                key: d2,
                value: verdict("Benign")
            }
        );
    }

    #[test]
    fn transient_error_returns_to_idle() {
        let c = client();
        let d = VariantDescriptor::new("NM_1:c.1A>T");
        let t = c.slot.begin(d.clone());
        let err = c
            .settle(
                t,
                d,
                Err(Error::Remote {
                    status: 503,
                    message: "busy".into(),
                }),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert_eq!(c.state(), SlotState::Idle);
    }

    #[test]
    fn validation_error_is_shown_verbatim_until_dismissed() {
        let c = client();
        let d = VariantDescriptor::new("c.garbage");
        let t = c.slot.begin(d.clone());
        let _ = c.settle(
            t,
            d.clone(),
            Err(Error::Validation {
                status: 422,
                message: "Unsupported HGVS syntax".into(),
            }),
        );
        match c.state() {
            SlotState::Failed { key, notice } => {
                assert_eq!(key, d);
                assert_eq!(notice.message, "Unsupported HGVS syntax");
                assert_eq!(notice.kind, ErrorKind::Validation);
            }
            other => panic!("unexpected state: {:?}", other),
        }
        c.dismiss();
        assert_eq!(c.state(), SlotState::Idle);
    }

    #[tokio::test]
    async fn classify_without_session_fails_unauthorized() {
        let c = client();
        let err = c.classify("NM_1:c.1A>T").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(matches!(c.state(), SlotState::Failed { .. }));
    }
}
