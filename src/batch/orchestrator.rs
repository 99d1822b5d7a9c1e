//! Batch classification runs.

use super::input::try_parse_batch_input;
use crate::client::ApiClient;
use crate::error::{ApiErrorBody, ErrorKind};
use crate::fence::{FencedSlot, SlotState};
use crate::registry::VariantRegistry;
use crate::types::batch::BatchWireItem;
use crate::types::{BatchItemError, BatchItemResult, VariantDescriptor};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Key is the number of submitted lines.
pub type BatchState = SlotState<usize, Vec<BatchItemResult>>;

pub struct BatchOrchestrator {
    api: ApiClient,
    registry: Arc<VariantRegistry>,
    slot: FencedSlot<usize, Vec<BatchItemResult>>,
}

impl BatchOrchestrator {
    pub fn new(api: ApiClient, registry: Arc<VariantRegistry>) -> Self {
        Self {
            api,
            registry,
            slot: FencedSlot::new(),
        }
    }

    /// Classify every non-blank line of `raw` in one composite request.
    ///
    /// The result mirrors the filtered input order, one entry per line. If the
    /// aggregate call fails, the result is a single batch-level failure entry.
    /// Input with no usable lines returns an empty list without any network
    /// traffic. The registry is refreshed after every submitted batch, since
    /// the server may have persisted some lines even when the call failed.
    /// The one exception is an `Unauthorized` failure: the session is ending,
    /// so no refresh is issued.
    pub async fn run_batch(&self, raw: &str) -> Vec<BatchItemResult> {
        let descriptors = match try_parse_batch_input(raw) {
            Ok(d) => d,
            Err(e) => {
                debug!(error = %e, "batch skipped");
                return Vec::new();
            }
        };

        let ticket = self.slot.begin(descriptors.len());
        info!(count = descriptors.len(), "batch submitted");

        let (results, refresh) = match self.api.classify_batch(&descriptors).await {
            Ok(items) => (align_results(&descriptors, items), true),
            Err(e) => {
                warn!(error = %e, "batch request failed");
                let kind = e.kind();
                (
                    vec![BatchItemResult::batch_failure(kind, e.user_message())],
                    kind != ErrorKind::Unauthorized,
                )
            }
        };

        self.slot.settle(
            ticket,
            SlotState::Ready {
                key: descriptors.len(),
                value: results.clone(),
            },
        );
        if refresh {
            self.registry.refresh().await;
        }
        results
    }

    pub fn state(&self) -> BatchState {
        self.slot.state()
    }

    pub fn reset(&self) {
        self.slot.reset();
    }
}

/// Pair server items with their source lines by position.
fn align_results(
    descriptors: &[VariantDescriptor],
    items: Vec<BatchWireItem>,
) -> Vec<BatchItemResult> {
    if items.len() != descriptors.len() {
        warn!(
            sent = descriptors.len(),
            received = items.len(),
            "batch response length mismatch"
        );
    }
    let mut items = items.into_iter();
    descriptors
        .iter()
        .map(|descriptor| match items.next() {
            Some(BatchWireItem::Classified(result)) => {
                warn_on_echo_mismatch(descriptor, result.hgvs.as_deref());
                BatchItemResult::Classified {
                    descriptor: descriptor.clone(),
                    result,
                }
            }
            Some(BatchWireItem::Rejected { hgvs, detail }) => {
                warn_on_echo_mismatch(descriptor, hgvs.as_deref());
                let body = ApiErrorBody {
                    detail: Some(detail),
                };
                BatchItemResult::Failed(BatchItemError {
                    descriptor: Some(descriptor.clone()),
                    kind: ErrorKind::Validation,
                    message: body
                        .message()
                        .unwrap_or_else(|| "Variant rejected".to_string()),
                })
            }
            None => BatchItemResult::Failed(BatchItemError {
                descriptor: Some(descriptor.clone()),
                kind: ErrorKind::Transient,
                message: "Missing from batch response".to_string(),
            }),
        })
        .collect()
}

// Alignment stays positional; a differing echo only gets logged.
fn warn_on_echo_mismatch(descriptor: &VariantDescriptor, echoed: Option<&str>) {
    if let Some(echoed) = echoed {
        if echoed != descriptor.as_str() {
            warn!(
                sent = descriptor.as_str(),
                echoed,
                "batch item does not echo its source line"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassificationResult;

    fn classified(hgvs: &str, label: &str) -> BatchWireItem {
        BatchWireItem::Classified(ClassificationResult {
            classification: label.into(),
            applied_rules: Vec::new(),
            rationale: String::new(),
            id: Some(1),
            hgvs: Some(hgvs.into()),
            genome_build: Some("GRCh38".into()),
        })
    }

    #[test]
    fn results_follow_input_positions() {
        let ds = vec![VariantDescriptor::new("A>T"), VariantDescriptor::new("G>C")];
        let out = align_results(&ds, vec![classified("A>T", "Benign"), classified("G>C", "VUS")]);
        let order: Vec<&str> = out.iter().filter_map(|r| r.descriptor()).map(|d| d.as_str()).collect();
        assert_eq!(order, vec!["A>T", "G>C"]);
        assert!(out.iter().all(BatchItemResult::is_success));
    }

    #[test]
    fn short_response_marks_missing_lines() {
        let ds = vec![VariantDescriptor::new("A>T"), VariantDescriptor::new("G>C")];
        let out = align_results(&ds, vec![classified("A>T", "Benign")]);
        assert!(out[0].is_success());
        match &out[1] {
            BatchItemResult::Failed(err) => {
                assert_eq!(err.descriptor.as_ref().map(|d| d.as_str()), Some("G>C"));
                assert_eq!(err.kind, ErrorKind::Transient);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn per_item_rejection_keeps_its_descriptor() {
        let ds = vec![VariantDescriptor::new("junk")];
        let rejected = BatchWireItem::Rejected {
            hgvs: Some("junk".into()),
            detail: serde_json::json!("Invalid HGVS"),
        };
        let out = align_results(&ds, vec![rejected]);
        assert_eq!(
            out,
            vec![BatchItemResult::Failed(BatchItemError {
                descriptor: Some(VariantDescriptor::new("junk")),
                kind: ErrorKind::Validation,
                message: "Invalid HGVS".into(),
            })]
        );
    }

    #[test]
    fn differing_echo_keeps_positional_pairing() {
        let ds = vec![VariantDescriptor::new("A>T"), VariantDescriptor::new("G>C")];
        let rejected = BatchWireItem::Rejected {
            hgvs: Some("normalized G>C".into()),
            detail: serde_json::json!("Unsupported"),
        };
        let out = align_results(&ds, vec![classified("a>t", "Benign"), rejected]);
        assert_eq!(out[0].descriptor().map(|d| d.as_str()), Some("A>T"));
        assert!(out[0].is_success());
        assert_eq!(out[1].descriptor().map(|d| d.as_str()), Some("G>C"));
        assert!(!out[1].is_success());
    }
}
