//! Batch request and result shapes for `POST /variants/batch`.

use super::variant::{ClassificationResult, VariantDescriptor};
use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};

/// One entry of the outbound batch body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ClassifyRequest<'a> {
    pub hgvs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genome_build: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchRequest<'a> {
    pub variants: Vec<ClassifyRequest<'a>>,
}

/// One entry of the batch response. A server may reject a single line
/// without failing the whole batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum BatchWireItem {
    Rejected {
        #[serde(default)]
        hgvs: Option<String>,
        detail: serde_json::Value,
    },
    Classified(ClassificationResult),
}

/// Failure tied to the descriptor it came from.
///
/// `descriptor == None` marks a batch-level failure: the aggregate call
/// itself did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItemError {
    pub descriptor: Option<VariantDescriptor>,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of one line of a batch run, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchItemResult {
    Classified {
        descriptor: VariantDescriptor,
        result: ClassificationResult,
    },
    Failed(BatchItemError),
}

impl BatchItemResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchItemResult::Classified { .. })
    }

    /// The source line this entry belongs to; `None` for a batch-level failure.
    pub fn descriptor(&self) -> Option<&VariantDescriptor> {
        match self {
            BatchItemResult::Classified { descriptor, .. } => Some(descriptor),
            BatchItemResult::Failed(err) => err.descriptor.as_ref(),
        }
    }

    pub fn batch_failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        BatchItemResult::Failed(BatchItemError {
            descriptor: None,
            kind,
            message: message.into(),
        })
    }
}
