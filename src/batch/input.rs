//! Batch input shaping.

use crate::error::Error;
use crate::types::VariantDescriptor;
use crate::Result;

/// Split raw text into descriptors: one per line, trimmed, blank lines dropped.
/// Input order is preserved.
pub fn parse_batch_input(raw: &str) -> Vec<VariantDescriptor> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(VariantDescriptor::from)
        .collect()
}

/// Like [`parse_batch_input`], but an input without a single usable line is
/// reported as [`Error::EmptyInput`].
pub fn try_parse_batch_input(raw: &str) -> Result<Vec<VariantDescriptor>> {
    let descriptors = parse_batch_input(raw);
    if descriptors.is_empty() {
        return Err(Error::EmptyInput {
            message: "No variants to classify".to_string(),
        });
    }
    Ok(descriptors)
}
