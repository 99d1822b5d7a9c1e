//! # Batch Module
//!
//! Turns a block of pasted text into one composite classification request
//! and maps the response back onto the source lines.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`parse_batch_input`] | Line splitting, trimming, blank-line removal |
//! | [`BatchOrchestrator`] | Dispatch, per-line aggregation, registry refresh |

mod input;
mod orchestrator;

pub use input::{parse_batch_input, try_parse_batch_input};
pub use orchestrator::{BatchOrchestrator, BatchState};
