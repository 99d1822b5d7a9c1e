//! # cardio-client
//!
//! Client runtime for the Cardio Classifier API. The remote service scores
//! HGVS variant descriptors against ACMG/AMP evidence rules; this crate owns
//! everything on the client side of that boundary.
//!
//! ## Overview
//!
//! - **Session**: one bearer credential, attached to every protected call
//!   while present and removed from every call built after logout.
//! - **Classification**: single-variant requests with last-request-wins
//!   fencing, so a slow response for an abandoned descriptor never replaces
//!   the current one.
//! - **Batch**: pasted text becomes one composite request whose results are
//!   aligned back onto the source lines.
//! - **Registry**: a read-through cache of stored variants, replaced
//!   wholesale after every mutation.
//! - **History**: the event log for the selected variant, fenced on
//!   selection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardio_client::ClientBuilder;
//!
//! #[tokio::main]
//! async fn main() -> cardio_client::Result<()> {
//!     let app = ClientBuilder::new()
//!         .base_url("http://localhost:8000")
//!         .build()?;
//!
//!     app.login("tester@example.com", "secret123").await?;
//!     if let Some(result) = app.classify("NM_000000.0:c.123A>T").await?.applied() {
//!         println!("{}", result.classification);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`app`] | Central application state and transitions |
//! | [`session`] | Credential install/clear, login, registration |
//! | [`client`] | Typed endpoints and fenced classification |
//! | [`batch`] | Batch input shaping and aggregation |
//! | [`registry`] | Cached stored-variant list |
//! | [`history`] | Per-variant classification history |
//! | [`fence`] | Last-request-wins request slots |
//! | [`transport`] | HTTP transport and credential cell |
//! | [`types`] | Wire and domain types |
//! | [`config`] | Client configuration |

pub mod app;
pub mod batch;
pub mod client;
pub mod config;
pub mod fence;
pub mod history;
pub mod registry;
pub mod session;
pub mod transport;
pub mod types;

pub use app::{AppSnapshot, ClassifierApp};
pub use batch::{parse_batch_input, BatchOrchestrator};
pub use client::{ApiClient, ClassificationClient, ClientBuilder};
pub use config::ClientConfig;
pub use fence::{Settled, SlotState};
pub use history::HistoryLoader;
pub use registry::{RegistryStatus, VariantRegistry};
pub use session::SessionManager;
pub use types::{
    AppliedRule, AuthSession, BatchItemResult, ClassificationEvent, ClassificationResult,
    StoredVariant, Strength, VariantDescriptor, VariantId,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind, ErrorNotice};
