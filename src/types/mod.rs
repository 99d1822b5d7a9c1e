//! # Types Module
//!
//! Wire and domain types exchanged with the classification API.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`VariantDescriptor`] | Opaque HGVS string as typed by the user |
//! | [`Strength`] | ACMG/AMP evidence strength (closed set) |
//! | [`AppliedRule`] | One evidence rule that fired |
//! | [`ClassificationResult`] | Verdict for a single classify call |
//! | [`StoredVariant`] | Server-side persisted variant record |
//! | [`ClassificationEvent`] | One entry of a variant's append-only history |
//! | [`BatchItemResult`] | Per-line outcome of a batch run |
//! | [`AuthSession`] | Installed bearer credential |
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`variant`] | Variant, rule, and history types |
//! | [`batch`] | Batch request/response shapes |
//! | [`auth`] | Credential request/response shapes |

pub mod auth;
pub mod batch;
pub mod variant;

pub use auth::{AuthSession, Credentials, TokenResponse};
pub use batch::{BatchItemError, BatchItemResult};
pub use variant::{
    AppliedRule, ClassificationEvent, ClassificationResult, RuleKey, StoredVariant, Strength,
    VariantDescriptor, VariantId, VariantQuery,
};
