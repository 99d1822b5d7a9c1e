//! Client-side access to the classification API.
//!
//! [`ApiClient`] is the typed endpoint layer; [`ClassificationClient`] adds
//! request fencing and registry refreshes on top of it.

pub mod api;
pub mod builder;
pub mod classify;

pub use api::{ApiClient, HealthStatus};
pub use builder::ClientBuilder;
pub use classify::{ClassificationClient, ClassificationState};
