//! Request and response shapes of the workflow REST endpoints.
//!
//! These types mirror the JSON exactly as the backend sends it, loose field
//! names included. The adapters in [`crate::workflow::conversion`] turn them
//! into the canonical model.
pub mod types;

pub use types::*;
