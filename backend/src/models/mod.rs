//! Zone models used by the API
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
