//! Shared types and geometry for the Evacuation Map Platform
//!
//! This crate contains the zone model and the pure geodesic helpers shared
//! between the backend, the browser map (via WASM), and other components of
//! the system.

pub mod format;
pub mod geo;
pub mod models;
pub mod types;
pub mod validation;

pub use format::*;
pub use geo::*;
pub use models::*;
pub use types::*;
pub use validation::*;
