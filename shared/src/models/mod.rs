//! Domain models for the Evacuation Map Platform

mod facility;
mod load_state;
mod risk;
mod zone;

pub use facility::*;
pub use load_state::*;
pub use risk::*;
pub use zone::*;
