//! External API integrations

pub mod postgrest;

pub use postgrest::PostgrestClient;
