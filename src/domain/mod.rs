//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, plain data types and domain error types.

pub mod broker;
pub mod cache;
pub mod errors;
pub mod mail;
pub mod repositories;

pub use broker::*;
pub use cache::*;
pub use errors::DomainError;
pub use mail::*;
pub use repositories::*;
