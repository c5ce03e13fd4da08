//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and migrations (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Authentication (auth)
//! - Repository implementations (repositories)
//! - Cache backends (cache), durable queue (broker) and SMTP (mail)
//! - Application state (state)

pub mod auth;
pub mod broker;
pub mod cache;
pub mod config;
pub mod db;
pub mod mail;
pub mod repositories;
pub mod server;
pub mod state;

pub use repositories::*;
pub use state::AppState;
