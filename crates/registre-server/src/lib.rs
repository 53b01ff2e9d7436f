//! Registre Server Library
#![recursion_limit = "256"]
//!
//! HTTP server for the registry of detainees, employees, incidents, reports,
//! statements, seizures and user accounts.
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)** architecture:
//!
//! - **Commands** (write operations): create, update, delete. Every accepted
//!   command writes exactly one entry to the `audit_logs` ledger, in the same
//!   transaction as the entity write.
//! - **Queries** (read operations): list, get, search. Never audited.
//!
//! ## Audit ledger
//!
//! Each entry records the acting user, the action (`create`, `update`,
//! `status_change`, ...), the entity type and id, and a `details` payload with
//! a French description and, for updates, the `{field: {old, new}}` diff.
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP routing and extractors
//! - **SQLx**: PostgreSQL access and migrations
//! - **Tower**: middleware (CORS, tracing, compression)
//!
//! # Example
//!
//! ```no_run
//! use registre_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await
//! }
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::{ApiResult, AppError};
