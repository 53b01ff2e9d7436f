//! Read access to the audit ledger
//!
//! Output keys are camelCase (`userId`, `entityType`, ...), the shape external
//! review tooling reads.

pub mod error;
pub mod queries;
pub mod routes;

pub use error::AuditLogError;
pub use queries::{GetEntityTrailQuery, ListAuditLogsQuery, ListAuditLogsResponse};
pub use routes::audit_logs_routes;
