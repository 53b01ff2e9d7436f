//! Audit ledger
//!
//! Every accepted mutation of a tracked entity writes exactly one row to
//! `audit_logs`. Queries (read operations) are not audited.
//!
//! # Writing entries
//!
//! Entity handlers write the entry on the transaction that carries the entity
//! write, so both commit or roll back together:
//!
//! ```rust,ignore
//! let mut tx = pool.begin().await?;
//! let detainee = insert_detainee(&mut *tx, &command, actor.id).await?;
//! audit::log_entity_action(&mut *tx, actor.id, &detainee, AuditEvent::Create, AuditContext::new())
//!     .await?;
//! tx.commit().await?;
//! ```
//!
//! Events with no entity write of their own (session login/logout) go through
//! the detached writer, which logs and swallows persistence errors:
//!
//! ```rust,ignore
//! audit::log_action_detached(&pool, user.id, EntityType::User, AuditEvent::Login, user.id.to_string(), AuditContext::new())
//!     .await;
//! ```
//!
//! # Details payload
//!
//! `details` always holds a non-empty `description`. Updates add a `changed`
//! map of `{field: {old, new}}` produced by `registre_common::capture_changes`;
//! any other context is flattened next to those two keys.

mod logger;
mod models;
mod queries;

pub use logger::{build_entry, log_action, log_action_detached, log_entity_action, Audited};
pub use models::{
    default_description, record_description, AuditAction, AuditContext, AuditDetails, AuditEvent,
    AuditLogEntry, AuditLogFilter, AuditLogView, EntityType, NewAuditLog,
    DEFAULT_AUDIT_QUERY_LIMIT, MAX_AUDIT_QUERY_LIMIT,
};
pub use queries::{
    create_audit_log, get_entity_trail, insert_audit_log, list_audit_logs, recent_activity,
};
