//! Generic audit helper
//!
//! One helper, parameterised by entity type, builds the ledger entry for any
//! tracked entity. The description rule: a caller-supplied description wins,
//! otherwise `"<verb phrase> <noun phrase>"` is synthesised from the action and
//! the entity type.

use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::models::{
    default_description, record_description, AuditContext, AuditDetails, AuditEvent,
    AuditLogEntry, EntityType, NewAuditLog,
};
use super::queries::{create_audit_log, insert_audit_log};

/// A record type tracked by the ledger
pub trait Audited {
    const ENTITY_TYPE: EntityType;

    /// Value stored in `entity_id`
    fn audit_id(&self) -> String;

    /// Human-readable name used in descriptions ("Jean Mukendi")
    fn audit_label(&self) -> String;
}

/// Assemble the row for one event without touching the database
pub fn build_entry(
    actor_id: Uuid,
    entity_type: EntityType,
    event: AuditEvent,
    entity_id: impl Into<String>,
    context: AuditContext,
) -> NewAuditLog {
    let action = event.action();
    let description = context
        .description
        .unwrap_or_else(|| default_description(action, entity_type));

    NewAuditLog {
        user_id: actor_id,
        action,
        entity_type,
        entity_id: entity_id.into(),
        details: AuditDetails {
            description,
            changed: event.into_changes(),
            context: context.fields,
        },
    }
}

/// Write one entry on the caller's executor (normally its open transaction)
pub async fn log_action<'e, E>(
    executor: E,
    actor_id: Uuid,
    entity_type: EntityType,
    event: AuditEvent,
    entity_id: impl Into<String>,
    context: AuditContext,
) -> Result<AuditLogEntry, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let entry = build_entry(actor_id, entity_type, event, entity_id, context);
    insert_audit_log(executor, &entry).await
}

/// [`log_action`] for a typed record
///
/// Without an explicit description the entry names the record:
/// "Suppression de la saisie Toyota Corolla".
pub async fn log_entity_action<'e, T, E>(
    executor: E,
    actor_id: Uuid,
    record: &T,
    event: AuditEvent,
    context: AuditContext,
) -> Result<AuditLogEntry, sqlx::Error>
where
    T: Audited,
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let context = named_context(record, &event, context);
    log_action(executor, actor_id, T::ENTITY_TYPE, event, record.audit_id(), context).await
}

/// Detached variant: errors are logged and swallowed
pub async fn log_action_detached(
    pool: &PgPool,
    actor_id: Uuid,
    entity_type: EntityType,
    event: AuditEvent,
    entity_id: impl Into<String>,
    context: AuditContext,
) {
    let entry = build_entry(actor_id, entity_type, event, entity_id, context);
    create_audit_log(pool, entry).await;
}

fn named_context<T: Audited>(record: &T, event: &AuditEvent, context: AuditContext) -> AuditContext {
    if context.has_description() {
        return context;
    }
    let description = record_description(event.action(), T::ENTITY_TYPE, &record.audit_label());
    context.description(description)
}
