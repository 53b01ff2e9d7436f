//! Database queries for audit logs
//!
//! The ledger is append-only: nothing here issues UPDATE or DELETE on `audit_logs`.

use sqlx::{types::Json, PgPool, Postgres};
use tracing::{debug, error};

use super::models::{
    AuditLogEntry, AuditLogFilter, AuditLogView, EntityType, NewAuditLog,
    DEFAULT_AUDIT_QUERY_LIMIT, MAX_AUDIT_QUERY_LIMIT,
};
use crate::features::shared::pagination::{search_pattern, PaginationParams};

const ENTRY_COLUMNS: &str =
    "a.id, a.user_id, a.action, a.entity_type, a.entity_id, a.details, a.created_at";

/// Insert one ledger row on the given executor
///
/// Meant to run on the same transaction as the entity write: an error here
/// must abort that transaction.
pub async fn insert_audit_log<'e, E>(
    executor: E,
    entry: &NewAuditLog,
) -> Result<AuditLogEntry, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let record = sqlx::query_as::<_, AuditLogEntry>(
        r#"
        INSERT INTO audit_logs (user_id, action, entity_type, entity_id, details)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, action, entity_type, entity_id, details, created_at
        "#,
    )
    .bind(entry.user_id)
    .bind(entry.action.as_str())
    .bind(entry.entity_type.as_str())
    .bind(&entry.entity_id)
    .bind(Json(&entry.details))
    .fetch_one(executor)
    .await?;

    debug!(
        audit_id = record.id,
        action = %entry.action,
        entity_type = %entry.entity_type,
        entity_id = %entry.entity_id,
        "Created audit log entry"
    );

    Ok(record)
}

/// Detached writer: never fails the caller
///
/// Persistence errors are logged and swallowed. Only for events that have no
/// entity write of their own to share a transaction with.
pub async fn create_audit_log(pool: &PgPool, entry: NewAuditLog) {
    if let Err(e) = insert_audit_log(pool, &entry).await {
        error!(
            error = %e,
            user_id = %entry.user_id,
            action = %entry.action,
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            "Failed to write audit log entry"
        );
    }
}

/// Paginated ledger listing, newest first
///
/// Returns the page and the total number of rows matching the filters.
pub async fn list_audit_logs(
    pool: &PgPool,
    filter: &AuditLogFilter,
    pagination: &PaginationParams,
) -> Result<(Vec<AuditLogView>, i64), sqlx::Error> {
    const PREDICATE: &str = r#"
        ($1::TEXT IS NULL OR a.action = $1)
        AND ($2::TEXT IS NULL OR a.entity_type = $2)
        AND ($3::UUID IS NULL OR a.user_id = $3)
        AND ($4::TEXT IS NULL OR a.entity_id = $4)
        AND ($5::TIMESTAMPTZ IS NULL OR a.created_at >= $5)
        AND ($6::TIMESTAMPTZ IS NULL OR a.created_at <= $6)
        AND ($7::TEXT IS NULL OR a.details->>'description' ILIKE $7)
    "#;

    let action = filter.action.map(|a| a.as_str());
    let entity_type = filter.entity_type.map(|e| e.as_str());
    let search = search_pattern(filter.search.as_deref());

    let count_sql = format!("SELECT COUNT(*) FROM audit_logs a WHERE {}", PREDICATE);
    let page_sql = format!(
        r#"
        SELECT {}, u.name AS user_name
        FROM audit_logs a
        LEFT JOIN users u ON u.id = a.user_id
        WHERE {}
        ORDER BY a.created_at DESC, a.id DESC
        LIMIT $8 OFFSET $9
        "#,
        ENTRY_COLUMNS, PREDICATE
    );

    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(action)
        .bind(entity_type)
        .bind(filter.user_id)
        .bind(filter.entity_id.as_deref())
        .bind(filter.from)
        .bind(filter.to)
        .bind(search.as_deref())
        .fetch_one(pool);

    let page = sqlx::query_as::<_, AuditLogView>(&page_sql)
        .bind(action)
        .bind(entity_type)
        .bind(filter.user_id)
        .bind(filter.entity_id.as_deref())
        .bind(filter.from)
        .bind(filter.to)
        .bind(search.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(pool);

    let (total, records) = tokio::try_join!(count, page)?;

    debug!(count = records.len(), total, "Queried audit logs");

    Ok((records, total))
}

/// Every entry for one entity, newest first
pub async fn get_entity_trail(
    pool: &PgPool,
    entity_type: EntityType,
    entity_id: &str,
    limit: Option<i64>,
) -> Result<Vec<AuditLogView>, sqlx::Error> {
    let limit = limit
        .unwrap_or(DEFAULT_AUDIT_QUERY_LIMIT)
        .clamp(1, MAX_AUDIT_QUERY_LIMIT);

    let sql = format!(
        r#"
        SELECT {}, u.name AS user_name
        FROM audit_logs a
        LEFT JOIN users u ON u.id = a.user_id
        WHERE a.entity_type = $1 AND a.entity_id = $2
        ORDER BY a.created_at DESC, a.id DESC
        LIMIT $3
        "#,
        ENTRY_COLUMNS
    );

    let records = sqlx::query_as::<_, AuditLogView>(&sql)
        .bind(entity_type.as_str())
        .bind(entity_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    debug!(
        entity_type = %entity_type,
        entity_id = %entity_id,
        count = records.len(),
        "Retrieved audit trail"
    );

    Ok(records)
}

/// Most recent entries across the whole ledger
pub async fn recent_activity(pool: &PgPool, limit: i64) -> Result<Vec<AuditLogView>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {}, u.name AS user_name
        FROM audit_logs a
        LEFT JOIN users u ON u.id = a.user_id
        ORDER BY a.created_at DESC, a.id DESC
        LIMIT $1
        "#,
        ENTRY_COLUMNS
    );

    sqlx::query_as::<_, AuditLogView>(&sql)
        .bind(limit.clamp(1, MAX_AUDIT_QUERY_LIMIT))
        .fetch_all(pool)
        .await
}
