use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::audit::{self, AuditLogView, EntityType};
use crate::features::audit_logs::AuditLogError;

/// Full history of one entity, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEntityTrailQuery {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub limit: Option<i64>,
}

impl Request<Result<Vec<AuditLogView>, AuditLogError>> for GetEntityTrailQuery {}

impl crate::cqrs::middleware::Query for GetEntityTrailQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetEntityTrailQuery) -> Result<Vec<AuditLogView>, AuditLogError> {
    let trail =
        audit::get_entity_trail(&pool, query.entity_type, query.entity_id.trim(), query.limit).await?;
    Ok(trail)
}
