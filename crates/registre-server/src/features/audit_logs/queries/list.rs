//! Ledger listing
//!
//! Always newest first; there is no sort parameter.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditAction, AuditLogFilter, AuditLogView, EntityType};
use crate::features::audit_logs::AuditLogError;
use crate::features::shared::{FieldErrors, PaginationMetadata, PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditLogsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub action: Option<AuditAction>,
    pub entity_type: Option<EntityType>,
    pub user_id: Option<Uuid>,
    pub entity_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditLogsResponse {
    pub audit_logs: Vec<AuditLogView>,
    pub pagination: PaginationMetadata,
}

impl Request<Result<ListAuditLogsResponse, AuditLogError>> for ListAuditLogsQuery {}

impl crate::cqrs::middleware::Query for ListAuditLogsQuery {}

impl ListAuditLogsQuery {
    fn filter(&self) -> Result<AuditLogFilter, FieldErrors> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(FieldErrors::single(
                    "to",
                    "La date de fin précède la date de début",
                ));
            }
        }

        Ok(AuditLogFilter {
            action: self.action,
            entity_type: self.entity_type,
            user_id: self.user_id,
            entity_id: self.entity_id.clone(),
            from: self.from,
            to: self.to,
            search: self.search.clone(),
        })
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListAuditLogsQuery,
) -> Result<ListAuditLogsResponse, AuditLogError> {
    let pagination = PaginationParams::new(query.page, query.limit).validated()?;
    let filter = query.filter()?;

    let (audit_logs, total) = audit::list_audit_logs(&pool, &filter, &pagination).await?;

    Ok(ListAuditLogsResponse {
        audit_logs,
        pagination: PaginationMetadata::from_params(&pagination, total),
    })
}
