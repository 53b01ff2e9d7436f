use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::audit::{self, AuditLogView};
use crate::features::dashboard::DashboardError;

pub const DEFAULT_RECENT_ACTIVITY: i64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentActivityQuery {
    pub limit: Option<i64>,
}

impl Request<Result<Vec<AuditLogView>, DashboardError>> for RecentActivityQuery {}

impl crate::cqrs::middleware::Query for RecentActivityQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: RecentActivityQuery) -> Result<Vec<AuditLogView>, DashboardError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_ACTIVITY);
    Ok(audit::recent_activity(&pool, limit).await?)
}
