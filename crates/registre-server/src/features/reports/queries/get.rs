use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::reports::{ReportError, ReportView, REPORT_VIEW_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetReportQuery {
    pub id: Uuid,
}

impl Request<Result<ReportView, ReportError>> for GetReportQuery {}

impl crate::cqrs::middleware::Query for GetReportQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetReportQuery) -> Result<ReportView, ReportError> {
    let sql = format!("{} WHERE r.id = $1", REPORT_VIEW_SELECT);

    sqlx::query_as::<_, ReportView>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(ReportError::NotFound(query.id))
}
