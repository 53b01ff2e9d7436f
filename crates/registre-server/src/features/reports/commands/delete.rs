use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::reports::{Report, ReportError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReportCommand {
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
}

impl Request<Result<(), ReportError>> for DeleteReportCommand {}

impl crate::cqrs::middleware::Command for DeleteReportCommand {}

#[tracing::instrument(skip(pool), fields(report_id = %command.id))]
pub async fn handle(pool: PgPool, command: DeleteReportCommand) -> Result<(), ReportError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query_as::<_, Report>("DELETE FROM reports WHERE id = $1 RETURNING *")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ReportError::NotFound(command.id))?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &deleted,
        AuditEvent::Delete,
        AuditContext::new().with("snapshot", &deleted),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("Report deleted");

    Ok(())
}
