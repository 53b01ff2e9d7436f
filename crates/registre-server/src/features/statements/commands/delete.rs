use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::statements::{Statement, StatementError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStatementCommand {
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
}

impl Request<Result<(), StatementError>> for DeleteStatementCommand {}

impl crate::cqrs::middleware::Command for DeleteStatementCommand {}

#[tracing::instrument(skip(pool), fields(statement_id = %command.id))]
pub async fn handle(pool: PgPool, command: DeleteStatementCommand) -> Result<(), StatementError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query_as::<_, Statement>("DELETE FROM statements WHERE id = $1 RETURNING *")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StatementError::NotFound(command.id))?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &deleted,
        AuditEvent::Delete,
        AuditContext::new()
            .with("detainee_id", deleted.detainee_id)
            .with("snapshot", &deleted),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("Statement deleted");

    Ok(())
}
