//! Delete detainee command
//!
//! Detainees with statements cannot be deleted. The ledger entry keeps a
//! snapshot of the deleted row.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::detainees::{Detainee, DetaineeError};
use crate::features::shared::error_helpers::is_foreign_key_violation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDetaineeCommand {
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
}

impl Request<Result<(), DetaineeError>> for DeleteDetaineeCommand {}

impl crate::cqrs::middleware::Command for DeleteDetaineeCommand {}

#[tracing::instrument(skip(pool), fields(detainee_id = %command.id))]
pub async fn handle(pool: PgPool, command: DeleteDetaineeCommand) -> Result<(), DetaineeError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Detainee>("SELECT * FROM detainees WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DetaineeError::NotFound(command.id))?;

    sqlx::query("DELETE FROM detainees WHERE id = $1")
        .bind(command.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DetaineeError::HasStatements(command.id)
            } else {
                DetaineeError::Database(e)
            }
        })?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &current,
        AuditEvent::Delete,
        AuditContext::new().with("snapshot", &current),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("Detainee deleted");

    Ok(())
}
