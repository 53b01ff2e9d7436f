//! Delete seizure command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::seizures::{Seizure, SeizureError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSeizureCommand {
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
}

impl Request<Result<(), SeizureError>> for DeleteSeizureCommand {}

impl crate::cqrs::middleware::Command for DeleteSeizureCommand {}

#[tracing::instrument(skip(pool), fields(seizure_id = %command.id))]
pub async fn handle(pool: PgPool, command: DeleteSeizureCommand) -> Result<(), SeizureError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query_as::<_, Seizure>("DELETE FROM seizures WHERE id = $1 RETURNING *")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SeizureError::NotFound(command.id))?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &deleted,
        AuditEvent::Delete,
        AuditContext::new().with("snapshot", &deleted),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(item_name = %deleted.item_name, "Seizure deleted");

    Ok(())
}
