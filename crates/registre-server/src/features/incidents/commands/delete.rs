//! Delete incident command
//!
//! Victims are removed with the incident by the database cascade; the ledger
//! entry lists them in its snapshot.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::incidents::{Incident, IncidentError, Victim};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteIncidentCommand {
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
}

impl Request<Result<(), IncidentError>> for DeleteIncidentCommand {}

impl crate::cqrs::middleware::Command for DeleteIncidentCommand {}

#[tracing::instrument(skip(pool), fields(incident_id = %command.id))]
pub async fn handle(pool: PgPool, command: DeleteIncidentCommand) -> Result<(), IncidentError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Incident>("SELECT * FROM incidents WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(IncidentError::NotFound(command.id))?;

    let victims = sqlx::query_as::<_, Victim>(
        "SELECT * FROM victims WHERE incident_id = $1 ORDER BY created_at, id",
    )
    .bind(command.id)
    .fetch_all(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM incidents WHERE id = $1")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &current,
        AuditEvent::Delete,
        AuditContext::new()
            .with("snapshot", &current)
            .with("victims", &victims),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(victims = victims.len(), "Incident deleted");

    Ok(())
}
