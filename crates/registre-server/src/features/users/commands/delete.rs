//! Deactivate user command
//!
//! Users are never removed: their id stays referenced by every ledger entry
//! they wrote. A user who is already inactive is reported as not found.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::users::{User, UserError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserCommand {
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
}

impl Request<Result<User, UserError>> for DeleteUserCommand {}

impl crate::cqrs::middleware::Command for DeleteUserCommand {}

#[tracing::instrument(skip(pool), fields(user_id = %command.id))]
pub async fn handle(pool: PgPool, command: DeleteUserCommand) -> Result<User, UserError> {
    if command.id == command.actor_id {
        return Err(UserError::SelfDeactivation);
    }

    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET is_active = FALSE, updated_by = $2, updated_at = NOW()
        WHERE id = $1 AND is_active
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(command.actor_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(UserError::NotFound(command.id))?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &user,
        AuditEvent::Delete,
        AuditContext::new().with("soft_delete", true),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("User deactivated");

    Ok(user)
}
