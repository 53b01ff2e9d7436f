//! Update user command
//!
//! `is_active` flips are logged as `status_change`. Passwords are never set
//! here, only through the reset flow.

use mediator::Request;
use registre_common::capture_patch_changes;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::auth::Role;
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::patch::{merge_text, patch_is_empty};
use crate::features::shared::validation::MSG_NO_FIELDS;
use crate::features::shared::FieldErrors;
use crate::features::users::{User, UserError, USER_EMAIL_KEY};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Request<Result<User, UserError>> for UpdateUserCommand {}

impl crate::cqrs::middleware::Command for UpdateUserCommand {}

impl UpdateUserCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        if patch_is_empty(self) {
            return Err(FieldErrors::single("body", MSG_NO_FIELDS));
        }

        let mut errors = FieldErrors::new();
        errors.min_chars_opt("name", self.name.as_deref(), 2);
        if let Some(email) = &self.email {
            errors.email("email", email);
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.id, actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: UpdateUserCommand) -> Result<User, UserError> {
    command.validate()?;

    if command.id == command.actor_id && command.is_active == Some(false) {
        return Err(UserError::SelfDeactivation);
    }

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(UserError::NotFound(command.id))?;

    let email = command
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_else(|| current.email.clone());

    let updated = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = $2, email = $3, role = $4, is_active = $5, updated_by = $6, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(merge_text(&command.name, &current.name))
    .bind(&email)
    .bind(command.role.map_or(current.role.as_str(), |role| role.as_str()))
    .bind(command.is_active.unwrap_or(current.is_active))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(e, USER_EMAIL_KEY, UserError::EmailTaken(email.clone()), UserError::Database)
    })?;

    let changes = capture_patch_changes(&current, &updated, &command)?;
    let event = AuditEvent::for_update(changes, "is_active");

    audit::log_entity_action(&mut *tx, command.actor_id, &updated, event, AuditContext::new())
        .await?;

    tx.commit().await?;

    tracing::info!(user_id = %updated.id, role = %updated.role, "User updated");

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;
    use serde_json::json;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_role_change_is_an_update(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let agent = TestUser::agent().insert(&pool).await?;

        let cmd = UpdateUserCommand {
            id: agent.id,
            actor_id: admin.id,
            role: Some(Role::Manager),
            ..Default::default()
        };
        let updated = handle(pool.clone(), cmd).await.unwrap();
        assert_eq!(updated.role, "manager");
        assert_eq!(updated.updated_by, Some(admin.id));

        let trail = audit_trail(&pool, "user", &agent.id.to_string()).await?;
        assert_eq!(trail[0].action, "update");
        let change = trail[0].changed().unwrap().get("role").unwrap();
        assert_eq!(change.old, Some(json!("agent")));
        assert_eq!(change.new, json!("manager"));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_reactivation_is_a_status_change(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let agent = TestUser::agent().inactive().insert(&pool).await?;

        let cmd = UpdateUserCommand {
            id: agent.id,
            actor_id: admin.id,
            is_active: Some(true),
            ..Default::default()
        };
        handle(pool.clone(), cmd).await.unwrap();

        let trail = audit_trail(&pool, "user", &agent.id.to_string()).await?;
        assert_eq!(trail[0].action, "status_change");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_cannot_deactivate_self(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;

        let cmd = UpdateUserCommand {
            id: admin.id,
            actor_id: admin.id,
            is_active: Some(false),
            ..Default::default()
        };
        let result = handle(pool.clone(), cmd).await;

        assert!(matches!(result, Err(UserError::SelfDeactivation)));
        assert_eq!(count_audit_logs(&pool).await?, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_email_taken(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let agent = TestUser::agent().insert(&pool).await?;

        let cmd = UpdateUserCommand {
            id: agent.id,
            actor_id: admin.id,
            email: Some("admin@registre.cd".to_string()),
            ..Default::default()
        };
        let result = handle(pool.clone(), cmd).await;

        assert!(matches!(result, Err(UserError::EmailTaken(_))));
        Ok(())
    }
}
