//! Create user command
//!
//! Accounts may be created without a password; the user then sets one through
//! the reset flow.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::auth::Role;
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::FieldErrors;
use crate::features::users::password::{hash_password, MIN_PASSWORD_CHARS};
use crate::features::users::{User, UserError, USER_EMAIL_KEY};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserCommand {
    #[serde(skip)]
    pub actor_id: Uuid,

    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl Request<Result<User, UserError>> for CreateUserCommand {}

impl crate::cqrs::middleware::Command for CreateUserCommand {}

impl CreateUserCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .min_chars("name", &self.name, 2)
            .max_chars("name", &self.name, 255)
            .email("email", &self.email);

        if let Some(password) = &self.password {
            errors.min_chars("password", password, MIN_PASSWORD_CHARS);
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(actor_id = %command.actor_id, role = %command.role))]
pub async fn handle(pool: PgPool, command: CreateUserCommand) -> Result<User, UserError> {
    command.validate()?;

    let email = command.email.trim().to_lowercase();
    let password_hash = match command.password {
        Some(password) => Some(hash_password(password).await?),
        None => None,
    };

    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, role, password_hash, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING *
        "#,
    )
    .bind(command.name.trim())
    .bind(&email)
    .bind(command.role.as_str())
    .bind(password_hash)
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(e, USER_EMAIL_KEY, UserError::EmailTaken(email.clone()), UserError::Database)
    })?;

    audit::log_entity_action(&mut *tx, command.actor_id, &user, AuditEvent::Create, AuditContext::new())
        .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok(user)
}
