//! Password reset flow
//!
//! An administrator initiates a reset and hands the raw token to the user out
//! of band. Only its SHA-256 is stored. Completing the reset needs no session:
//! the token identifies the user, who becomes the acting principal of the
//! `password_reset_completed` entry.

use chrono::{Duration, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::shared::FieldErrors;
use crate::features::users::password::{
    generate_reset_token, hash_password, hash_reset_token, MIN_PASSWORD_CHARS,
    RESET_TOKEN_TTL_MINUTES,
};
use crate::features::users::{PasswordResetToken, User, UserError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePasswordResetCommand {
    pub user_id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
}

impl Request<Result<PasswordResetToken, UserError>> for InitiatePasswordResetCommand {}

impl crate::cqrs::middleware::Command for InitiatePasswordResetCommand {}

#[tracing::instrument(skip(pool), fields(user_id = %command.user_id, actor_id = %command.actor_id))]
pub async fn initiate(
    pool: PgPool,
    command: InitiatePasswordResetCommand,
) -> Result<PasswordResetToken, UserError> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE id = $1 AND is_active FOR UPDATE",
    )
    .bind(command.user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(UserError::NotFound(command.user_id))?;

    let token = generate_reset_token();
    let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

    sqlx::query(
        r#"
        INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user.id)
    .bind(hash_reset_token(&token))
    .bind(expires_at)
    .execute(&mut *tx)
    .await?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &user,
        AuditEvent::PasswordResetInitiated,
        AuditContext::new().with("expires_at", expires_at),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(%expires_at, "Password reset initiated");

    Ok(PasswordResetToken {
        user_id: user.id,
        token,
        expires_at,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletePasswordResetCommand {
    pub token: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Request<Result<User, UserError>> for CompletePasswordResetCommand {}

impl crate::cqrs::middleware::Command for CompletePasswordResetCommand {}

impl CompletePasswordResetCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .required("token", &self.token)
            .min_chars("password", &self.password, MIN_PASSWORD_CHARS);
        errors.into_result()
    }
}

#[tracing::instrument(skip_all)]
pub async fn complete(pool: PgPool, command: CompletePasswordResetCommand) -> Result<User, UserError> {
    command.validate()?;

    let token_hash = hash_reset_token(command.token.trim());
    let password_hash = hash_password(command.password).await?;

    let mut tx = pool.begin().await?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT user_id FROM password_reset_tokens
        WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()
        FOR UPDATE
        "#,
    )
    .bind(&token_hash)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(UserError::InvalidResetToken)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET password_hash = $2, updated_by = $1, updated_at = NOW()
        WHERE id = $1 AND is_active
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(password_hash)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(UserError::InvalidResetToken)?;

    // Every outstanding token of the user is spent, not only this one
    sqlx::query(
        "UPDATE password_reset_tokens SET used_at = NOW() WHERE user_id = $1 AND used_at IS NULL",
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    audit::log_entity_action(
        &mut *tx,
        user.id,
        &user,
        AuditEvent::PasswordResetCompleted,
        AuditContext::new(),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, "Password reset completed");

    Ok(user)
}
