//! First administrator
//!
//! A fresh database has no user to act as principal. At start-up, when no
//! active admin exists and one is configured, it is created acting as itself.

use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::users::{User, UserError};

#[tracing::instrument(skip(pool))]
pub async fn ensure_admin(pool: &PgPool, name: &str, email: &str) -> Result<Option<User>, UserError> {
    let mut tx = pool.begin().await?;

    // Serialises concurrent start-ups on the same database
    sqlx::query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    let has_admin: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin' AND is_active)",
    )
    .fetch_one(&mut *tx)
    .await?;

    if has_admin {
        return Ok(None);
    }

    let id = Uuid::new_v4();
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, role, created_by, updated_by)
        VALUES ($1, $2, $3, 'admin', $1, $1)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name.trim())
    .bind(email.trim().to_lowercase())
    .fetch_one(&mut *tx)
    .await?;

    audit::log_entity_action(
        &mut *tx,
        user.id,
        &user,
        AuditEvent::Create,
        AuditContext::new().with("bootstrap", true),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, "Bootstrap administrator created");

    Ok(Some(user))
}
