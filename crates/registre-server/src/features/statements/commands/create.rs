//! Record a statement made by a detainee

use chrono::{NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::shared::{patch::clean_opt, FieldErrors};
use crate::features::statements::{Statement, StatementError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStatementCommand {
    #[serde(skip)]
    pub actor_id: Uuid,

    pub detainee_id: Uuid,
    pub content: String,
    /// Defaults to today
    pub statement_date: Option<NaiveDate>,
    pub file_url: Option<String>,
}

impl Request<Result<Statement, StatementError>> for CreateStatementCommand {}

impl crate::cqrs::middleware::Command for CreateStatementCommand {}

impl CreateStatementCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.min_chars("content", &self.content, 10);
        if let Some(statement_date) = self.statement_date {
            errors.not_in_future("statement_date", statement_date, Utc::now().date_naive());
        }
        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(detainee_id = %command.detainee_id, actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: CreateStatementCommand) -> Result<Statement, StatementError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    // Locks the detainee so it cannot be deleted before the statement lands
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM detainees WHERE id = $1 FOR SHARE")
        .bind(command.detainee_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StatementError::DetaineeNotFound(command.detainee_id))?;

    let statement = sqlx::query_as::<_, Statement>(
        r#"
        INSERT INTO statements (detainee_id, content, statement_date, file_url, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING *
        "#,
    )
    .bind(command.detainee_id)
    .bind(command.content.trim())
    .bind(command.statement_date.unwrap_or_else(|| Utc::now().date_naive()))
    .bind(clean_opt(command.file_url.as_deref()))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &statement,
        AuditEvent::Create,
        AuditContext::new().with("detainee_id", command.detainee_id),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(statement_id = %statement.id, "Statement recorded");

    Ok(statement)
}
