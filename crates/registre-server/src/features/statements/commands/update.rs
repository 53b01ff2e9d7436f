use chrono::{NaiveDate, Utc};
use mediator::Request;
use registre_common::capture_patch_changes;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::shared::patch::{merge_opt_text, merge_text, patch_is_empty};
use crate::features::shared::validation::MSG_NO_FIELDS;
use crate::features::shared::FieldErrors;
use crate::features::statements::{Statement, StatementError};

/// Partial update of a statement; the detainee it belongs to cannot change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatementCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl Request<Result<Statement, StatementError>> for UpdateStatementCommand {}

impl crate::cqrs::middleware::Command for UpdateStatementCommand {}

impl UpdateStatementCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        if patch_is_empty(self) {
            return Err(FieldErrors::single("body", MSG_NO_FIELDS));
        }

        let mut errors = FieldErrors::new();
        errors.min_chars_opt("content", self.content.as_deref(), 10);
        if let Some(statement_date) = self.statement_date {
            errors.not_in_future("statement_date", statement_date, Utc::now().date_naive());
        }
        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(statement_id = %command.id, actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: UpdateStatementCommand) -> Result<Statement, StatementError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Statement>("SELECT * FROM statements WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StatementError::NotFound(command.id))?;

    let updated = sqlx::query_as::<_, Statement>(
        r#"
        UPDATE statements
        SET content = $2, statement_date = $3, file_url = $4, updated_by = $5, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(merge_text(&command.content, &current.content))
    .bind(command.statement_date.unwrap_or(current.statement_date))
    .bind(merge_opt_text(&command.file_url, &current.file_url))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    let changes = capture_patch_changes(&current, &updated, &command)?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &updated,
        AuditEvent::Update(changes),
        AuditContext::new().with("detainee_id", updated.detainee_id),
    )
    .await?;

    tx.commit().await?;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;
    use crate::features::statements::commands::create::{self, tests::statement_command};

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_update_file_url(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let detainee = TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;
        let statement = create::handle(pool.clone(), statement_command(admin.id, detainee.id))
            .await
            .unwrap();

        let cmd = UpdateStatementCommand {
            id: statement.id,
            actor_id: admin.id,
            file_url: Some("declarations/2024/jean-mukendi.pdf".to_string()),
            ..Default::default()
        };
        let updated = handle(pool.clone(), cmd).await.unwrap();
        assert_eq!(updated.file_url.as_deref(), Some("declarations/2024/jean-mukendi.pdf"));

        let trail = audit_trail(&pool, "statement", &statement.id.to_string()).await?;
        let change = trail[1].changed().unwrap().get("file_url").unwrap();
        assert_eq!(change.old, Some(serde_json::Value::Null));
        Ok(())
    }
}
