use chrono::{NaiveDate, Utc};
use mediator::Request;
use registre_common::capture_patch_changes;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::reports::{Report, ReportError};
use crate::features::shared::patch::{merge_opt_text, merge_text, patch_is_empty};
use crate::features::shared::validation::MSG_NO_FIELDS;
use crate::features::shared::FieldErrors;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReportCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<NaiveDate>,
}

impl Request<Result<Report, ReportError>> for UpdateReportCommand {}

impl crate::cqrs::middleware::Command for UpdateReportCommand {}

impl UpdateReportCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        if patch_is_empty(self) {
            return Err(FieldErrors::single("body", MSG_NO_FIELDS));
        }

        let mut errors = FieldErrors::new();
        errors
            .min_chars_opt("title", self.title.as_deref(), 3)
            .min_chars_opt("content", self.content.as_deref(), 10)
            .required_opt("category", self.category.as_deref());

        if let Some(report_date) = self.report_date {
            errors.not_in_future("report_date", report_date, Utc::now().date_naive());
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(report_id = %command.id, actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: UpdateReportCommand) -> Result<Report, ReportError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ReportError::NotFound(command.id))?;

    let updated = sqlx::query_as::<_, Report>(
        r#"
        UPDATE reports
        SET title = $2, content = $3, category = $4, location = $5, report_date = $6,
            updated_by = $7, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(merge_text(&command.title, &current.title))
    .bind(merge_text(&command.content, &current.content))
    .bind(merge_text(&command.category, &current.category))
    .bind(merge_opt_text(&command.location, &current.location))
    .bind(command.report_date.unwrap_or(current.report_date))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    let changes = capture_patch_changes(&current, &updated, &command)?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &updated,
        AuditEvent::Update(changes),
        AuditContext::new(),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(report_id = %updated.id, "Report updated");

    Ok(updated)
}
