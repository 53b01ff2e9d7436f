use chrono::{NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::reports::{Report, ReportError};
use crate::features::shared::{patch::clean_opt, FieldErrors};

/// Command to file a report; `report_date` defaults to today
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportCommand {
    #[serde(skip)]
    pub actor_id: Uuid,

    pub title: String,
    pub content: String,
    pub category: String,
    pub location: Option<String>,
    pub report_date: Option<NaiveDate>,
}

impl Request<Result<Report, ReportError>> for CreateReportCommand {}

impl crate::cqrs::middleware::Command for CreateReportCommand {}

impl CreateReportCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors
            .min_chars("title", &self.title, 3)
            .max_chars("title", &self.title, 255)
            .min_chars("content", &self.content, 10)
            .required("category", &self.category);

        if let Some(report_date) = self.report_date {
            errors.not_in_future("report_date", report_date, Utc::now().date_naive());
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: CreateReportCommand) -> Result<Report, ReportError> {
    command.validate()?;

    let report_date = command.report_date.unwrap_or_else(|| Utc::now().date_naive());
    let mut tx = pool.begin().await?;

    let report = sqlx::query_as::<_, Report>(
        r#"
        INSERT INTO reports (title, content, category, location, report_date, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING *
        "#,
    )
    .bind(command.title.trim())
    .bind(command.content.trim())
    .bind(command.category.trim())
    .bind(clean_opt(command.location.as_deref()))
    .bind(report_date)
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    audit::log_entity_action(&mut *tx, command.actor_id, &report, AuditEvent::Create, AuditContext::new())
        .await?;

    tx.commit().await?;

    tracing::info!(report_id = %report.id, "Report created");

    Ok(report)
}
