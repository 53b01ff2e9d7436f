//! Update employee command
//!
//! Reactivating or deactivating an employee through `is_active` is logged as
//! a `status_change`.

use chrono::{NaiveDate, Utc};
use mediator::Request;
use registre_common::capture_patch_changes;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::employees::{Employee, EmployeeError, EMPLOYEE_EMAIL_KEY};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::patch::{merge_opt_text, merge_text, patch_is_empty};
use crate::features::shared::validation::MSG_NO_FIELDS;
use crate::features::shared::{FieldErrors, Sex};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployeeCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Request<Result<Employee, EmployeeError>> for UpdateEmployeeCommand {}

impl crate::cqrs::middleware::Command for UpdateEmployeeCommand {}

impl UpdateEmployeeCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        if patch_is_empty(self) {
            return Err(FieldErrors::single("body", MSG_NO_FIELDS));
        }

        let mut errors = FieldErrors::new();
        errors
            .min_chars_opt("first_name", self.first_name.as_deref(), 2)
            .min_chars_opt("last_name", self.last_name.as_deref(), 2)
            .required_opt("job_title", self.job_title.as_deref());

        if let Some(email) = &self.email {
            errors.email("email", email);
        }
        if let Some(date_of_birth) = self.date_of_birth {
            errors.not_in_future("date_of_birth", date_of_birth, Utc::now().date_naive());
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(employee_id = %command.id, actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: UpdateEmployeeCommand) -> Result<Employee, EmployeeError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EmployeeError::NotFound(command.id))?;

    let email = command
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_else(|| current.email.clone());

    let updated = sqlx::query_as::<_, Employee>(
        r#"
        UPDATE employees
        SET first_name = $2, last_name = $3, sex = $4, email = $5, phone_number = $6,
            job_title = $7, assignment = $8, date_of_birth = $9, address = $10,
            photo_url = $11, is_active = $12, updated_by = $13, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(merge_text(&command.first_name, &current.first_name))
    .bind(merge_text(&command.last_name, &current.last_name))
    .bind(command.sex.map_or(current.sex.as_str(), |sex| sex.as_str()))
    .bind(&email)
    .bind(merge_opt_text(&command.phone_number, &current.phone_number))
    .bind(merge_text(&command.job_title, &current.job_title))
    .bind(merge_opt_text(&command.assignment, &current.assignment))
    .bind(command.date_of_birth.or(current.date_of_birth))
    .bind(merge_opt_text(&command.address, &current.address))
    .bind(merge_opt_text(&command.photo_url, &current.photo_url))
    .bind(command.is_active.unwrap_or(current.is_active))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            EMPLOYEE_EMAIL_KEY,
            EmployeeError::EmailTaken(email.clone()),
            EmployeeError::Database,
        )
    })?;

    let changes = capture_patch_changes(&current, &updated, &command)?;
    let event = AuditEvent::for_update(changes, "is_active");

    audit::log_entity_action(&mut *tx, command.actor_id, &updated, event, AuditContext::new())
        .await?;

    tx.commit().await?;

    tracing::info!(employee_id = %updated.id, "Employee updated");

    Ok(updated)
}
