//! Create employee command

use chrono::{NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::employees::{Employee, EmployeeError, EMPLOYEE_EMAIL_KEY};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::{patch::clean_opt, FieldErrors, Sex};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeCommand {
    #[serde(skip)]
    pub actor_id: Uuid,

    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub email: String,
    pub phone_number: Option<String>,
    pub job_title: String,
    pub assignment: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
}

impl Request<Result<Employee, EmployeeError>> for CreateEmployeeCommand {}

impl crate::cqrs::middleware::Command for CreateEmployeeCommand {}

impl CreateEmployeeCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors
            .min_chars("first_name", &self.first_name, 2)
            .min_chars("last_name", &self.last_name, 2)
            .email("email", &self.email)
            .required("job_title", &self.job_title);

        if let Some(date_of_birth) = self.date_of_birth {
            errors.not_in_future("date_of_birth", date_of_birth, Utc::now().date_naive());
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: CreateEmployeeCommand) -> Result<Employee, EmployeeError> {
    command.validate()?;

    let email = command.email.trim().to_lowercase();
    let mut tx = pool.begin().await?;

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        INSERT INTO employees (
            first_name, last_name, sex, email, phone_number, job_title, assignment,
            date_of_birth, address, photo_url, created_by, updated_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING *
        "#,
    )
    .bind(command.first_name.trim())
    .bind(command.last_name.trim())
    .bind(command.sex.as_str())
    .bind(&email)
    .bind(clean_opt(command.phone_number.as_deref()))
    .bind(command.job_title.trim())
    .bind(clean_opt(command.assignment.as_deref()))
    .bind(command.date_of_birth)
    .bind(clean_opt(command.address.as_deref()))
    .bind(clean_opt(command.photo_url.as_deref()))
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

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &employee,
        AuditEvent::Create,
        AuditContext::new(),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(employee_id = %employee.id, "Employee created");

    Ok(employee)
}
