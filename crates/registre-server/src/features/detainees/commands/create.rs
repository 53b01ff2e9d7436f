//! Create detainee command
//!
//! The detainee row and its `create` audit entry are written in one
//! transaction: if the ledger insert fails the detainee is not created.

use chrono::{NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::detainees::{Detainee, DetaineeError};
use crate::features::shared::{patch::clean_opt, FieldErrors, Sex};

/// Command to register a new detainee
///
/// New detainees always start `in_custody`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDetaineeCommand {
    /// Acting user, set from the request context
    #[serde(skip)]
    pub actor_id: Uuid,

    pub first_name: String,
    pub last_name: String,
    pub sex: Sex,
    pub place_of_birth: String,
    pub date_of_birth: NaiveDate,
    pub parent_names: Option<String>,
    pub marital_status: Option<String>,
    pub profession: Option<String>,
    pub residence: String,
    pub phone_number: Option<String>,
    pub crime_reason: String,
    pub arrest_date: NaiveDate,
    pub arrest_location: String,
    pub arrested_by: Option<String>,
    pub cell_number: Option<String>,
    pub photo_url: Option<String>,
}

impl Request<Result<Detainee, DetaineeError>> for CreateDetaineeCommand {}

impl crate::cqrs::middleware::Command for CreateDetaineeCommand {}

impl CreateDetaineeCommand {
    /// Validates the command parameters
    ///
    /// - first and last name: at least 2 characters
    /// - place of birth, residence, crime reason, arrest location: required
    /// - date of birth and arrest date: not in the future
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let today = Utc::now().date_naive();
        let mut errors = FieldErrors::new();

        errors
            .min_chars("first_name", &self.first_name, 2)
            .max_chars("first_name", &self.first_name, 100)
            .min_chars("last_name", &self.last_name, 2)
            .max_chars("last_name", &self.last_name, 100)
            .required("place_of_birth", &self.place_of_birth)
            .required("residence", &self.residence)
            .required("crime_reason", &self.crime_reason)
            .required("arrest_location", &self.arrest_location)
            .not_in_future("date_of_birth", self.date_of_birth, today)
            .not_in_future("arrest_date", self.arrest_date, today);

        if self.arrest_date < self.date_of_birth {
            errors.add("arrest_date", "La date d'arrestation précède la date de naissance");
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(actor_id = %command.actor_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateDetaineeCommand,
) -> Result<Detainee, DetaineeError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let detainee = sqlx::query_as::<_, Detainee>(
        r#"
        INSERT INTO detainees (
            first_name, last_name, sex, place_of_birth, date_of_birth, parent_names,
            marital_status, profession, residence, phone_number, crime_reason,
            arrest_date, arrest_location, arrested_by, cell_number, photo_url,
            created_by, updated_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $17)
        RETURNING *
        "#,
    )
    .bind(command.first_name.trim())
    .bind(command.last_name.trim())
    .bind(command.sex.as_str())
    .bind(command.place_of_birth.trim())
    .bind(command.date_of_birth)
    .bind(clean_opt(command.parent_names.as_deref()))
    .bind(clean_opt(command.marital_status.as_deref()))
    .bind(clean_opt(command.profession.as_deref()))
    .bind(command.residence.trim())
    .bind(clean_opt(command.phone_number.as_deref()))
    .bind(command.crime_reason.trim())
    .bind(command.arrest_date)
    .bind(command.arrest_location.trim())
    .bind(clean_opt(command.arrested_by.as_deref()))
    .bind(clean_opt(command.cell_number.as_deref()))
    .bind(clean_opt(command.photo_url.as_deref()))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &detainee,
        AuditEvent::Create,
        AuditContext::new(),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(detainee_id = %detainee.id, "Detainee created");

    Ok(detainee)
}
