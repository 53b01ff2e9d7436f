//! Update seizure command
//!
//! Moving a seizure between `in_custody`, `released`, `disposed` and
//! `evidence` is logged as `status_change`.

use chrono::{NaiveDate, Utc};
use mediator::Request;
use registre_common::capture_patch_changes;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::seizures::{Seizure, SeizureError, SeizureStatus};
use crate::features::shared::patch::{merge_opt_text, merge_text, patch_is_empty};
use crate::features::shared::validation::MSG_NO_FIELDS;
use crate::features::shared::FieldErrors;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSeizureCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_residence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seizure_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seizure_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SeizureStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Request<Result<Seizure, SeizureError>> for UpdateSeizureCommand {}

impl crate::cqrs::middleware::Command for UpdateSeizureCommand {}

impl UpdateSeizureCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        if patch_is_empty(self) {
            return Err(FieldErrors::single("body", MSG_NO_FIELDS));
        }

        let today = Utc::now().date_naive();
        let mut errors = FieldErrors::new();
        errors
            .required_opt("item_name", self.item_name.as_deref())
            .required_opt("item_type", self.item_type.as_deref())
            .required_opt("seizure_location", self.seizure_location.as_deref());

        if let Some(seizure_date) = self.seizure_date {
            errors.not_in_future("seizure_date", seizure_date, today);
        }
        if let Some(release_date) = self.release_date {
            errors.not_in_future("release_date", release_date, today);
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(seizure_id = %command.id, actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: UpdateSeizureCommand) -> Result<Seizure, SeizureError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Seizure>("SELECT * FROM seizures WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SeizureError::NotFound(command.id))?;

    let updated = sqlx::query_as::<_, Seizure>(
        r#"
        UPDATE seizures
        SET item_name = $2, item_type = $3, description = $4, owner_name = $5,
            owner_residence = $6, seizure_location = $7, seizure_date = $8, status = $9,
            release_date = $10, photo_url = $11, updated_by = $12, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(merge_text(&command.item_name, &current.item_name))
    .bind(merge_text(&command.item_type, &current.item_type))
    .bind(merge_opt_text(&command.description, &current.description))
    .bind(merge_opt_text(&command.owner_name, &current.owner_name))
    .bind(merge_opt_text(&command.owner_residence, &current.owner_residence))
    .bind(merge_text(&command.seizure_location, &current.seizure_location))
    .bind(command.seizure_date.unwrap_or(current.seizure_date))
    .bind(command.status.map_or(current.status.as_str(), |status| status.as_str()))
    .bind(command.release_date.or(current.release_date))
    .bind(merge_opt_text(&command.photo_url, &current.photo_url))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    let changes = capture_patch_changes(&current, &updated, &command)?;
    let event = AuditEvent::for_update(changes, "status");

    audit::log_entity_action(&mut *tx, command.actor_id, &updated, event, AuditContext::new())
        .await?;

    tx.commit().await?;

    tracing::info!(seizure_id = %updated.id, status = %updated.status, "Seizure updated");

    Ok(updated)
}
