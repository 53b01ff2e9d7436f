//! Update detainee command
//!
//! Applies a partial update and records the applied fields that actually
//! changed. A change of `status` is logged as `status_change`.

use chrono::{NaiveDate, Utc};
use mediator::Request;
use registre_common::capture_patch_changes;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::detainees::{Detainee, DetaineeError, DetaineeStatus};
use crate::features::shared::patch::{merge_opt_text, merge_text, patch_is_empty};
use crate::features::shared::validation::MSG_NO_FIELDS;
use crate::features::shared::{FieldErrors, Sex};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDetaineeCommand {
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
    pub place_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_names: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crime_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrest_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrest_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrested_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DetaineeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_destination: Option<String>,
}

impl Request<Result<Detainee, DetaineeError>> for UpdateDetaineeCommand {}

impl crate::cqrs::middleware::Command for UpdateDetaineeCommand {}

impl UpdateDetaineeCommand {
    /// Empty patch for `id`, fields are set by the caller
    pub fn new(id: Uuid, actor_id: Uuid) -> Self {
        Self {
            id,
            actor_id,
            first_name: None,
            last_name: None,
            sex: None,
            place_of_birth: None,
            date_of_birth: None,
            parent_names: None,
            marital_status: None,
            profession: None,
            residence: None,
            phone_number: None,
            crime_reason: None,
            arrest_date: None,
            arrest_location: None,
            arrested_by: None,
            cell_number: None,
            photo_url: None,
            status: None,
            release_date: None,
            release_reason: None,
            transfer_destination: None,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        if patch_is_empty(self) {
            return Err(FieldErrors::single("body", MSG_NO_FIELDS));
        }

        let today = Utc::now().date_naive();
        let mut errors = FieldErrors::new();

        errors
            .min_chars_opt("first_name", self.first_name.as_deref(), 2)
            .min_chars_opt("last_name", self.last_name.as_deref(), 2)
            .required_opt("place_of_birth", self.place_of_birth.as_deref())
            .required_opt("residence", self.residence.as_deref())
            .required_opt("crime_reason", self.crime_reason.as_deref())
            .required_opt("arrest_location", self.arrest_location.as_deref());

        if let Some(date_of_birth) = self.date_of_birth {
            errors.not_in_future("date_of_birth", date_of_birth, today);
        }
        if let Some(arrest_date) = self.arrest_date {
            errors.not_in_future("arrest_date", arrest_date, today);
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(detainee_id = %command.id, actor_id = %command.actor_id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateDetaineeCommand,
) -> Result<Detainee, DetaineeError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Detainee>("SELECT * FROM detainees WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DetaineeError::NotFound(command.id))?;

    let updated = sqlx::query_as::<_, Detainee>(
        r#"
        UPDATE detainees
        SET first_name = $2, last_name = $3, sex = $4, place_of_birth = $5,
            date_of_birth = $6, parent_names = $7, marital_status = $8, profession = $9,
            residence = $10, phone_number = $11, crime_reason = $12, arrest_date = $13,
            arrest_location = $14, arrested_by = $15, cell_number = $16, photo_url = $17,
            status = $18, release_date = $19, release_reason = $20,
            transfer_destination = $21, updated_by = $22, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(merge_text(&command.first_name, &current.first_name))
    .bind(merge_text(&command.last_name, &current.last_name))
    .bind(command.sex.map_or(current.sex.as_str(), |sex| sex.as_str()))
    .bind(merge_text(&command.place_of_birth, &current.place_of_birth))
    .bind(command.date_of_birth.unwrap_or(current.date_of_birth))
    .bind(merge_opt_text(&command.parent_names, &current.parent_names))
    .bind(merge_opt_text(&command.marital_status, &current.marital_status))
    .bind(merge_opt_text(&command.profession, &current.profession))
    .bind(merge_text(&command.residence, &current.residence))
    .bind(merge_opt_text(&command.phone_number, &current.phone_number))
    .bind(merge_text(&command.crime_reason, &current.crime_reason))
    .bind(command.arrest_date.unwrap_or(current.arrest_date))
    .bind(merge_text(&command.arrest_location, &current.arrest_location))
    .bind(merge_opt_text(&command.arrested_by, &current.arrested_by))
    .bind(merge_opt_text(&command.cell_number, &current.cell_number))
    .bind(merge_opt_text(&command.photo_url, &current.photo_url))
    .bind(command.status.map_or(current.status.as_str(), |status| status.as_str()))
    .bind(command.release_date.or(current.release_date))
    .bind(merge_opt_text(&command.release_reason, &current.release_reason))
    .bind(merge_opt_text(&command.transfer_destination, &current.transfer_destination))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    let changes = capture_patch_changes(&current, &updated, &command)?;
    let event = AuditEvent::for_update(changes, "status");

    audit::log_entity_action(&mut *tx, command.actor_id, &updated, event, AuditContext::new())
        .await?;

    tx.commit().await?;

    tracing::info!(detainee_id = %updated.id, "Detainee updated");

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;
    use serde_json::json;

    #[test]
    fn test_empty_patch_is_rejected() {
        let errors = UpdateDetaineeCommand::new(Uuid::nil(), Uuid::nil())
            .validate()
            .unwrap_err();
        assert_eq!(errors.get("body"), Some(&[MSG_NO_FIELDS.to_string()][..]));
    }

    #[test]
    fn test_provided_fields_are_validated() {
        let mut cmd = UpdateDetaineeCommand::new(Uuid::nil(), Uuid::nil());
        cmd.first_name = Some("J".to_string());
        cmd.residence = Some("  ".to_string());

        let errors = cmd.validate().unwrap_err();
        assert!(errors.contains("first_name"));
        assert!(errors.contains("residence"));
        assert!(!errors.contains("last_name"));
    }

    #[test]
    fn test_unknown_status_is_rejected_by_deserialisation() {
        let result = serde_json::from_value::<UpdateDetaineeCommand>(json!({"status": "escaped"}));
        assert!(result.is_err());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_status_update_logs_status_change(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let detainee = TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;

        let mut cmd = UpdateDetaineeCommand::new(detainee.id, admin.id);
        cmd.status = Some(DetaineeStatus::Released);
        let updated = handle(pool.clone(), cmd).await.unwrap();

        assert_eq!(updated.status, "released");

        let trail = audit_trail(&pool, "detainee", &detainee.id.to_string()).await?;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, "status_change");

        let changed = trail[0].changed().unwrap();
        let status = changed.get("status").unwrap();
        assert_eq!(status.old, Some(json!("in_custody")));
        assert_eq!(status.new, json!("released"));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_plain_update_records_only_changed_fields(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let agent = TestUser::agent().insert(&pool).await?;
        let detainee = TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;

        let mut cmd = UpdateDetaineeCommand::new(detainee.id, agent.id);
        cmd.residence = Some("Bukavu".to_string());
        cmd.first_name = Some("Jean".to_string());
        let updated = handle(pool.clone(), cmd).await.unwrap();

        assert_eq!(updated.residence, "Bukavu");
        assert_eq!(updated.updated_by, agent.id);
        assert_eq!(updated.created_by, admin.id);

        let trail = audit_trail(&pool, "detainee", &detainee.id.to_string()).await?;
        assert_eq!(trail[0].action, "update");
        assert_eq!(trail[0].user_id, agent.id);

        let changed = trail[0].changed().unwrap();
        assert_eq!(changed.len(), 1);
        assert!(changed.contains("residence"));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_noop_update_is_still_logged(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let detainee = TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;

        let mut cmd = UpdateDetaineeCommand::new(detainee.id, admin.id);
        cmd.residence = Some("Goma".to_string());
        handle(pool.clone(), cmd).await.unwrap();

        let trail = audit_trail(&pool, "detainee", &detainee.id.to_string()).await?;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, "update");
        assert!(trail[0].changed().unwrap().is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_update_missing_detainee(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;

        let mut cmd = UpdateDetaineeCommand::new(Uuid::new_v4(), admin.id);
        cmd.residence = Some("Bukavu".to_string());
        let result = handle(pool.clone(), cmd).await;

        assert!(matches!(result, Err(DetaineeError::NotFound(_))));
        assert_eq!(count_audit_logs(&pool).await?, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_audit_failure_rolls_back_update(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let detainee = TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;
        reject_audit_inserts(&pool).await?;

        let mut cmd = UpdateDetaineeCommand::new(detainee.id, admin.id);
        cmd.status = Some(DetaineeStatus::Transferred);
        assert!(handle(pool.clone(), cmd).await.is_err());

        let status: String = sqlx::query_scalar("SELECT status FROM detainees WHERE id = $1")
            .bind(detainee.id)
            .fetch_one(&pool)
            .await?;
        assert_eq!(status, "in_custody");
        Ok(())
    }
}
