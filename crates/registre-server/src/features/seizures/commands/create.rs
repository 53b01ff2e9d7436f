use chrono::{NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::seizures::{Seizure, SeizureError, SeizureStatus};
use crate::features::shared::{patch::clean_opt, FieldErrors};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSeizureCommand {
    #[serde(skip)]
    pub actor_id: Uuid,

    pub item_name: String,
    pub item_type: String,
    pub description: Option<String>,
    pub owner_name: Option<String>,
    pub owner_residence: Option<String>,
    pub seizure_location: String,
    pub seizure_date: NaiveDate,
    /// Defaults to `in_custody`
    pub status: Option<SeizureStatus>,
    pub photo_url: Option<String>,
}

impl Request<Result<Seizure, SeizureError>> for CreateSeizureCommand {}

impl crate::cqrs::middleware::Command for CreateSeizureCommand {}

impl CreateSeizureCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .required("item_name", &self.item_name)
            .max_chars("item_name", &self.item_name, 255)
            .required("item_type", &self.item_type)
            .required("seizure_location", &self.seizure_location)
            .not_in_future("seizure_date", self.seizure_date, Utc::now().date_naive());
        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: CreateSeizureCommand) -> Result<Seizure, SeizureError> {
    command.validate()?;

    let status = command.status.unwrap_or(SeizureStatus::InCustody);
    let mut tx = pool.begin().await?;

    let seizure = sqlx::query_as::<_, Seizure>(
        r#"
        INSERT INTO seizures (
            item_name, item_type, description, owner_name, owner_residence,
            seizure_location, seizure_date, status, photo_url, created_by, updated_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING *
        "#,
    )
    .bind(command.item_name.trim())
    .bind(command.item_type.trim())
    .bind(clean_opt(command.description.as_deref()))
    .bind(clean_opt(command.owner_name.as_deref()))
    .bind(clean_opt(command.owner_residence.as_deref()))
    .bind(command.seizure_location.trim())
    .bind(command.seizure_date)
    .bind(status.as_str())
    .bind(clean_opt(command.photo_url.as_deref()))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    audit::log_entity_action(&mut *tx, command.actor_id, &seizure, AuditEvent::Create, AuditContext::new())
        .await?;

    tx.commit().await?;

    tracing::info!(seizure_id = %seizure.id, "Seizure recorded");

    Ok(seizure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;

    fn corolla(actor_id: Uuid) -> CreateSeizureCommand {
        CreateSeizureCommand {
            actor_id,
            item_name: "Toyota Corolla".to_string(),
            item_type: "vehicle".to_string(),
            description: Some("Berline grise, plaque CGO 1234".to_string()),
            owner_name: None,
            owner_residence: None,
            seizure_location: "Goma Centre".to_string(),
            seizure_date: date(2024, 1, 2),
            status: None,
            photo_url: None,
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_defaults_to_in_custody(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;

        let seizure = handle(pool.clone(), corolla(admin.id)).await.unwrap();
        assert_eq!(seizure.status, "in_custody");

        let trail = audit_trail(&pool, "seizure", &seizure.id.to_string()).await?;
        assert_eq!(trail[0].description(), "Création de la saisie Toyota Corolla");
        Ok(())
    }

    #[test]
    fn test_validation() {
        let mut cmd = corolla(Uuid::nil());
        cmd.item_type = String::new();
        cmd.seizure_location = "  ".to_string();
        let errors = cmd.validate().unwrap_err();
        assert!(errors.contains("item_type"));
        assert!(errors.contains("seizure_location"));
    }
}
