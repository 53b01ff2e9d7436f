use chrono::{DateTime, Utc};
use mediator::Request;
use registre_common::capture_patch_changes;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::incidents::{Incident, IncidentError};
use crate::features::shared::patch::{merge_text, patch_is_empty};
use crate::features::shared::validation::{MSG_FUTURE_DATE, MSG_NO_FIELDS};
use crate::features::shared::FieldErrors;

/// Partial update of an incident; victims are managed through their own commands
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIncidentCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<DateTime<Utc>>,
}

impl Request<Result<Incident, IncidentError>> for UpdateIncidentCommand {}

impl crate::cqrs::middleware::Command for UpdateIncidentCommand {}

impl UpdateIncidentCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        if patch_is_empty(self) {
            return Err(FieldErrors::single("body", MSG_NO_FIELDS));
        }

        let mut errors = FieldErrors::new();
        errors
            .required_opt("incident_type", self.incident_type.as_deref())
            .required_opt("description", self.description.as_deref())
            .required_opt("location", self.location.as_deref());

        if self.incident_date.is_some_and(|d| d > Utc::now()) {
            errors.add("incident_date", MSG_FUTURE_DATE);
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(incident_id = %command.id, actor_id = %command.actor_id))]
pub async fn handle(pool: PgPool, command: UpdateIncidentCommand) -> Result<Incident, IncidentError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Incident>("SELECT * FROM incidents WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(IncidentError::NotFound(command.id))?;

    let updated = sqlx::query_as::<_, Incident>(
        r#"
        UPDATE incidents
        SET incident_type = $2, description = $3, location = $4, incident_date = $5,
            updated_by = $6, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(merge_text(&command.incident_type, &current.incident_type))
    .bind(merge_text(&command.description, &current.description))
    .bind(merge_text(&command.location, &current.location))
    .bind(command.incident_date.unwrap_or(current.incident_date))
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

    tracing::info!(incident_id = %updated.id, "Incident updated");

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;
    use serde_json::json;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_update_location(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let incident = TestIncident::new("Noyade", "Lac Kivu").insert(&pool, admin.id).await?;

        let cmd = UpdateIncidentCommand {
            id: incident.id,
            actor_id: admin.id,
            location: Some("Port de Goma".to_string()),
            ..Default::default()
        };
        handle(pool.clone(), cmd).await.unwrap();

        let trail = audit_trail(&pool, "incident", &incident.id.to_string()).await?;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, "update");
        let change = trail[0].changed().unwrap().get("location").unwrap();
        assert_eq!(change.old, Some(json!("Lac Kivu")));
        assert_eq!(change.new, json!("Port de Goma"));
        Ok(())
    }

    #[test]
    fn test_future_date_is_rejected() {
        let cmd = UpdateIncidentCommand {
            incident_date: Some(Utc::now() + chrono::Duration::days(2)),
            ..Default::default()
        };
        assert!(cmd.validate().unwrap_err().contains("incident_date"));
    }
}
