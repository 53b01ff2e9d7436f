//! Victim commands: add to, update on and remove from an incident

use mediator::Request;
use registre_common::capture_patch_changes;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::incidents::model::check_age;
use crate::features::incidents::{IncidentError, Victim, VictimInput};
use crate::features::shared::patch::{clean_opt, merge_opt_text, merge_text, patch_is_empty};
use crate::features::shared::validation::MSG_NO_FIELDS;
use crate::features::shared::{FieldErrors, Sex};

/// Insert a victim and its `create` entry on the caller's connection
pub(crate) async fn insert_victim(
    conn: &mut PgConnection,
    incident_id: Uuid,
    input: &VictimInput,
    actor_id: Uuid,
) -> Result<Victim, IncidentError> {
    let victim = sqlx::query_as::<_, Victim>(
        r#"
        INSERT INTO victims (incident_id, name, sex, age, cause_of_death, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING *
        "#,
    )
    .bind(incident_id)
    .bind(input.name.trim())
    .bind(input.sex.map(|s| s.as_str()))
    .bind(input.age)
    .bind(clean_opt(input.cause_of_death.as_deref()))
    .bind(actor_id)
    .fetch_one(&mut *conn)
    .await?;

    audit::log_entity_action(
        &mut *conn,
        actor_id,
        &victim,
        AuditEvent::Create,
        AuditContext::new().with("incident_id", incident_id),
    )
    .await?;

    Ok(victim)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVictimCommand {
    #[serde(skip)]
    pub incident_id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
    #[serde(flatten)]
    pub victim: VictimInput,
}

impl Request<Result<Victim, IncidentError>> for AddVictimCommand {}

impl crate::cqrs::middleware::Command for AddVictimCommand {}

#[tracing::instrument(skip(pool, command), fields(incident_id = %command.incident_id))]
pub async fn add(pool: PgPool, command: AddVictimCommand) -> Result<Victim, IncidentError> {
    let mut errors = FieldErrors::new();
    command.victim.check("", &mut errors);
    errors.into_result()?;

    let mut tx = pool.begin().await?;

    sqlx::query_scalar::<_, Uuid>("SELECT id FROM incidents WHERE id = $1 FOR UPDATE")
        .bind(command.incident_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(IncidentError::NotFound(command.incident_id))?;

    let victim = insert_victim(&mut tx, command.incident_id, &command.victim, command.actor_id).await?;

    tx.commit().await?;

    tracing::info!(victim_id = %victim.id, "Victim added");

    Ok(victim)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVictimCommand {
    #[serde(skip)]
    pub incident_id: Uuid,
    #[serde(skip)]
    pub victim_id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause_of_death: Option<String>,
}

impl Request<Result<Victim, IncidentError>> for UpdateVictimCommand {}

impl crate::cqrs::middleware::Command for UpdateVictimCommand {}

impl UpdateVictimCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        if patch_is_empty(self) {
            return Err(FieldErrors::single("body", MSG_NO_FIELDS));
        }
        let mut errors = FieldErrors::new();
        errors.min_chars_opt("name", self.name.as_deref(), 2);
        check_age("age", self.age, &mut errors);
        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(incident_id = %command.incident_id, victim_id = %command.victim_id))]
pub async fn update(pool: PgPool, command: UpdateVictimCommand) -> Result<Victim, IncidentError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current = lock_victim(&mut tx, command.incident_id, command.victim_id).await?;

    let updated = sqlx::query_as::<_, Victim>(
        r#"
        UPDATE victims
        SET name = $2, sex = $3, age = $4, cause_of_death = $5, updated_by = $6, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.victim_id)
    .bind(merge_text(&command.name, &current.name))
    .bind(command.sex.map(|s| s.as_str()).or(current.sex.as_deref()))
    .bind(command.age.or(current.age))
    .bind(merge_opt_text(&command.cause_of_death, &current.cause_of_death))
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    let changes = capture_patch_changes(&current, &updated, &command)?;
    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &updated,
        AuditEvent::Update(changes),
        AuditContext::new().with("incident_id", command.incident_id),
    )
    .await?;

    tx.commit().await?;

    Ok(updated)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveVictimCommand {
    pub incident_id: Uuid,
    pub victim_id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
}

impl Request<Result<(), IncidentError>> for RemoveVictimCommand {}

impl crate::cqrs::middleware::Command for RemoveVictimCommand {}

#[tracing::instrument(skip(pool), fields(incident_id = %command.incident_id, victim_id = %command.victim_id))]
pub async fn remove(pool: PgPool, command: RemoveVictimCommand) -> Result<(), IncidentError> {
    let mut tx = pool.begin().await?;

    let current = lock_victim(&mut tx, command.incident_id, command.victim_id).await?;

    sqlx::query("DELETE FROM victims WHERE id = $1")
        .bind(command.victim_id)
        .execute(&mut *tx)
        .await?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &current,
        AuditEvent::Delete,
        AuditContext::new()
            .with("incident_id", command.incident_id)
            .with("snapshot", &current),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("Victim removed");

    Ok(())
}

async fn lock_victim(
    conn: &mut PgConnection,
    incident_id: Uuid,
    victim_id: Uuid,
) -> Result<Victim, IncidentError> {
    sqlx::query_as::<_, Victim>(
        "SELECT * FROM victims WHERE id = $1 AND incident_id = $2 FOR UPDATE",
    )
    .bind(victim_id)
    .bind(incident_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(IncidentError::VictimNotFound(victim_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::incidents::commands::create::{self, tests::{incident_command, victim}};
    use crate::features::shared::test_helpers::*;
    use serde_json::json;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_add_victim(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let incident = TestIncident::new("Noyade", "Lac Kivu").insert(&pool, admin.id).await?;

        let added = add(
            pool.clone(),
            AddVictimCommand {
                incident_id: incident.id,
                actor_id: admin.id,
                victim: victim("Eric Bahati"),
            },
        )
        .await
        .unwrap();

        assert_eq!(added.incident_id, incident.id);
        assert_eq!(added.sex.as_deref(), Some("Male"));

        let trail = audit_trail(&pool, "victim", &added.id.to_string()).await?;
        assert_eq!(trail[0].action, "create");
        assert_eq!(trail[0].details.context["incident_id"], json!(incident.id));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_add_victim_to_missing_incident(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;

        let result = add(
            pool.clone(),
            AddVictimCommand {
                incident_id: Uuid::new_v4(),
                actor_id: admin.id,
                victim: victim("Eric Bahati"),
            },
        )
        .await;

        assert!(matches!(result, Err(IncidentError::NotFound(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_update_and_remove_victim(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let detail = create::handle(pool.clone(), incident_command(admin.id, vec![victim("Eric Bahati")]))
            .await
            .unwrap();
        let incident_id = detail.view.incident.id;
        let victim_id = detail.victims[0].id;

        let updated = update(
            pool.clone(),
            UpdateVictimCommand {
                incident_id,
                victim_id,
                actor_id: admin.id,
                age: Some(35),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.age, Some(35));

        remove(pool.clone(), RemoveVictimCommand { incident_id, victim_id, actor_id: admin.id })
            .await
            .unwrap();

        let trail = audit_trail(&pool, "victim", &victim_id.to_string()).await?;
        let actions: Vec<_> = trail.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["create", "update", "delete"]);
        let age = trail[1].changed().unwrap().get("age").unwrap();
        assert_eq!(age.old, Some(json!(34)));
        assert_eq!(age.new, json!(35));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_victim_of_another_incident_is_not_found(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let detail = create::handle(pool.clone(), incident_command(admin.id, vec![victim("Eric Bahati")]))
            .await
            .unwrap();
        let other = TestIncident::new("Noyade", "Lac Kivu").insert(&pool, admin.id).await?;

        let result = remove(
            pool.clone(),
            RemoveVictimCommand {
                incident_id: other.id,
                victim_id: detail.victims[0].id,
                actor_id: admin.id,
            },
        )
        .await;

        assert!(matches!(result, Err(IncidentError::VictimNotFound(_))));
        Ok(())
    }
}
