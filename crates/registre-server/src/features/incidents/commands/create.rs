//! Create incident command
//!
//! Victims listed on the incident are created with it; each victim gets its
//! own `create` entry next to the incident's.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::incidents::{Incident, IncidentDetail, IncidentError, IncidentView, VictimInput};
use crate::features::shared::validation::MSG_FUTURE_DATE;
use crate::features::shared::FieldErrors;

use super::victims::insert_victim;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIncidentCommand {
    #[serde(skip)]
    pub actor_id: Uuid,

    pub incident_type: String,
    pub description: String,
    pub location: String,
    pub incident_date: DateTime<Utc>,
    #[serde(default)]
    pub victims: Vec<VictimInput>,
}

impl Request<Result<IncidentDetail, IncidentError>> for CreateIncidentCommand {}

impl crate::cqrs::middleware::Command for CreateIncidentCommand {}

impl CreateIncidentCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors
            .required("incident_type", &self.incident_type)
            .required("description", &self.description)
            .required("location", &self.location);

        if self.incident_date > Utc::now() {
            errors.add("incident_date", MSG_FUTURE_DATE);
        }

        for (i, victim) in self.victims.iter().enumerate() {
            victim.check(&format!("victims[{}].", i), &mut errors);
        }

        errors.into_result()
    }
}

#[tracing::instrument(skip(pool, command), fields(actor_id = %command.actor_id, victims = command.victims.len()))]
pub async fn handle(
    pool: PgPool,
    command: CreateIncidentCommand,
) -> Result<IncidentDetail, IncidentError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let incident = sqlx::query_as::<_, Incident>(
        r#"
        INSERT INTO incidents (incident_type, description, location, incident_date, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING *
        "#,
    )
    .bind(command.incident_type.trim())
    .bind(command.description.trim())
    .bind(command.location.trim())
    .bind(command.incident_date)
    .bind(command.actor_id)
    .fetch_one(&mut *tx)
    .await?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &incident,
        AuditEvent::Create,
        AuditContext::new().with("victim_count", command.victims.len()),
    )
    .await?;

    let mut victims = Vec::with_capacity(command.victims.len());
    for input in &command.victims {
        victims.push(insert_victim(&mut tx, incident.id, input, command.actor_id).await?);
    }

    tx.commit().await?;

    tracing::info!(incident_id = %incident.id, "Incident created");

    Ok(IncidentDetail {
        view: IncidentView {
            victim_count: victims.len() as i64,
            incident,
            created_by_name: None,
            updated_by_name: None,
        },
        victims,
    })
}
