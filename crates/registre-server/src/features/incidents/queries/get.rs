use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::incidents::{IncidentDetail, IncidentError, IncidentView, Victim, INCIDENT_VIEW_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetIncidentQuery {
    pub id: Uuid,
}

impl Request<Result<IncidentDetail, IncidentError>> for GetIncidentQuery {}

impl crate::cqrs::middleware::Query for GetIncidentQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetIncidentQuery) -> Result<IncidentDetail, IncidentError> {
    let sql = format!("{} WHERE i.id = $1", INCIDENT_VIEW_SELECT);

    let incident = sqlx::query_as::<_, IncidentView>(&sql)
        .bind(query.id)
        .fetch_optional(&pool);

    let victims = sqlx::query_as::<_, Victim>(
        "SELECT * FROM victims WHERE incident_id = $1 ORDER BY created_at, id",
    )
    .bind(query.id)
    .fetch_all(&pool);

    let (incident, victims) = tokio::try_join!(incident, victims)?;
    let view = incident.ok_or(IncidentError::NotFound(query.id))?;

    Ok(IncidentDetail { view, victims })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::incidents::commands::create::{self, tests::{incident_command, victim}};
    use crate::features::shared::test_helpers::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_incident_with_victims(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let created = create::handle(
            pool.clone(),
            incident_command(admin.id, vec![victim("Eric Bahati"), victim("Josué Kambale")]),
        )
        .await
        .unwrap();

        let detail = handle(pool.clone(), GetIncidentQuery { id: created.view.incident.id })
            .await
            .unwrap();

        assert_eq!(detail.victims.len(), 2);
        assert_eq!(detail.view.victim_count, 2);
        assert_eq!(detail.view.created_by_name.as_deref(), Some("Admin Principal"));

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["location"], "Rutshuru");
        assert_eq!(json["victims"].as_array().unwrap().len(), 2);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_missing_incident(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool.clone(), GetIncidentQuery { id: Uuid::new_v4() }).await;
        assert!(matches!(result, Err(IncidentError::NotFound(_))));
        Ok(())
    }
}
