use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::detainees::{DetaineeError, DetaineeView, DETAINEE_VIEW_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDetaineeQuery {
    pub id: Uuid,
}

impl Request<Result<DetaineeView, DetaineeError>> for GetDetaineeQuery {}

impl crate::cqrs::middleware::Query for GetDetaineeQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetDetaineeQuery) -> Result<DetaineeView, DetaineeError> {
    let sql = format!("{} WHERE d.id = $1", DETAINEE_VIEW_SELECT);

    sqlx::query_as::<_, DetaineeView>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(DetaineeError::NotFound(query.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_detainee(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let agent = TestUser::agent().insert(&pool).await?;
        let detainee = TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;
        sqlx::query("UPDATE detainees SET updated_by = $2 WHERE id = $1")
            .bind(detainee.id)
            .bind(agent.id)
            .execute(&pool)
            .await?;

        let view = handle(pool.clone(), GetDetaineeQuery { id: detainee.id }).await.unwrap();

        assert_eq!(view.detainee.full_name(), "Jean Mukendi");
        assert_eq!(view.created_by_name.as_deref(), Some("Admin Principal"));
        assert_eq!(view.updated_by_name.as_deref(), Some("Agent Kasongo"));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_missing_detainee(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool.clone(), GetDetaineeQuery { id: Uuid::new_v4() }).await;
        assert!(matches!(result, Err(DetaineeError::NotFound(_))));
        Ok(())
    }
}
