use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::users::{UserError, UserView, USER_VIEW_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserQuery {
    pub id: Uuid,
}

impl Request<Result<UserView, UserError>> for GetUserQuery {}

impl crate::cqrs::middleware::Query for GetUserQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetUserQuery) -> Result<UserView, UserError> {
    let sql = format!("{} WHERE u.id = $1", USER_VIEW_SELECT);

    sqlx::query_as::<_, UserView>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(UserError::NotFound(query.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_password_hash_is_not_exposed(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        sqlx::query("UPDATE users SET password_hash = 'secret-hash' WHERE id = $1")
            .bind(admin.id)
            .execute(&pool)
            .await?;

        let view = handle(pool.clone(), GetUserQuery { id: admin.id }).await.unwrap();
        assert_eq!(view.user.password_hash.as_deref(), Some("secret-hash"));

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["name"], "Admin Principal");
        Ok(())
    }
}
