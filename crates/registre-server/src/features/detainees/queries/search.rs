//! Detainee lookup for statement forms
//!
//! Returns id and display name only, ordered by name.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::detainees::DetaineeError;
use crate::features::shared::search_pattern;

const DEFAULT_SEARCH_LIMIT: i64 = 10;
const MAX_SEARCH_LIMIT: i64 = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchDetaineesQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DetaineeOption {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub status: String,
}

impl Request<Result<Vec<DetaineeOption>, DetaineeError>> for SearchDetaineesQuery {}

impl crate::cqrs::middleware::Query for SearchDetaineesQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: SearchDetaineesQuery,
) -> Result<Vec<DetaineeOption>, DetaineeError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);
    let pattern = search_pattern(query.q.as_deref());

    let options = sqlx::query_as::<_, DetaineeOption>(
        r#"
        SELECT id, first_name, last_name, status
        FROM detainees
        WHERE $1::TEXT IS NULL
           OR first_name ILIKE $1
           OR last_name ILIKE $1
           OR (first_name || ' ' || last_name) ILIKE $1
        ORDER BY last_name, first_name, id
        LIMIT $2
        "#,
    )
    .bind(pattern.as_deref())
    .bind(limit)
    .fetch_all(&pool)
    .await?;

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_search_by_full_name(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;
        TestDetainee::new("Marie", "Kabila").insert(&pool, admin.id).await?;

        let query = SearchDetaineesQuery {
            q: Some("jean muk".to_string()),
            limit: None,
        };
        let options = handle(pool.clone(), query).await.unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].last_name, "Mukendi");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_search_limit(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        for i in 0..3 {
            TestDetainee::new(&format!("Jean{}", i), "Mukendi").insert(&pool, admin.id).await?;
        }

        let query = SearchDetaineesQuery {
            q: None,
            limit: Some(2),
        };
        assert_eq!(handle(pool.clone(), query).await.unwrap().len(), 2);
        Ok(())
    }
}
