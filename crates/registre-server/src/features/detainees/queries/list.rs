//! List detainees query
//!
//! Paginated listing with free-text search over names, residence and arrest
//! location, plus status and sex filters.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::detainees::{DetaineeError, DetaineeStatus, DetaineeView, DETAINEE_VIEW_SELECT};
use crate::features::shared::{
    search_pattern, PaginationMetadata, PaginationParams, Sex, SortOrder,
};

/// Columns a detainee listing may be sorted on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetaineeSortBy {
    FirstName,
    LastName,
    ArrestDate,
    #[default]
    CreatedAt,
    UpdatedAt,
    Status,
}

impl DetaineeSortBy {
    fn column(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::ArrestDate => "arrest_date",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Status => "status",
        }
    }
}

/// Query to list detainees
///
/// # Examples
///
/// ```rust,ignore
/// let query = ListDetaineesQuery {
///     page: Some(1),
///     limit: Some(20),
///     search: Some("mukendi".to_string()),
///     status: Some(DetaineeStatus::InCustody),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDetaineesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: DetaineeSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub status: Option<DetaineeStatus>,
    pub sex: Option<Sex>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDetaineesResponse {
    pub detainees: Vec<DetaineeView>,
    pub pagination: PaginationMetadata,
}

impl Request<Result<ListDetaineesResponse, DetaineeError>> for ListDetaineesQuery {}

impl crate::cqrs::middleware::Query for ListDetaineesQuery {}

const PREDICATE: &str = r#"
    ($1::TEXT IS NULL
        OR d.first_name ILIKE $1
        OR d.last_name ILIKE $1
        OR d.residence ILIKE $1
        OR d.arrest_location ILIKE $1)
    AND ($2::TEXT IS NULL OR d.status = $2)
    AND ($3::TEXT IS NULL OR d.sex = $3)
"#;

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListDetaineesQuery,
) -> Result<ListDetaineesResponse, DetaineeError> {
    let pagination = PaginationParams::new(query.page, query.limit).validated()?;

    let search = search_pattern(query.search.as_deref());
    let status = query.status.map(|s| s.as_str());
    let sex = query.sex.map(|s| s.as_str());

    let count_sql = format!("SELECT COUNT(*) FROM detainees d WHERE {}", PREDICATE);
    let page_sql = format!(
        "{} WHERE {} ORDER BY d.{col} {dir}, d.id {dir} LIMIT $4 OFFSET $5",
        DETAINEE_VIEW_SELECT,
        PREDICATE,
        col = query.sort_by.column(),
        dir = query.sort_order.as_sql(),
    );

    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(search.as_deref())
        .bind(status)
        .bind(sex)
        .fetch_one(&pool);

    let page = sqlx::query_as::<_, DetaineeView>(&page_sql)
        .bind(search.as_deref())
        .bind(status)
        .bind(sex)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&pool);

    let (total, detainees) = tokio::try_join!(count, page)?;

    Ok(ListDetaineesResponse {
        detainees,
        pagination: PaginationMetadata::from_params(&pagination, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;
    use serde_json::json;

    #[test]
    fn test_sort_by_allow_list() {
        let query: ListDetaineesQuery =
            serde_json::from_value(json!({"sort_by": "arrest_date", "sort_order": "asc"})).unwrap();
        assert_eq!(query.sort_by, DetaineeSortBy::ArrestDate);
        assert_eq!(query.sort_order, SortOrder::Asc);

        let rejected =
            serde_json::from_value::<ListDetaineesQuery>(json!({"sort_by": "password_hash"}));
        assert!(rejected.is_err());
    }

    #[test]
    fn test_defaults() {
        let query: ListDetaineesQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.sort_by, DetaineeSortBy::CreatedAt);
        assert_eq!(query.sort_order, SortOrder::Desc);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_list_with_search_and_status(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;
        TestDetainee::new("Marie", "Kabila")
            .with_residence("Bukavu")
            .insert(&pool, admin.id)
            .await?;
        TestDetainee::new("Paul", "Mukendi")
            .with_status("released")
            .insert(&pool, admin.id)
            .await?;

        let all = handle(pool.clone(), ListDetaineesQuery::default()).await.unwrap();
        assert_eq!(all.pagination.total_items, 3);
        assert_eq!(all.detainees[0].created_by_name.as_deref(), Some("Admin Principal"));

        let query = ListDetaineesQuery {
            search: Some("MUKENDI".to_string()),
            status: Some(DetaineeStatus::InCustody),
            ..Default::default()
        };
        let found = handle(pool.clone(), query).await.unwrap();
        assert_eq!(found.pagination.total_items, 1);
        assert_eq!(found.detainees[0].detainee.first_name, "Jean");

        let query = ListDetaineesQuery {
            search: Some("bukavu".to_string()),
            ..Default::default()
        };
        let found = handle(pool.clone(), query).await.unwrap();
        assert_eq!(found.detainees.len(), 1);
        assert_eq!(found.detainees[0].detainee.last_name, "Kabila");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_sorting(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        for (first, last) in [("Jean", "Mukendi"), ("Aline", "Zawadi"), ("Marie", "Kabila")] {
            TestDetainee::new(first, last).insert(&pool, admin.id).await?;
        }

        let query = ListDetaineesQuery {
            sort_by: DetaineeSortBy::LastName,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let result = handle(pool.clone(), query).await.unwrap();
        let names: Vec<_> = result.detainees.iter().map(|d| d.detainee.last_name.as_str()).collect();
        assert_eq!(names, vec!["Kabila", "Mukendi", "Zawadi"]);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_page_past_the_end(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        for i in 0..5 {
            TestDetainee::new(&format!("Jean{}", i), "Mukendi").insert(&pool, admin.id).await?;
        }

        let query = ListDetaineesQuery {
            page: Some(4),
            limit: Some(2),
            ..Default::default()
        };
        let result = handle(pool.clone(), query).await.unwrap();

        assert!(result.detainees.is_empty());
        assert_eq!(result.pagination.total_items, 5);
        assert_eq!(result.pagination.total_pages, 3);
        assert_eq!(result.pagination.page, 4);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_invalid_limit(pool: PgPool) -> sqlx::Result<()> {
        let query = ListDetaineesQuery {
            limit: Some(500),
            ..Default::default()
        };
        let result = handle(pool.clone(), query).await;
        assert!(matches!(result, Err(DetaineeError::Validation(e)) if e.contains("limit")));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_reads_are_not_audited(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;

        handle(pool.clone(), ListDetaineesQuery::default()).await.unwrap();

        assert_eq!(count_audit_logs(&pool).await?, 0);
        Ok(())
    }
}
