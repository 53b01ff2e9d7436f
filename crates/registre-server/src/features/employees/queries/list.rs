use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::employees::{EmployeeError, EmployeeView, EMPLOYEE_VIEW_SELECT};
use crate::features::shared::{search_pattern, PaginationMetadata, PaginationParams, SortOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeSortBy {
    FirstName,
    LastName,
    Email,
    JobTitle,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl EmployeeSortBy {
    fn column(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::JobTitle => "job_title",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Query to list employees; deactivated employees are included unless
/// `is_active` filters them out
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEmployeesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: EmployeeSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEmployeesResponse {
    pub employees: Vec<EmployeeView>,
    pub pagination: PaginationMetadata,
}

impl Request<Result<ListEmployeesResponse, EmployeeError>> for ListEmployeesQuery {}

impl crate::cqrs::middleware::Query for ListEmployeesQuery {}

const PREDICATE: &str = r#"
    ($1::TEXT IS NULL
        OR e.first_name ILIKE $1
        OR e.last_name ILIKE $1
        OR e.email ILIKE $1
        OR e.job_title ILIKE $1)
    AND ($2::BOOLEAN IS NULL OR e.is_active = $2)
"#;

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListEmployeesQuery,
) -> Result<ListEmployeesResponse, EmployeeError> {
    let pagination = PaginationParams::new(query.page, query.limit).validated()?;
    let search = search_pattern(query.search.as_deref());

    let count_sql = format!("SELECT COUNT(*) FROM employees e WHERE {}", PREDICATE);
    let page_sql = format!(
        "{} WHERE {} ORDER BY e.{col} {dir}, e.id {dir} LIMIT $3 OFFSET $4",
        EMPLOYEE_VIEW_SELECT,
        PREDICATE,
        col = query.sort_by.column(),
        dir = query.sort_order.as_sql(),
    );

    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(search.as_deref())
        .bind(query.is_active)
        .fetch_one(&pool);

    let page = sqlx::query_as::<_, EmployeeView>(&page_sql)
        .bind(search.as_deref())
        .bind(query.is_active)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&pool);

    let (total, employees) = tokio::try_join!(count, page)?;

    Ok(ListEmployeesResponse {
        employees,
        pagination: PaginationMetadata::from_params(&pagination, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::employees::commands::create::{self, tests::employee_command};
    use crate::features::shared::test_helpers::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_list_filters_active_and_searches_email(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        create::handle(pool.clone(), employee_command(admin.id, "grace@registre.cd"))
            .await
            .unwrap();
        let paul = create::handle(pool.clone(), employee_command(admin.id, "paul@registre.cd"))
            .await
            .unwrap();
        sqlx::query("UPDATE employees SET is_active = FALSE WHERE id = $1")
            .bind(paul.id)
            .execute(&pool)
            .await?;

        let all = handle(pool.clone(), ListEmployeesQuery::default()).await.unwrap();
        assert_eq!(all.pagination.total_items, 2);

        let active = ListEmployeesQuery {
            is_active: Some(true),
            ..Default::default()
        };
        let active = handle(pool.clone(), active).await.unwrap();
        assert_eq!(active.pagination.total_items, 1);
        assert_eq!(active.employees[0].employee.email, "grace@registre.cd");

        let by_email = ListEmployeesQuery {
            search: Some("PAUL@".to_string()),
            ..Default::default()
        };
        let by_email = handle(pool.clone(), by_email).await.unwrap();
        assert_eq!(by_email.employees.len(), 1);
        assert_eq!(by_email.employees[0].employee.id, paul.id);
        Ok(())
    }

    #[test]
    fn test_sort_allow_list() {
        let rejected = serde_json::from_value::<ListEmployeesQuery>(serde_json::json!({"sort_by": "sex"}));
        assert!(rejected.is_err());
    }
}
