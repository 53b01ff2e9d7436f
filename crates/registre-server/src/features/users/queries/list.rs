use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::Role;
use crate::features::shared::{search_pattern, PaginationMetadata, PaginationParams, SortOrder};
use crate::features::users::{UserError, UserView, USER_VIEW_SELECT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortBy {
    Name,
    Email,
    Role,
    #[default]
    CreatedAt,
}

impl UserSortBy {
    fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: UserSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserView>,
    pub pagination: PaginationMetadata,
}

impl Request<Result<ListUsersResponse, UserError>> for ListUsersQuery {}

impl crate::cqrs::middleware::Query for ListUsersQuery {}

const PREDICATE: &str = r#"
    ($1::TEXT IS NULL OR u.name ILIKE $1 OR u.email ILIKE $1)
    AND ($2::TEXT IS NULL OR u.role = $2)
    AND ($3::BOOLEAN IS NULL OR u.is_active = $3)
"#;

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: ListUsersQuery) -> Result<ListUsersResponse, UserError> {
    let pagination = PaginationParams::new(query.page, query.limit).validated()?;
    let search = search_pattern(query.search.as_deref());
    let role = query.role.map(|r| r.as_str());

    let count_sql = format!("SELECT COUNT(*) FROM users u WHERE {}", PREDICATE);
    let page_sql = format!(
        "{} WHERE {} ORDER BY u.{col} {dir}, u.id {dir} LIMIT $4 OFFSET $5",
        USER_VIEW_SELECT,
        PREDICATE,
        col = query.sort_by.column(),
        dir = query.sort_order.as_sql(),
    );

    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(search.as_deref())
        .bind(role)
        .bind(query.is_active)
        .fetch_one(&pool);

    let page = sqlx::query_as::<_, UserView>(&page_sql)
        .bind(search.as_deref())
        .bind(role)
        .bind(query.is_active)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&pool);

    let (total, users) = tokio::try_join!(count, page)?;

    Ok(ListUsersResponse {
        users,
        pagination: PaginationMetadata::from_params(&pagination, total),
    })
}
