use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::{search_pattern, PaginationMetadata, PaginationParams, SortOrder};
use crate::features::statements::{StatementError, StatementView, STATEMENT_VIEW_SELECT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementSortBy {
    StatementDate,
    #[default]
    CreatedAt,
}

impl StatementSortBy {
    fn column(&self) -> &'static str {
        match self {
            Self::StatementDate => "statement_date",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStatementsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches the content and the detainee's names
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: StatementSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub detainee_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListStatementsResponse {
    pub statements: Vec<StatementView>,
    pub pagination: PaginationMetadata,
}

impl Request<Result<ListStatementsResponse, StatementError>> for ListStatementsQuery {}

impl crate::cqrs::middleware::Query for ListStatementsQuery {}

const PREDICATE: &str = r#"
    ($1::TEXT IS NULL
        OR s.content ILIKE $1
        OR d.first_name ILIKE $1
        OR d.last_name ILIKE $1)
    AND ($2::UUID IS NULL OR s.detainee_id = $2)
"#;

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListStatementsQuery,
) -> Result<ListStatementsResponse, StatementError> {
    let pagination = PaginationParams::new(query.page, query.limit).validated()?;
    let search = search_pattern(query.search.as_deref());

    let count_sql = format!(
        "SELECT COUNT(*) FROM statements s JOIN detainees d ON d.id = s.detainee_id WHERE {}",
        PREDICATE
    );
    let page_sql = format!(
        "{} WHERE {} ORDER BY s.{col} {dir}, s.id {dir} LIMIT $3 OFFSET $4",
        STATEMENT_VIEW_SELECT,
        PREDICATE,
        col = query.sort_by.column(),
        dir = query.sort_order.as_sql(),
    );

    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(search.as_deref())
        .bind(query.detainee_id)
        .fetch_one(&pool);

    let page = sqlx::query_as::<_, StatementView>(&page_sql)
        .bind(search.as_deref())
        .bind(query.detainee_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&pool);

    let (total, statements) = tokio::try_join!(count, page)?;

    Ok(ListStatementsResponse {
        statements,
        pagination: PaginationMetadata::from_params(&pagination, total),
    })
}
