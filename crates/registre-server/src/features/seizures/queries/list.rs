use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::seizures::{SeizureError, SeizureStatus, SeizureView, SEIZURE_VIEW_SELECT};
use crate::features::shared::{search_pattern, PaginationMetadata, PaginationParams, SortOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeizureSortBy {
    ItemName,
    SeizureDate,
    Status,
    #[default]
    CreatedAt,
}

impl SeizureSortBy {
    fn column(&self) -> &'static str {
        match self {
            Self::ItemName => "item_name",
            Self::SeizureDate => "seizure_date",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSeizuresQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: SeizureSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub status: Option<SeizureStatus>,
    pub item_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSeizuresResponse {
    pub seizures: Vec<SeizureView>,
    pub pagination: PaginationMetadata,
}

impl Request<Result<ListSeizuresResponse, SeizureError>> for ListSeizuresQuery {}

impl crate::cqrs::middleware::Query for ListSeizuresQuery {}

const PREDICATE: &str = r#"
    ($1::TEXT IS NULL
        OR s.item_name ILIKE $1
        OR s.owner_name ILIKE $1
        OR s.seizure_location ILIKE $1)
    AND ($2::TEXT IS NULL OR s.status = $2)
    AND ($3::TEXT IS NULL OR s.item_type = $3)
"#;

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: ListSeizuresQuery) -> Result<ListSeizuresResponse, SeizureError> {
    let pagination = PaginationParams::new(query.page, query.limit).validated()?;
    let search = search_pattern(query.search.as_deref());
    let status = query.status.map(|s| s.as_str());
    let item_type = query.item_type.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let count_sql = format!("SELECT COUNT(*) FROM seizures s WHERE {}", PREDICATE);
    let page_sql = format!(
        "{} WHERE {} ORDER BY s.{col} {dir}, s.id {dir} LIMIT $4 OFFSET $5",
        SEIZURE_VIEW_SELECT,
        PREDICATE,
        col = query.sort_by.column(),
        dir = query.sort_order.as_sql(),
    );

    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(search.as_deref())
        .bind(status)
        .bind(item_type)
        .fetch_one(&pool);

    let page = sqlx::query_as::<_, SeizureView>(&page_sql)
        .bind(search.as_deref())
        .bind(status)
        .bind(item_type)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&pool);

    let (total, seizures) = tokio::try_join!(count, page)?;

    Ok(ListSeizuresResponse {
        seizures,
        pagination: PaginationMetadata::from_params(&pagination, total),
    })
}
