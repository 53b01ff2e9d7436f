use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::reports::{ReportError, ReportView, REPORT_VIEW_SELECT};
use crate::features::shared::{search_pattern, PaginationMetadata, PaginationParams, SortOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSortBy {
    Title,
    ReportDate,
    Category,
    #[default]
    CreatedAt,
}

impl ReportSortBy {
    fn column(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ReportDate => "report_date",
            Self::Category => "category",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListReportsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: ReportSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReportsResponse {
    pub reports: Vec<ReportView>,
    pub pagination: PaginationMetadata,
}

impl Request<Result<ListReportsResponse, ReportError>> for ListReportsQuery {}

impl crate::cqrs::middleware::Query for ListReportsQuery {}

const PREDICATE: &str = r#"
    ($1::TEXT IS NULL
        OR r.title ILIKE $1
        OR r.content ILIKE $1
        OR r.location ILIKE $1)
    AND ($2::TEXT IS NULL OR r.category = $2)
"#;

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: ListReportsQuery) -> Result<ListReportsResponse, ReportError> {
    let pagination = PaginationParams::new(query.page, query.limit).validated()?;
    let search = search_pattern(query.search.as_deref());
    let category = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty());

    let count_sql = format!("SELECT COUNT(*) FROM reports r WHERE {}", PREDICATE);
    let page_sql = format!(
        "{} WHERE {} ORDER BY r.{col} {dir}, r.id {dir} LIMIT $3 OFFSET $4",
        REPORT_VIEW_SELECT,
        PREDICATE,
        col = query.sort_by.column(),
        dir = query.sort_order.as_sql(),
    );

    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(search.as_deref())
        .bind(category)
        .fetch_one(&pool);

    let page = sqlx::query_as::<_, ReportView>(&page_sql)
        .bind(search.as_deref())
        .bind(category)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&pool);

    let (total, reports) = tokio::try_join!(count, page)?;

    Ok(ListReportsResponse {
        reports,
        pagination: PaginationMetadata::from_params(&pagination, total),
    })
}
