use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::incidents::{IncidentError, IncidentView, INCIDENT_VIEW_SELECT};
use crate::features::shared::{search_pattern, PaginationMetadata, PaginationParams, SortOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSortBy {
    IncidentDate,
    IncidentType,
    Location,
    #[default]
    CreatedAt,
}

impl IncidentSortBy {
    fn column(&self) -> &'static str {
        match self {
            Self::IncidentDate => "incident_date",
            Self::IncidentType => "incident_type",
            Self::Location => "location",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListIncidentsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: IncidentSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Exact incident type
    pub incident_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListIncidentsResponse {
    pub incidents: Vec<IncidentView>,
    pub pagination: PaginationMetadata,
}

impl Request<Result<ListIncidentsResponse, IncidentError>> for ListIncidentsQuery {}

impl crate::cqrs::middleware::Query for ListIncidentsQuery {}

const PREDICATE: &str = r#"
    ($1::TEXT IS NULL
        OR i.incident_type ILIKE $1
        OR i.location ILIKE $1
        OR i.description ILIKE $1)
    AND ($2::TEXT IS NULL OR i.incident_type = $2)
"#;

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListIncidentsQuery,
) -> Result<ListIncidentsResponse, IncidentError> {
    let pagination = PaginationParams::new(query.page, query.limit).validated()?;
    let search = search_pattern(query.search.as_deref());
    let incident_type = query
        .incident_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let count_sql = format!("SELECT COUNT(*) FROM incidents i WHERE {}", PREDICATE);
    let page_sql = format!(
        "{} WHERE {} ORDER BY i.{col} {dir}, i.id {dir} LIMIT $3 OFFSET $4",
        INCIDENT_VIEW_SELECT,
        PREDICATE,
        col = query.sort_by.column(),
        dir = query.sort_order.as_sql(),
    );

    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(search.as_deref())
        .bind(incident_type)
        .fetch_one(&pool);

    let page = sqlx::query_as::<_, IncidentView>(&page_sql)
        .bind(search.as_deref())
        .bind(incident_type)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&pool);

    let (total, incidents) = tokio::try_join!(count, page)?;

    Ok(ListIncidentsResponse {
        incidents,
        pagination: PaginationMetadata::from_params(&pagination, total),
    })
}
