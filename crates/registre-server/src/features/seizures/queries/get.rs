use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::seizures::{SeizureError, SeizureView, SEIZURE_VIEW_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSeizureQuery {
    pub id: Uuid,
}

impl Request<Result<SeizureView, SeizureError>> for GetSeizureQuery {}

impl crate::cqrs::middleware::Query for GetSeizureQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetSeizureQuery) -> Result<SeizureView, SeizureError> {
    let sql = format!("{} WHERE s.id = $1", SEIZURE_VIEW_SELECT);

    sqlx::query_as::<_, SeizureView>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(SeizureError::NotFound(query.id))
}
