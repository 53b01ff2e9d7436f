use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::statements::{StatementError, StatementView, STATEMENT_VIEW_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStatementQuery {
    pub id: Uuid,
}

impl Request<Result<StatementView, StatementError>> for GetStatementQuery {}

impl crate::cqrs::middleware::Query for GetStatementQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetStatementQuery) -> Result<StatementView, StatementError> {
    let sql = format!("{} WHERE s.id = $1", STATEMENT_VIEW_SELECT);

    sqlx::query_as::<_, StatementView>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(StatementError::NotFound(query.id))
}
