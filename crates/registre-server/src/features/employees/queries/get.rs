use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::employees::{EmployeeError, EmployeeView, EMPLOYEE_VIEW_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEmployeeQuery {
    pub id: Uuid,
}

impl Request<Result<EmployeeView, EmployeeError>> for GetEmployeeQuery {}

impl crate::cqrs::middleware::Query for GetEmployeeQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetEmployeeQuery) -> Result<EmployeeView, EmployeeError> {
    let sql = format!("{} WHERE e.id = $1", EMPLOYEE_VIEW_SELECT);

    sqlx::query_as::<_, EmployeeView>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(EmployeeError::NotFound(query.id))
}
