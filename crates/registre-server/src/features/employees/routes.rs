use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError};
use crate::auth::ActingUser;
use crate::features::shared::{AppJson, AppPath, AppQuery};

use super::{
    commands::{CreateEmployeeCommand, DeleteEmployeeCommand, UpdateEmployeeCommand},
    queries::{GetEmployeeQuery, ListEmployeesQuery},
};

pub fn employees_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

#[tracing::instrument(skip(pool, actor, command), fields(actor_id = %actor.id))]
async fn create_employee(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppJson(mut command): AppJson<CreateEmployeeCommand>,
) -> Result<Response, AppError> {
    command.actor_id = actor.id;

    let employee = super::commands::create::handle(pool, command).await?;

    tracing::info!(employee_id = %employee.id, "Employee created via API");

    Ok(ApiResponse::created(employee))
}

#[tracing::instrument(skip(pool, _actor))]
async fn list_employees(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<ListEmployeesQuery>,
) -> Result<Response, AppError> {
    let response = super::queries::list::handle(pool, query).await?;

    Ok(ApiResponse::success(response).into_response())
}

#[tracing::instrument(skip(pool, _actor), fields(id = %id))]
async fn get_employee(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let employee = super::queries::get::handle(pool, GetEmployeeQuery { id }).await?;

    Ok(ApiResponse::success(employee).into_response())
}

#[tracing::instrument(skip(pool, actor, command), fields(id = %id, actor_id = %actor.id))]
async fn update_employee(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(mut command): AppJson<UpdateEmployeeCommand>,
) -> Result<Response, AppError> {
    command.id = id;
    command.actor_id = actor.id;

    let employee = super::commands::update::handle(pool, command).await?;

    tracing::info!(employee_id = %employee.id, "Employee updated via API");

    Ok(ApiResponse::success(employee).into_response())
}

#[tracing::instrument(skip(pool, actor), fields(id = %id, actor_id = %actor.id))]
async fn delete_employee(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let command = DeleteEmployeeCommand {
        id,
        actor_id: actor.id,
    };

    let employee = super::commands::delete::handle(pool, command).await?;

    tracing::info!(employee_id = %id, "Employee deactivated via API");

    Ok(ApiResponse::success(employee).into_response())
}
