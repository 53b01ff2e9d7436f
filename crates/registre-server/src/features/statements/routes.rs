use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError};
use crate::auth::ActingUser;
use crate::features::shared::{AppJson, AppPath, AppQuery};

use super::{
    commands::{CreateStatementCommand, DeleteStatementCommand, UpdateStatementCommand},
    queries::{GetStatementQuery, ListStatementsQuery},
};

pub fn statements_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_statements).post(create_statement))
        .route(
            "/:id",
            get(get_statement).put(update_statement).delete(delete_statement),
        )
}

#[tracing::instrument(skip(pool, actor, command), fields(actor_id = %actor.id))]
async fn create_statement(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppJson(mut command): AppJson<CreateStatementCommand>,
) -> Result<Response, AppError> {
    command.actor_id = actor.id;

    let statement = super::commands::create::handle(pool, command).await?;

    tracing::info!(statement_id = %statement.id, "Statement recorded via API");

    Ok(ApiResponse::created(statement))
}

#[tracing::instrument(skip(pool, _actor))]
async fn list_statements(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<ListStatementsQuery>,
) -> Result<Response, AppError> {
    let response = super::queries::list::handle(pool, query).await?;

    Ok(ApiResponse::success(response).into_response())
}

#[tracing::instrument(skip(pool, _actor), fields(id = %id))]
async fn get_statement(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let statement = super::queries::get::handle(pool, GetStatementQuery { id }).await?;

    Ok(ApiResponse::success(statement).into_response())
}

#[tracing::instrument(skip(pool, actor, command), fields(id = %id, actor_id = %actor.id))]
async fn update_statement(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(mut command): AppJson<UpdateStatementCommand>,
) -> Result<Response, AppError> {
    command.id = id;
    command.actor_id = actor.id;

    let statement = super::commands::update::handle(pool, command).await?;

    tracing::info!(statement_id = %statement.id, "Statement updated via API");

    Ok(ApiResponse::success(statement).into_response())
}

#[tracing::instrument(skip(pool, actor), fields(id = %id, actor_id = %actor.id))]
async fn delete_statement(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let command = DeleteStatementCommand {
        id,
        actor_id: actor.id,
    };

    super::commands::delete::handle(pool, command).await?;

    tracing::info!(statement_id = %id, "Statement deleted via API");

    Ok(ApiResponse::success(json!({ "id": id })).into_response())
}
