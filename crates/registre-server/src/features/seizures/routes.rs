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
    commands::{CreateSeizureCommand, DeleteSeizureCommand, UpdateSeizureCommand},
    queries::{GetSeizureQuery, ListSeizuresQuery},
};

pub fn seizures_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_seizures).post(create_seizure))
        .route(
            "/:id",
            get(get_seizure).put(update_seizure).delete(delete_seizure),
        )
}

#[tracing::instrument(skip(pool, actor, command), fields(actor_id = %actor.id))]
async fn create_seizure(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppJson(mut command): AppJson<CreateSeizureCommand>,
) -> Result<Response, AppError> {
    command.actor_id = actor.id;

    let seizure = super::commands::create::handle(pool, command).await?;

    tracing::info!(seizure_id = %seizure.id, "Seizure recorded via API");

    Ok(ApiResponse::created(seizure))
}

#[tracing::instrument(skip(pool, _actor))]
async fn list_seizures(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<ListSeizuresQuery>,
) -> Result<Response, AppError> {
    let response = super::queries::list::handle(pool, query).await?;

    Ok(ApiResponse::success(response).into_response())
}

#[tracing::instrument(skip(pool, _actor), fields(id = %id))]
async fn get_seizure(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let seizure = super::queries::get::handle(pool, GetSeizureQuery { id }).await?;

    Ok(ApiResponse::success(seizure).into_response())
}

#[tracing::instrument(skip(pool, actor, command), fields(id = %id, actor_id = %actor.id))]
async fn update_seizure(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(mut command): AppJson<UpdateSeizureCommand>,
) -> Result<Response, AppError> {
    command.id = id;
    command.actor_id = actor.id;

    let seizure = super::commands::update::handle(pool, command).await?;

    tracing::info!(seizure_id = %seizure.id, "Seizure updated via API");

    Ok(ApiResponse::success(seizure).into_response())
}

#[tracing::instrument(skip(pool, actor), fields(id = %id, actor_id = %actor.id))]
async fn delete_seizure(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let command = DeleteSeizureCommand {
        id,
        actor_id: actor.id,
    };

    super::commands::delete::handle(pool, command).await?;

    tracing::info!(seizure_id = %id, "Seizure deleted via API");

    Ok(ApiResponse::success(json!({ "id": id })).into_response())
}
