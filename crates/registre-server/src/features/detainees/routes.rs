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
    commands::{CreateDetaineeCommand, DeleteDetaineeCommand, UpdateDetaineeCommand},
    queries::{GetDetaineeQuery, ListDetaineesQuery, SearchDetaineesQuery},
};

pub fn detainees_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_detainees).post(create_detainee))
        .route("/search", get(search_detainees))
        .route(
            "/:id",
            get(get_detainee).put(update_detainee).delete(delete_detainee),
        )
}

#[tracing::instrument(skip(pool, actor, command), fields(actor_id = %actor.id))]
async fn create_detainee(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppJson(mut command): AppJson<CreateDetaineeCommand>,
) -> Result<Response, AppError> {
    command.actor_id = actor.id;

    let detainee = super::commands::create::handle(pool, command).await?;

    tracing::info!(detainee_id = %detainee.id, "Detainee created via API");

    Ok(ApiResponse::created(detainee))
}

#[tracing::instrument(skip(pool, _actor))]
async fn list_detainees(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<ListDetaineesQuery>,
) -> Result<Response, AppError> {
    let response = super::queries::list::handle(pool, query).await?;

    tracing::debug!(count = response.detainees.len(), "Listed detainees");

    Ok(ApiResponse::success(response).into_response())
}

#[tracing::instrument(skip(pool, _actor))]
async fn search_detainees(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<SearchDetaineesQuery>,
) -> Result<Response, AppError> {
    let options = super::queries::search::handle(pool, query).await?;

    Ok(ApiResponse::success(options).into_response())
}

#[tracing::instrument(skip(pool, _actor), fields(id = %id))]
async fn get_detainee(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let detainee = super::queries::get::handle(pool, GetDetaineeQuery { id }).await?;

    Ok(ApiResponse::success(detainee).into_response())
}

#[tracing::instrument(skip(pool, actor, command), fields(id = %id, actor_id = %actor.id))]
async fn update_detainee(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(mut command): AppJson<UpdateDetaineeCommand>,
) -> Result<Response, AppError> {
    command.id = id;
    command.actor_id = actor.id;

    let detainee = super::commands::update::handle(pool, command).await?;

    tracing::info!(detainee_id = %detainee.id, "Detainee updated via API");

    Ok(ApiResponse::success(detainee).into_response())
}

#[tracing::instrument(skip(pool, actor), fields(id = %id, actor_id = %actor.id))]
async fn delete_detainee(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let command = DeleteDetaineeCommand {
        id,
        actor_id: actor.id,
    };

    super::commands::delete::handle(pool, command).await?;

    tracing::info!(detainee_id = %id, "Detainee deleted via API");

    Ok(ApiResponse::success(json!({ "id": id })).into_response())
}
