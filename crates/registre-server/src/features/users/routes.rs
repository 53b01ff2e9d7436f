use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError};
use crate::auth::ActingUser;
use crate::features::shared::{AppJson, AppPath, AppQuery};

use super::{
    commands::{
        CompletePasswordResetCommand, CreateUserCommand, DeleteUserCommand,
        InitiatePasswordResetCommand, UpdateUserCommand,
    },
    queries::{GetUserQuery, ListUsersQuery},
};

pub fn users_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/password-reset/complete", post(complete_password_reset))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/password-reset", post(initiate_password_reset))
}

#[tracing::instrument(skip(pool, actor, command), fields(actor_id = %actor.id))]
async fn create_user(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppJson(mut command): AppJson<CreateUserCommand>,
) -> Result<Response, AppError> {
    actor.require_admin()?;
    command.actor_id = actor.id;

    let user = super::commands::create::handle(pool, command).await?;

    tracing::info!(user_id = %user.id, "User created via API");

    Ok(ApiResponse::created(user))
}

#[tracing::instrument(skip(pool, _actor))]
async fn list_users(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<ListUsersQuery>,
) -> Result<Response, AppError> {
    let response = super::queries::list::handle(pool, query).await?;

    Ok(ApiResponse::success(response).into_response())
}

#[tracing::instrument(skip(pool, _actor), fields(id = %id))]
async fn get_user(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let user = super::queries::get::handle(pool, GetUserQuery { id }).await?;

    Ok(ApiResponse::success(user).into_response())
}

#[tracing::instrument(skip(pool, actor, command), fields(id = %id, actor_id = %actor.id))]
async fn update_user(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(mut command): AppJson<UpdateUserCommand>,
) -> Result<Response, AppError> {
    actor.require_admin()?;
    command.id = id;
    command.actor_id = actor.id;

    let user = super::commands::update::handle(pool, command).await?;

    Ok(ApiResponse::success(user).into_response())
}

#[tracing::instrument(skip(pool, actor), fields(id = %id, actor_id = %actor.id))]
async fn delete_user(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    actor.require_admin()?;

    let command = DeleteUserCommand {
        id,
        actor_id: actor.id,
    };
    let user = super::commands::delete::handle(pool, command).await?;

    tracing::info!(user_id = %id, "User deactivated via API");

    Ok(ApiResponse::success(user).into_response())
}

#[tracing::instrument(skip(pool, actor), fields(id = %id, actor_id = %actor.id))]
async fn initiate_password_reset(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    actor.require_admin()?;

    let command = InitiatePasswordResetCommand {
        user_id: id,
        actor_id: actor.id,
    };
    let issued = super::commands::password_reset::initiate(pool, command).await?;

    Ok(ApiResponse::created(issued))
}

/// Public: the token stands in for the session
#[tracing::instrument(skip_all)]
async fn complete_password_reset(
    State(pool): State<PgPool>,
    AppJson(command): AppJson<CompletePasswordResetCommand>,
) -> Result<Response, AppError> {
    let user = super::commands::password_reset::complete(pool, command).await?;

    Ok(ApiResponse::success(user).into_response())
}
