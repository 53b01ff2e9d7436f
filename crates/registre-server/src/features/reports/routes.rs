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
    commands::{CreateReportCommand, DeleteReportCommand, UpdateReportCommand},
    queries::{GetReportQuery, ListReportsQuery},
};

pub fn reports_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route(
            "/:id",
            get(get_report).put(update_report).delete(delete_report),
        )
}

#[tracing::instrument(skip(pool, actor, command), fields(actor_id = %actor.id))]
async fn create_report(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppJson(mut command): AppJson<CreateReportCommand>,
) -> Result<Response, AppError> {
    command.actor_id = actor.id;

    let report = super::commands::create::handle(pool, command).await?;

    tracing::info!(report_id = %report.id, "Report created via API");

    Ok(ApiResponse::created(report))
}

#[tracing::instrument(skip(pool, _actor))]
async fn list_reports(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<ListReportsQuery>,
) -> Result<Response, AppError> {
    let response = super::queries::list::handle(pool, query).await?;

    Ok(ApiResponse::success(response).into_response())
}

#[tracing::instrument(skip(pool, _actor), fields(id = %id))]
async fn get_report(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let report = super::queries::get::handle(pool, GetReportQuery { id }).await?;

    Ok(ApiResponse::success(report).into_response())
}

#[tracing::instrument(skip(pool, actor, command), fields(id = %id, actor_id = %actor.id))]
async fn update_report(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(mut command): AppJson<UpdateReportCommand>,
) -> Result<Response, AppError> {
    command.id = id;
    command.actor_id = actor.id;

    let report = super::commands::update::handle(pool, command).await?;

    tracing::info!(report_id = %report.id, "Report updated via API");

    Ok(ApiResponse::success(report).into_response())
}

#[tracing::instrument(skip(pool, actor), fields(id = %id, actor_id = %actor.id))]
async fn delete_report(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let command = DeleteReportCommand {
        id,
        actor_id: actor.id,
    };

    super::commands::delete::handle(pool, command).await?;

    tracing::info!(report_id = %id, "Report deleted via API");

    Ok(ApiResponse::success(json!({ "id": id })).into_response())
}
