use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::api::response::{ApiResponse, AppError};
use crate::audit::EntityType;
use crate::auth::ActingUser;
use crate::features::shared::{AppPath, AppQuery};

use super::queries::{GetEntityTrailQuery, ListAuditLogsQuery};

pub fn audit_logs_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_audit_logs))
        .route("/:entity_type/:entity_id", get(get_entity_trail))
}

#[derive(Debug, Deserialize)]
struct TrailParams {
    limit: Option<i64>,
}

#[tracing::instrument(skip(pool, _actor))]
async fn list_audit_logs(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<ListAuditLogsQuery>,
) -> Result<Response, AppError> {
    let response = super::queries::list::handle(pool, query).await?;

    Ok(ApiResponse::success(response).into_response())
}

#[tracing::instrument(skip(pool, _actor))]
async fn get_entity_trail(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppPath((entity_type, entity_id)): AppPath<(EntityType, String)>,
    AppQuery(params): AppQuery<TrailParams>,
) -> Result<Response, AppError> {
    let query = GetEntityTrailQuery {
        entity_type,
        entity_id,
        limit: params.limit,
    };
    let trail = super::queries::trail::handle(pool, query).await?;

    Ok(ApiResponse::success(trail).into_response())
}
