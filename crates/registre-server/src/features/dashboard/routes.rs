use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use sqlx::PgPool;

use crate::api::response::{ApiResponse, AppError};
use crate::auth::ActingUser;
use crate::features::shared::AppQuery;

use super::queries::{GetDashboardStatsQuery, RecentActivityQuery};

pub fn dashboard_routes() -> Router<PgPool> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/recent-activity", get(get_recent_activity))
}

#[tracing::instrument(skip(pool, _actor))]
async fn get_stats(State(pool): State<PgPool>, _actor: ActingUser) -> Result<Response, AppError> {
    let stats = super::queries::stats::handle(pool, GetDashboardStatsQuery).await?;

    Ok(ApiResponse::success(stats).into_response())
}

#[tracing::instrument(skip(pool, _actor))]
async fn get_recent_activity(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<RecentActivityQuery>,
) -> Result<Response, AppError> {
    let activity = super::queries::recent::handle(pool, query).await?;

    Ok(ApiResponse::success(activity).into_response())
}
