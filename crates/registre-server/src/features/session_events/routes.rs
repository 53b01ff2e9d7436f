use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use sqlx::PgPool;

use crate::api::response::AppError;
use crate::auth::ActingUser;
use crate::features::shared::AppJson;

use super::commands::RecordSessionEventCommand;

pub fn session_events_routes() -> Router<PgPool> {
    Router::new().route("/", post(record_session_event))
}

/// Always `202 Accepted`: the ledger write is best effort
#[tracing::instrument(skip(pool, actor, command), fields(actor_id = %actor.id))]
async fn record_session_event(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppJson(mut command): AppJson<RecordSessionEventCommand>,
) -> Result<Response, AppError> {
    command.user_id = actor.id;

    super::commands::record::handle(pool, command).await;

    Ok(StatusCode::ACCEPTED.into_response())
}
