use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError};
use crate::auth::ActingUser;
use crate::features::shared::{AppJson, AppPath, AppQuery};

use super::{
    commands::{
        AddVictimCommand, CreateIncidentCommand, DeleteIncidentCommand, RemoveVictimCommand,
        UpdateIncidentCommand, UpdateVictimCommand,
    },
    queries::{GetIncidentQuery, ListIncidentsQuery},
    VictimInput,
};

pub fn incidents_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_incidents).post(create_incident))
        .route(
            "/:id",
            get(get_incident).put(update_incident).delete(delete_incident),
        )
        .route("/:id/victims", post(add_victim))
        .route("/:id/victims/:victim_id", put(update_victim).delete(remove_victim))
}

#[tracing::instrument(skip(pool, actor, command), fields(actor_id = %actor.id))]
async fn create_incident(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppJson(mut command): AppJson<CreateIncidentCommand>,
) -> Result<Response, AppError> {
    command.actor_id = actor.id;

    let detail = super::commands::create::handle(pool, command).await?;

    tracing::info!(incident_id = %detail.view.incident.id, "Incident created via API");

    Ok(ApiResponse::created(detail))
}

#[tracing::instrument(skip(pool, _actor))]
async fn list_incidents(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppQuery(query): AppQuery<ListIncidentsQuery>,
) -> Result<Response, AppError> {
    let response = super::queries::list::handle(pool, query).await?;

    Ok(ApiResponse::success(response).into_response())
}

#[tracing::instrument(skip(pool, _actor), fields(id = %id))]
async fn get_incident(
    State(pool): State<PgPool>,
    _actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let detail = super::queries::get::handle(pool, GetIncidentQuery { id }).await?;

    Ok(ApiResponse::success(detail).into_response())
}

#[tracing::instrument(skip(pool, actor, command), fields(id = %id, actor_id = %actor.id))]
async fn update_incident(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(mut command): AppJson<UpdateIncidentCommand>,
) -> Result<Response, AppError> {
    command.id = id;
    command.actor_id = actor.id;

    let incident = super::commands::update::handle(pool, command).await?;

    Ok(ApiResponse::success(incident).into_response())
}

#[tracing::instrument(skip(pool, actor), fields(id = %id, actor_id = %actor.id))]
async fn delete_incident(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let command = DeleteIncidentCommand {
        id,
        actor_id: actor.id,
    };

    super::commands::delete::handle(pool, command).await?;

    tracing::info!(incident_id = %id, "Incident deleted via API");

    Ok(ApiResponse::success(json!({ "id": id })).into_response())
}

#[tracing::instrument(skip(pool, actor, victim), fields(incident_id = %incident_id, actor_id = %actor.id))]
async fn add_victim(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath(incident_id): AppPath<Uuid>,
    AppJson(victim): AppJson<VictimInput>,
) -> Result<Response, AppError> {
    let command = AddVictimCommand {
        incident_id,
        actor_id: actor.id,
        victim,
    };

    let victim = super::commands::victims::add(pool, command).await?;

    Ok(ApiResponse::created(victim))
}

#[tracing::instrument(skip(pool, actor, command), fields(incident_id = %incident_id, victim_id = %victim_id))]
async fn update_victim(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath((incident_id, victim_id)): AppPath<(Uuid, Uuid)>,
    AppJson(mut command): AppJson<UpdateVictimCommand>,
) -> Result<Response, AppError> {
    command.incident_id = incident_id;
    command.victim_id = victim_id;
    command.actor_id = actor.id;

    let victim = super::commands::victims::update(pool, command).await?;

    Ok(ApiResponse::success(victim).into_response())
}

#[tracing::instrument(skip(pool, actor), fields(incident_id = %incident_id, victim_id = %victim_id))]
async fn remove_victim(
    State(pool): State<PgPool>,
    actor: ActingUser,
    AppPath((incident_id, victim_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Response, AppError> {
    let command = RemoveVictimCommand {
        incident_id,
        victim_id,
        actor_id: actor.id,
    };

    super::commands::victims::remove(pool, command).await?;

    Ok(ApiResponse::success(json!({ "id": victim_id })).into_response())
}
