//! End-to-end tests of the HTTP surface

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;

mod helpers;
use helpers::{admin, agent, send, setup_test_app, trail};

fn jean_mukendi() -> Value {
    json!({
        "first_name": "Jean",
        "last_name": "Mukendi",
        "sex": "Male",
        "place_of_birth": "Goma",
        "date_of_birth": "1990-01-01",
        "residence": "Goma",
        "crime_reason": "Vol",
        "arrest_date": "2024-01-01",
        "arrest_location": "Goma Centre"
    })
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_health(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, json) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_detainee_lifecycle(pool: PgPool) {
    let admin = admin(&pool).await;
    let app = setup_test_app(pool);

    let (status, json) =
        send(&app, Method::POST, "/api/v1/detainees", Some(admin), Some(jean_mukendi())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "in_custody");
    let id = json["data"]["id"].as_str().unwrap().to_string();

    let entries = trail(&app, admin, "detainee", &id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "create");
    assert_eq!(entries[0]["entityType"], "detainee");
    assert_eq!(entries[0]["userId"], admin.to_string());
    let description = entries[0]["details"]["description"].as_str().unwrap();
    assert!(description.contains("Jean") && description.contains("Mukendi"));

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/detainees/{}", id),
        Some(admin),
        Some(json!({ "status": "released", "release_date": "2024-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = trail(&app, admin, "detainee", &id).await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "status_change");
    assert_eq!(
        entries[0]["details"]["changed"]["status"],
        json!({ "old": "in_custody", "new": "released" })
    );

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/api/v1/detainees/{}", id),
        Some(admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["updated_by_name"], "Admin Principal");
    assert_eq!(trail(&app, admin, "detainee", &id).await.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_seizure_delete_is_logged(pool: PgPool) {
    let agent = agent(&pool).await;
    let app = setup_test_app(pool.clone());

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/seizures",
        Some(agent),
        Some(json!({
            "item_name": "Toyota Corolla",
            "item_type": "vehicle",
            "seizure_location": "Goma Centre",
            "seizure_date": "2024-01-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/seizures/{}", id),
        Some(agent),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], id);

    let (status, _) =
        send(&app, Method::GET, &format!("/api/v1/seizures/{}", id), Some(agent), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let entries = trail(&app, agent, "seizure", &id).await;
    assert_eq!(entries[0]["action"], "delete");
    assert!(entries[0]["details"]["description"]
        .as_str()
        .unwrap()
        .contains("Toyota Corolla"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_pagination_past_the_end(pool: PgPool) {
    let admin = admin(&pool).await;
    let app = setup_test_app(pool);

    for (first, last) in [("Jean", "Mukendi"), ("Paul", "Kabeya"), ("Marie", "Tshala")] {
        let mut body = jean_mukendi();
        body["first_name"] = json!(first);
        body["last_name"] = json!(last);
        let (status, _) = send(&app, Method::POST, "/api/v1/detainees", Some(admin), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, json) =
        send(&app, Method::GET, "/api/v1/detainees?page=5&limit=2", Some(admin), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["detainees"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["pagination"]["total_items"], 3);
    assert_eq!(json["data"]["pagination"]["total_pages"], 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_sort_column_is_rejected(pool: PgPool) {
    let admin = admin(&pool).await;
    let app = setup_test_app(pool);

    let (status, json) = send(
        &app,
        Method::GET,
        "/api/v1/detainees?sort_by=crime_reason;DROP",
        Some(admin),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_validation_errors_are_per_field(pool: PgPool) {
    let admin = admin(&pool).await;
    let app = setup_test_app(pool);

    let mut body = jean_mukendi();
    body["first_name"] = json!("J");
    let (status, json) = send(&app, Method::POST, "/api/v1/detainees", Some(admin), Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"]["details"]["first_name"].is_array());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_requests_need_an_active_user(pool: PgPool) {
    let agent = agent(&pool).await;
    let app = setup_test_app(pool.clone());

    let (status, json) = send(&app, Method::GET, "/api/v1/detainees", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(agent)
        .execute(&pool)
        .await
        .unwrap();
    let (status, _) = send(&app, Method::GET, "/api/v1/detainees", Some(agent), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_user_mutations_are_admin_only(pool: PgPool) {
    let admin = admin(&pool).await;
    let agent = agent(&pool).await;
    let app = setup_test_app(pool);

    let new_user = json!({ "name": "Chantal Ilunga", "email": "chantal@registre.cd", "role": "manager" });

    let (status, json) =
        send(&app, Method::POST, "/api/v1/users", Some(agent), Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "FORBIDDEN");

    let (status, json) = send(&app, Method::POST, "/api/v1/users", Some(admin), Some(new_user)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(json["data"].get("password_hash").is_none());

    let (status, _) = send(&app, Method::GET, "/api/v1/users", Some(agent), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_password_reset_over_http(pool: PgPool) {
    let admin = admin(&pool).await;
    let agent = agent(&pool).await;
    let app = setup_test_app(pool);

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/v1/users/{}/password-reset", agent),
        Some(admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = json["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/users/password-reset/complete",
        None,
        Some(json!({ "token": token, "password": "nouveau-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = trail(&app, admin, "user", &agent.to_string()).await;
    assert_eq!(entries[0]["action"], "password_reset_completed");
    assert_eq!(entries[0]["userId"], agent.to_string());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_dashboard_and_session_events(pool: PgPool) {
    let agent = agent(&pool).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/session-events",
        Some(agent),
        Some(json!({ "event": "login" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, json) = send(&app, Method::GET, "/api/v1/dashboard/stats", Some(agent), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["audit_entries_today"], 1);

    let (status, json) =
        send(&app, Method::GET, "/api/v1/dashboard/recent-activity?limit=5", Some(agent), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["action"], "login");
    assert_eq!(json["data"][0]["userName"], "Agent Kasongo");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_entity_type_in_trail(pool: PgPool) {
    let agent = agent(&pool).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/audit-logs/organization/123",
        Some(agent),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
