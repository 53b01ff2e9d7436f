//! Tests for the audit ledger through the library API
//!
//! These tests verify:
//! - Entry construction and storage
//! - Listing with filters and pagination
//! - Per-entity trails and recent activity

use chrono::{Duration, Utc};
use registre_common::{ChangeSet, FieldChange};
use registre_server::audit::{
    self, build_entry, AuditAction, AuditContext, AuditEvent, AuditLogFilter, EntityType,
};
use registre_server::features::shared::PaginationParams;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

mod helpers;

fn status_changes() -> ChangeSet {
    let mut changes = ChangeSet::new();
    changes.insert(
        "status",
        FieldChange::new(Some(json!("in_custody")), json!("released")),
    );
    changes
}

#[test]
fn test_build_entry_uses_default_description() {
    let entry = build_entry(
        Uuid::nil(),
        EntityType::Seizure,
        AuditEvent::Delete,
        "42",
        AuditContext::new(),
    );

    assert_eq!(entry.action, AuditAction::Delete);
    assert_eq!(entry.entity_id, "42");
    assert!(!entry.details.description.is_empty());
    assert!(entry.details.changed.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_log_action_stores_changes_and_context(pool: PgPool) {
    let admin = helpers::admin(&pool).await;

    let entry = audit::log_action(
        &pool,
        admin,
        EntityType::Detainee,
        AuditEvent::StatusChange(status_changes()),
        "d-1",
        AuditContext::described("Libération de Jean Mukendi").with("source", "test"),
    )
    .await
    .unwrap();

    assert_eq!(entry.action, "status_change");
    assert_eq!(entry.entity_type, "detainee");
    assert_eq!(entry.user_id, admin);
    assert_eq!(entry.description(), "Libération de Jean Mukendi");
    assert_eq!(entry.changed().unwrap().get("status").unwrap().new, json!("released"));
    assert_eq!(entry.details.context["source"], json!("test"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_filters_by_action_and_entity(pool: PgPool) {
    let admin = helpers::admin(&pool).await;

    for (entity_type, event) in [
        (EntityType::Detainee, AuditEvent::Create),
        (EntityType::Detainee, AuditEvent::Delete),
        (EntityType::Seizure, AuditEvent::Create),
    ] {
        audit::log_action(&pool, admin, entity_type, event, "x", AuditContext::new())
            .await
            .unwrap();
    }

    let filter = AuditLogFilter {
        action: Some(AuditAction::Create),
        entity_type: Some(EntityType::Detainee),
        ..Default::default()
    };
    let (records, total) = audit::list_audit_logs(&pool, &filter, &PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(records[0].entry.action, "create");
    assert_eq!(records[0].user_name.as_deref(), Some("Admin Principal"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_filters_by_date_range_and_search(pool: PgPool) {
    let admin = helpers::admin(&pool).await;

    audit::log_action(
        &pool,
        admin,
        EntityType::Report,
        AuditEvent::Create,
        "r-1",
        AuditContext::described("Création du rapport Patrouille nocturne"),
    )
    .await
    .unwrap();

    let search = AuditLogFilter {
        search: Some("patrouille".to_string()),
        ..Default::default()
    };
    let (_, total) = audit::list_audit_logs(&pool, &search, &PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(total, 1);

    let future = AuditLogFilter {
        from: Some(Utc::now() + Duration::hours(1)),
        ..Default::default()
    };
    let (records, total) = audit::list_audit_logs(&pool, &future, &PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(records.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_pagination(pool: PgPool) {
    let admin = helpers::admin(&pool).await;

    for i in 0..5 {
        audit::log_action(
            &pool,
            admin,
            EntityType::Incident,
            AuditEvent::Create,
            i.to_string(),
            AuditContext::new(),
        )
        .await
        .unwrap();
    }

    let pagination = PaginationParams {
        page: Some(2),
        limit: Some(2),
    };
    let (records, total) = audit::list_audit_logs(&pool, &AuditLogFilter::default(), &pagination)
        .await
        .unwrap();

    assert_eq!(total, 5);
    assert_eq!(records.len(), 2);
    // Newest first: page 2 holds the third and second inserts
    assert_eq!(records[0].entry.entity_id, "2");
    assert_eq!(records[1].entry.entity_id, "1");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_entity_trail_and_recent_activity(pool: PgPool) {
    let admin = helpers::admin(&pool).await;
    let agent = helpers::agent(&pool).await;

    audit::log_action(&pool, admin, EntityType::Employee, AuditEvent::Create, "e-1", AuditContext::new())
        .await
        .unwrap();
    audit::log_action(&pool, agent, EntityType::Employee, AuditEvent::Create, "e-2", AuditContext::new())
        .await
        .unwrap();
    audit::log_action_detached(&pool, agent, EntityType::User, AuditEvent::Login, agent.to_string(), AuditContext::new())
        .await;

    let trail = audit::get_entity_trail(&pool, EntityType::Employee, "e-1", None)
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].entry.user_id, admin);

    let recent = audit::recent_activity(&pool, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].entry.action, "login");
    assert_eq!(recent[0].user_name.as_deref(), Some("Agent Kasongo"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_ledger_rows_require_a_known_user(pool: PgPool) {
    let result = audit::log_action(
        &pool,
        Uuid::new_v4(),
        EntityType::Detainee,
        AuditEvent::Create,
        "d-1",
        AuditContext::new(),
    )
    .await;

    assert!(result.is_err());
}
