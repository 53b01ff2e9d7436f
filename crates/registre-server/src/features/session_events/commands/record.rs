//! Session events reported by the external session provider
//!
//! These have no entity write to share a transaction with, so they go through
//! the detached writer: a ledger failure is logged and never reaches the
//! caller.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent, EntityType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    Login,
    Logout,
}

impl SessionEvent {
    fn audit_event(self) -> AuditEvent {
        match self {
            Self::Login => AuditEvent::Login,
            Self::Logout => AuditEvent::Logout,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSessionEventCommand {
    #[serde(skip)]
    pub user_id: Uuid,
    pub event: SessionEvent,
    pub user_agent: Option<String>,
}

impl Request<()> for RecordSessionEventCommand {}

impl crate::cqrs::middleware::Command for RecordSessionEventCommand {}

#[tracing::instrument(skip(pool), fields(user_id = %command.user_id))]
pub async fn handle(pool: PgPool, command: RecordSessionEventCommand) {
    let mut context = AuditContext::new();
    if let Some(user_agent) = command.user_agent.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        context = context.with("user_agent", user_agent);
    }

    audit::log_action_detached(
        &pool,
        command.user_id,
        EntityType::User,
        command.event.audit_event(),
        command.user_id.to_string(),
        context,
    )
    .await;
}
