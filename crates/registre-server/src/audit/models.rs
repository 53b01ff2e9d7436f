//! Audit data models

use chrono::{DateTime, Utc};
use registre_common::ChangeSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use sqlx::types::Json;
use uuid::Uuid;

// ============================================================================
// Audit Query Constants
// ============================================================================

/// Default number of entries returned by a trail or activity query
pub const DEFAULT_AUDIT_QUERY_LIMIT: i64 = 100;

/// Upper bound for a single trail or activity query
pub const MAX_AUDIT_QUERY_LIMIT: i64 = 1000;

/// Keys of `details` owned by the ledger itself
pub const RESERVED_DETAIL_KEYS: [&str; 2] = ["description", "changed"];

/// Audit action types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    StatusChange,
    PasswordResetInitiated,
    PasswordResetCompleted,
    Login,
    Logout,
    PasswordChange,
    BulkUpdate,
    Export,
    Import,
}

impl AuditAction {
    pub const ALL: [AuditAction; 12] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::StatusChange,
        Self::PasswordResetInitiated,
        Self::PasswordResetCompleted,
        Self::Login,
        Self::Logout,
        Self::PasswordChange,
        Self::BulkUpdate,
        Self::Export,
        Self::Import,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::StatusChange => "status_change",
            Self::PasswordResetInitiated => "password_reset_initiated",
            Self::PasswordResetCompleted => "password_reset_completed",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::PasswordChange => "password_change",
            Self::BulkUpdate => "bulk_update",
            Self::Export => "export",
            Self::Import => "import",
        }
    }

    /// French verb phrase used in synthesised descriptions
    pub fn verb_phrase(&self) -> &'static str {
        match self {
            Self::Create => "Création",
            Self::Update => "Modification",
            Self::Delete => "Suppression",
            Self::StatusChange => "Changement de statut",
            Self::PasswordResetInitiated => "Réinitialisation de mot de passe initiée",
            Self::PasswordResetCompleted => "Réinitialisation de mot de passe terminée",
            Self::Login => "Connexion",
            Self::Logout => "Déconnexion",
            Self::PasswordChange => "Changement de mot de passe",
            Self::BulkUpdate => "Mise à jour groupée",
            Self::Export => "Exportation",
            Self::Import => "Importation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == value)
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracked entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Employee,
    Detainee,
    Incident,
    Report,
    Statement,
    Seizure,
    Victim,
}

impl EntityType {
    pub const ALL: [EntityType; 8] = [
        Self::User,
        Self::Employee,
        Self::Detainee,
        Self::Incident,
        Self::Report,
        Self::Statement,
        Self::Seizure,
        Self::Victim,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Employee => "employee",
            Self::Detainee => "detainee",
            Self::Incident => "incident",
            Self::Report => "report",
            Self::Statement => "statement",
            Self::Seizure => "seizure",
            Self::Victim => "victim",
        }
    }

    /// Indefinite possessive phrase: "d'un détenu"
    pub fn noun_phrase(&self) -> &'static str {
        match self {
            Self::User => "d'un utilisateur",
            Self::Employee => "d'un employé",
            Self::Detainee => "d'un détenu",
            Self::Incident => "d'un incident",
            Self::Report => "d'un rapport",
            Self::Statement => "d'une déclaration",
            Self::Seizure => "d'une saisie",
            Self::Victim => "d'une victime",
        }
    }

    /// Definite phrase used when the record is named: "du détenu"
    pub fn definite_phrase(&self) -> &'static str {
        match self {
            Self::User => "de l'utilisateur",
            Self::Employee => "de l'employé",
            Self::Detainee => "du détenu",
            Self::Incident => "de l'incident",
            Self::Report => "du rapport",
            Self::Statement => "de la déclaration",
            Self::Seizure => "de la saisie",
            Self::Victim => "de la victime",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|entity| entity.as_str() == value)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `"<verb phrase> <noun phrase>"`, e.g. "Création d'un détenu"
pub fn default_description(action: AuditAction, entity_type: EntityType) -> String {
    format!("{} {}", action.verb_phrase(), entity_type.noun_phrase())
}

/// Description naming the record, e.g. "Création du détenu Jean Mukendi"
pub fn record_description(action: AuditAction, entity_type: EntityType, label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        return default_description(action, entity_type);
    }
    format!("{} {} {}", action.verb_phrase(), entity_type.definite_phrase(), label)
}

/// What happened to an entity
///
/// Only the mutating variants carry a change set, so a `create` entry can never
/// hold a `changed` map.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditEvent {
    Create,
    Update(ChangeSet),
    StatusChange(ChangeSet),
    Delete,
    PasswordResetInitiated,
    PasswordResetCompleted,
    Login,
    Logout,
    PasswordChange,
    BulkUpdate(ChangeSet),
    Export,
    Import,
}

impl AuditEvent {
    pub fn action(&self) -> AuditAction {
        match self {
            Self::Create => AuditAction::Create,
            Self::Update(_) => AuditAction::Update,
            Self::StatusChange(_) => AuditAction::StatusChange,
            Self::Delete => AuditAction::Delete,
            Self::PasswordResetInitiated => AuditAction::PasswordResetInitiated,
            Self::PasswordResetCompleted => AuditAction::PasswordResetCompleted,
            Self::Login => AuditAction::Login,
            Self::Logout => AuditAction::Logout,
            Self::PasswordChange => AuditAction::PasswordChange,
            Self::BulkUpdate(_) => AuditAction::BulkUpdate,
            Self::Export => AuditAction::Export,
            Self::Import => AuditAction::Import,
        }
    }

    /// `status_change` when `status_field` moved, `update` otherwise
    pub fn for_update(changes: ChangeSet, status_field: &str) -> Self {
        if changes.contains(status_field) {
            Self::StatusChange(changes)
        } else {
            Self::Update(changes)
        }
    }

    pub fn into_changes(self) -> Option<ChangeSet> {
        match self {
            Self::Update(changes) | Self::StatusChange(changes) | Self::BulkUpdate(changes) => {
                Some(changes)
            },
            _ => None,
        }
    }
}

/// The `details` payload of a ledger row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditDetails {
    /// Always present and non-empty
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed: Option<ChangeSet>,
    /// Extra context fields, stored next to `description`
    #[serde(flatten)]
    pub context: Map<String, JsonValue>,
}

/// Caller-supplied part of the details: optional description plus context fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditContext {
    pub(crate) description: Option<String>,
    pub(crate) fields: Map<String, JsonValue>,
}

impl AuditContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with an explicit description; blank descriptions are ignored
    pub fn described(description: impl Into<String>) -> Self {
        Self::new().description(description)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// Add a context field; reserved keys and unserialisable values are skipped
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        if RESERVED_DETAIL_KEYS.contains(&key) {
            tracing::warn!(key, "Ignoring reserved audit detail key");
            return self;
        }
        match serde_json::to_value(value) {
            Ok(value) => {
                self.fields.insert(key.to_string(), value);
            },
            Err(e) => tracing::warn!(key, error = %e, "Skipping unserialisable audit detail"),
        }
        self
    }

    pub fn has_description(&self) -> bool {
        self.description.is_some()
    }
}

/// Input for one ledger insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLog {
    pub user_id: Uuid,
    pub action: AuditAction,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub details: AuditDetails,
}

/// Audit log entry from the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: i64,
    pub user_id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: Json<AuditDetails>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn audit_action(&self) -> Option<AuditAction> {
        AuditAction::parse(&self.action)
    }

    pub fn description(&self) -> &str {
        &self.details.description
    }

    pub fn changed(&self) -> Option<&ChangeSet> {
        self.details.changed.as_ref()
    }
}

/// Ledger row joined with the acting user's display name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entry: AuditLogEntry,
    pub user_name: Option<String>,
}

/// Filters for the ledger listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogFilter {
    pub action: Option<AuditAction>,
    pub entity_type: Option<EntityType>,
    pub user_id: Option<Uuid>,
    pub entity_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}
