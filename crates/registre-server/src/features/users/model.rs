//! User accounts (acting principals)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{Audited, EntityType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Never serialised, so it never reaches a response or an audit diff
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audited for User {
    const ENTITY_TYPE: EntityType = EntityType::User;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
}

pub(crate) const USER_VIEW_SELECT: &str = r#"
    SELECT u.*, cu.name AS created_by_name, uu.name AS updated_by_name
    FROM users u
    LEFT JOIN users cu ON cu.id = u.created_by
    LEFT JOIN users uu ON uu.id = u.updated_by
"#;

/// Raw reset token handed back once at initiation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetToken {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
