//! Detainee statement record

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{Audited, EntityType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Statement {
    pub id: Uuid,
    pub detainee_id: Uuid,
    pub content: String,
    pub statement_date: NaiveDate,
    pub file_url: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audited for Statement {
    const ENTITY_TYPE: EntityType = EntityType::Statement;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> String {
        format!("du {}", self.statement_date.format("%d/%m/%Y"))
    }
}

/// Statement with the detainee's name and the authors' display names
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatementView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub statement: Statement,
    pub detainee_first_name: String,
    pub detainee_last_name: String,
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
}

pub(crate) const STATEMENT_VIEW_SELECT: &str = r#"
    SELECT s.*,
        d.first_name AS detainee_first_name,
        d.last_name AS detainee_last_name,
        cu.name AS created_by_name,
        uu.name AS updated_by_name
    FROM statements s
    JOIN detainees d ON d.id = s.detainee_id
    LEFT JOIN users cu ON cu.id = s.created_by
    LEFT JOIN users uu ON uu.id = s.updated_by
"#;
