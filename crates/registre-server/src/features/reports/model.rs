//! Field report record

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{Audited, EntityType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub location: Option<String>,
    pub report_date: NaiveDate,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audited for Report {
    const ENTITY_TYPE: EntityType = EntityType::Report;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> String {
        self.title.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub report: Report,
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
}

pub(crate) const REPORT_VIEW_SELECT: &str = r#"
    SELECT r.*, cu.name AS created_by_name, uu.name AS updated_by_name
    FROM reports r
    LEFT JOIN users cu ON cu.id = r.created_by
    LEFT JOIN users uu ON uu.id = r.updated_by
"#;
