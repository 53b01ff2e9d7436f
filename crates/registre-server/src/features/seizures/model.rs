//! Seized item record

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{Audited, EntityType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeizureStatus {
    InCustody,
    Released,
    Disposed,
    Evidence,
}

impl SeizureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InCustody => "in_custody",
            Self::Released => "released",
            Self::Disposed => "disposed",
            Self::Evidence => "evidence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Seizure {
    pub id: Uuid,
    pub item_name: String,
    pub item_type: String,
    pub description: Option<String>,
    pub owner_name: Option<String>,
    pub owner_residence: Option<String>,
    pub seizure_location: String,
    pub seizure_date: NaiveDate,
    pub status: String,
    pub release_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audited for Seizure {
    const ENTITY_TYPE: EntityType = EntityType::Seizure;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> String {
        self.item_name.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SeizureView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub seizure: Seizure,
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
}

pub(crate) const SEIZURE_VIEW_SELECT: &str = r#"
    SELECT s.*, cu.name AS created_by_name, uu.name AS updated_by_name
    FROM seizures s
    LEFT JOIN users cu ON cu.id = s.created_by
    LEFT JOIN users uu ON uu.id = s.updated_by
"#;
