//! Detainee record

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{Audited, EntityType};

/// Custody status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetaineeStatus {
    InCustody,
    Released,
    Transferred,
}

impl DetaineeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InCustody => "in_custody",
            Self::Released => "released",
            Self::Transferred => "transferred",
        }
    }
}

/// Detainee row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Detainee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub sex: String,
    pub place_of_birth: String,
    pub date_of_birth: NaiveDate,
    pub parent_names: Option<String>,
    pub marital_status: Option<String>,
    pub profession: Option<String>,
    pub residence: String,
    pub phone_number: Option<String>,
    pub crime_reason: String,
    pub arrest_date: NaiveDate,
    pub arrest_location: String,
    pub arrested_by: Option<String>,
    pub cell_number: Option<String>,
    pub photo_url: Option<String>,
    pub status: String,
    pub release_date: Option<NaiveDate>,
    pub release_reason: Option<String>,
    pub transfer_destination: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Detainee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Audited for Detainee {
    const ENTITY_TYPE: EntityType = EntityType::Detainee;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> String {
        self.full_name()
    }
}

/// Detainee with the display names of its author and last editor
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DetaineeView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub detainee: Detainee,
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
}

pub(crate) const DETAINEE_VIEW_SELECT: &str = r#"
    SELECT d.*, cu.name AS created_by_name, uu.name AS updated_by_name
    FROM detainees d
    LEFT JOIN users cu ON cu.id = d.created_by
    LEFT JOIN users uu ON uu.id = d.updated_by
"#;
