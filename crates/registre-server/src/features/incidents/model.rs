//! Incident and victim records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{Audited, EntityType};
use crate::features::shared::{FieldErrors, Sex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Incident {
    pub id: Uuid,
    pub incident_type: String,
    pub description: String,
    pub location: String,
    pub incident_date: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audited for Incident {
    const ENTITY_TYPE: EntityType = EntityType::Incident;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> String {
        format!("{} ({})", self.incident_type, self.location)
    }
}

/// A victim attached to an incident; removed with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Victim {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub name: String,
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub cause_of_death: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audited for Victim {
    const ENTITY_TYPE: EntityType = EntityType::Victim;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> String {
        self.name.clone()
    }
}

/// Victim fields as submitted, inline on incident creation or on their own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictimInput {
    pub name: String,
    pub sex: Option<Sex>,
    pub age: Option<i32>,
    pub cause_of_death: Option<String>,
}

impl VictimInput {
    /// Collect errors under `prefix` ("victims[0].name")
    pub(crate) fn check(&self, prefix: &str, errors: &mut FieldErrors) {
        errors.min_chars(&format!("{}name", prefix), &self.name, 2);
        check_age(&format!("{}age", prefix), self.age, errors);
    }
}

pub(crate) fn check_age(field: &str, age: Option<i32>, errors: &mut FieldErrors) {
    if let Some(age) = age {
        if !(0..=150).contains(&age) {
            errors.add(field, "L'âge doit être compris entre 0 et 150");
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IncidentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub incident: Incident,
    pub victim_count: i64,
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
}

/// Incident with its victims, as returned by the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentDetail {
    #[serde(flatten)]
    pub view: IncidentView,
    pub victims: Vec<Victim>,
}

pub(crate) const INCIDENT_VIEW_SELECT: &str = r#"
    SELECT i.*,
        (SELECT COUNT(*) FROM victims v WHERE v.incident_id = i.id) AS victim_count,
        cu.name AS created_by_name,
        uu.name AS updated_by_name
    FROM incidents i
    LEFT JOIN users cu ON cu.id = i.created_by
    LEFT JOIN users uu ON uu.id = i.updated_by
"#;
