//! Employee record

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{Audited, EntityType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub sex: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub job_title: String,
    pub assignment: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Audited for Employee {
    const ENTITY_TYPE: EntityType = EntityType::Employee;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_label(&self) -> String {
        self.full_name()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub employee: Employee,
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
}

pub(crate) const EMPLOYEE_VIEW_SELECT: &str = r#"
    SELECT e.*, cu.name AS created_by_name, uu.name AS updated_by_name
    FROM employees e
    LEFT JOIN users cu ON cu.id = e.created_by
    LEFT JOIN users uu ON uu.id = e.updated_by
"#;
