//! Test helpers and fixtures for database tests
//!
//! # Examples
//!
//! ```rust,ignore
//! use registre_server::features::shared::test_helpers::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_something(pool: PgPool) -> sqlx::Result<()> {
//!     let admin = TestUser::admin().insert(&pool).await?;
//!     let detainee = TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;
//!
//!     // ... test logic ...
//!
//!     let trail = audit_trail(&pool, "detainee", &detainee.id.to_string()).await?;
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::AuditLogEntry;

/// Builder for creating test users
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
}

impl TestUser {
    pub fn new(name: &str, email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            is_active: true,
        }
    }

    pub fn admin() -> Self {
        Self::new("Admin Principal", "admin@registre.cd", "admin")
    }

    pub fn agent() -> Self {
        Self::new("Agent Kasongo", "agent@registre.cd", "agent")
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, is_active)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.email)
        .bind(&self.role)
        .bind(self.is_active)
        .execute(pool)
        .await?;

        Ok(self)
    }
}

/// Builder for creating test detainees
#[derive(Debug, Clone)]
pub struct TestDetainee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub residence: String,
    pub status: String,
}

impl TestDetainee {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            residence: "Goma".to_string(),
            status: "in_custody".to_string(),
        }
    }

    pub fn with_residence(mut self, residence: &str) -> Self {
        self.residence = residence.to_string();
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub async fn insert(self, pool: &PgPool, actor_id: Uuid) -> sqlx::Result<Self> {
        sqlx::query(
            r#"
            INSERT INTO detainees (
                id, first_name, last_name, sex, place_of_birth, date_of_birth,
                residence, crime_reason, arrest_date, arrest_location, status,
                created_by, updated_by
            )
            VALUES ($1, $2, $3, 'Male', 'Goma', $4, $5, 'Vol', $6, 'Goma Centre', $7, $8, $8)
            "#,
        )
        .bind(self.id)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(date(1990, 1, 1))
        .bind(&self.residence)
        .bind(date(2024, 1, 1))
        .bind(&self.status)
        .bind(actor_id)
        .execute(pool)
        .await?;

        Ok(self)
    }
}

/// Builder for creating test seizures
#[derive(Debug, Clone)]
pub struct TestSeizure {
    pub id: Uuid,
    pub item_name: String,
    pub status: String,
}

impl TestSeizure {
    pub fn new(item_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_name: item_name.to_string(),
            status: "in_custody".to_string(),
        }
    }

    pub async fn insert(self, pool: &PgPool, actor_id: Uuid) -> sqlx::Result<Self> {
        sqlx::query(
            r#"
            INSERT INTO seizures (
                id, item_name, item_type, seizure_location, seizure_date, status,
                created_by, updated_by
            )
            VALUES ($1, $2, 'vehicle', 'Goma Centre', $3, $4, $5, $5)
            "#,
        )
        .bind(self.id)
        .bind(&self.item_name)
        .bind(date(2024, 1, 2))
        .bind(&self.status)
        .bind(actor_id)
        .execute(pool)
        .await?;

        Ok(self)
    }
}

/// Builder for creating test incidents
#[derive(Debug, Clone)]
pub struct TestIncident {
    pub id: Uuid,
    pub incident_type: String,
    pub location: String,
}

impl TestIncident {
    pub fn new(incident_type: &str, location: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            incident_type: incident_type.to_string(),
            location: location.to_string(),
        }
    }

    pub async fn insert(self, pool: &PgPool, actor_id: Uuid) -> sqlx::Result<Self> {
        sqlx::query(
            r#"
            INSERT INTO incidents (id, incident_type, description, location, incident_date, created_by, updated_by)
            VALUES ($1, $2, 'Description de test', $3, NOW(), $4, $4)
            "#,
        )
        .bind(self.id)
        .bind(&self.incident_type)
        .bind(&self.location)
        .bind(actor_id)
        .execute(pool)
        .await?;

        Ok(self)
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// All ledger entries for one entity, oldest first
pub async fn audit_trail(
    pool: &PgPool,
    entity_type: &str,
    entity_id: &str,
) -> sqlx::Result<Vec<AuditLogEntry>> {
    sqlx::query_as::<_, AuditLogEntry>(
        r#"
        SELECT id, user_id, action, entity_type, entity_id, details, created_at
        FROM audit_logs
        WHERE entity_type = $1 AND entity_id = $2
        ORDER BY id
        "#,
    )
    .bind(entity_type)
    .bind(entity_id)
    .fetch_all(pool)
    .await
}

pub async fn count_audit_logs(pool: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs").fetch_one(pool).await
}

/// Make every further ledger insert fail while keeping existing rows readable
pub async fn reject_audit_inserts(pool: &PgPool) -> sqlx::Result<()> {
    sqlx::query("ALTER TABLE audit_logs ADD CONSTRAINT audit_logs_reject_all CHECK (false) NOT VALID")
        .execute(pool)
        .await?;
    Ok(())
}
