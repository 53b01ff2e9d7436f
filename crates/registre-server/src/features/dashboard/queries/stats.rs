//! Dashboard counters
//!
//! Each counter is its own statement; they run concurrently on the pool.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::dashboard::DashboardError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetDashboardStatsQuery;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub detainees_in_custody: i64,
    pub detainees_released: i64,
    pub detainees_transferred: i64,
    pub active_employees: i64,
    pub incidents: i64,
    pub victims: i64,
    pub reports: i64,
    pub statements: i64,
    pub seizures_in_custody: i64,
    pub seizures_total: i64,
    pub audit_entries_today: i64,
}

impl Request<Result<DashboardStats, DashboardError>> for GetDashboardStatsQuery {}

impl crate::cqrs::middleware::Query for GetDashboardStatsQuery {}

async fn count(pool: &PgPool, sql: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, _query: GetDashboardStatsQuery) -> Result<DashboardStats, DashboardError> {
    let (
        in_custody,
        released,
        transferred,
        employees,
        incidents,
        victims,
        reports,
        statements,
        seizures_in_custody,
        seizures_total,
        audit_today,
    ) = tokio::join!(
        count(&pool, "SELECT COUNT(*) FROM detainees WHERE status = 'in_custody'"),
        count(&pool, "SELECT COUNT(*) FROM detainees WHERE status = 'released'"),
        count(&pool, "SELECT COUNT(*) FROM detainees WHERE status = 'transferred'"),
        count(&pool, "SELECT COUNT(*) FROM employees WHERE is_active"),
        count(&pool, "SELECT COUNT(*) FROM incidents"),
        count(&pool, "SELECT COUNT(*) FROM victims"),
        count(&pool, "SELECT COUNT(*) FROM reports"),
        count(&pool, "SELECT COUNT(*) FROM statements"),
        count(&pool, "SELECT COUNT(*) FROM seizures WHERE status = 'in_custody'"),
        count(&pool, "SELECT COUNT(*) FROM seizures"),
        count(&pool, "SELECT COUNT(*) FROM audit_logs WHERE created_at >= date_trunc('day', NOW())"),
    );

    Ok(DashboardStats {
        detainees_in_custody: in_custody?,
        detainees_released: released?,
        detainees_transferred: transferred?,
        active_employees: employees?,
        incidents: incidents?,
        victims: victims?,
        reports: reports?,
        statements: statements?,
        seizures_in_custody: seizures_in_custody?,
        seizures_total: seizures_total?,
        audit_entries_today: audit_today?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_counts(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        TestDetainee::new("Jean", "Mukendi").insert(&pool, admin.id).await?;
        TestDetainee::new("Paul", "Kabeya")
            .with_status("released")
            .insert(&pool, admin.id)
            .await?;
        TestSeizure::new("Toyota Corolla").insert(&pool, admin.id).await?;
        TestIncident::new("Vol", "Goma").insert(&pool, admin.id).await?;

        let stats = handle(pool.clone(), GetDashboardStatsQuery).await.unwrap();

        assert_eq!(stats.detainees_in_custody, 1);
        assert_eq!(stats.detainees_released, 1);
        assert_eq!(stats.detainees_transferred, 0);
        assert_eq!(stats.seizures_in_custody, 1);
        assert_eq!(stats.seizures_total, 1);
        assert_eq!(stats.incidents, 1);
        assert_eq!(stats.victims, 0);
        assert_eq!(stats.audit_entries_today, 0);
        Ok(())
    }
}
