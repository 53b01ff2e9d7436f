//! Deactivate employee command
//!
//! Employees are never removed: deletion sets `is_active = false` and logs a
//! `delete` entry. An employee who is already inactive is reported as not found.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::{self, AuditContext, AuditEvent};
use crate::features::employees::{Employee, EmployeeError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEmployeeCommand {
    pub id: Uuid,
    #[serde(skip)]
    pub actor_id: Uuid,
}

impl Request<Result<Employee, EmployeeError>> for DeleteEmployeeCommand {}

impl crate::cqrs::middleware::Command for DeleteEmployeeCommand {}

#[tracing::instrument(skip(pool), fields(employee_id = %command.id))]
pub async fn handle(pool: PgPool, command: DeleteEmployeeCommand) -> Result<Employee, EmployeeError> {
    let mut tx = pool.begin().await?;

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        UPDATE employees
        SET is_active = FALSE, updated_by = $2, updated_at = NOW()
        WHERE id = $1 AND is_active
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(command.actor_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(EmployeeError::NotFound(command.id))?;

    audit::log_entity_action(
        &mut *tx,
        command.actor_id,
        &employee,
        AuditEvent::Delete,
        AuditContext::new().with("soft_delete", true),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("Employee deactivated");

    Ok(employee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::employees::commands::create::{self, tests::employee_command};
    use crate::features::shared::test_helpers::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_soft_delete(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let employee = create::handle(pool.clone(), employee_command(admin.id, "grace@registre.cd"))
            .await
            .unwrap();

        let deleted = handle(pool.clone(), DeleteEmployeeCommand { id: employee.id, actor_id: admin.id })
            .await
            .unwrap();
        assert!(!deleted.is_active);

        let still_there: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE id = $1")
            .bind(employee.id)
            .fetch_one(&pool)
            .await?;
        assert_eq!(still_there, 1);

        let trail = audit_trail(&pool, "employee", &employee.id.to_string()).await?;
        assert_eq!(trail.last().unwrap().action, "delete");
        assert_eq!(trail.last().unwrap().details.context["soft_delete"], true);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_deleting_inactive_employee_writes_nothing(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;
        let employee = create::handle(pool.clone(), employee_command(admin.id, "grace@registre.cd"))
            .await
            .unwrap();
        let first = handle(pool.clone(), DeleteEmployeeCommand { id: employee.id, actor_id: admin.id })
            .await
            .unwrap();

        let result =
            handle(pool.clone(), DeleteEmployeeCommand { id: employee.id, actor_id: admin.id }).await;

        assert!(matches!(result, Err(EmployeeError::NotFound(_))));
        let trail = audit_trail(&pool, "employee", &employee.id.to_string()).await?;
        assert_eq!(trail.iter().filter(|e| e.action == "delete").count(), 1);
        let updated_at: chrono::DateTime<chrono::Utc> =
            sqlx::query_scalar("SELECT updated_at FROM employees WHERE id = $1")
                .bind(employee.id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(updated_at, first.updated_at);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete_missing_employee(pool: PgPool) -> sqlx::Result<()> {
        let admin = TestUser::admin().insert(&pool).await?;

        let result =
            handle(pool.clone(), DeleteEmployeeCommand { id: Uuid::new_v4(), actor_id: admin.id }).await;

        assert!(matches!(result, Err(EmployeeError::NotFound(_))));
        assert_eq!(count_audit_logs(&pool).await?, 0);
        Ok(())
    }
}
