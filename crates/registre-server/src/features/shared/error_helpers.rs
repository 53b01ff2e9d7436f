//! Database error handling utilities
//!
//! Helpers for recognising constraint violations so handlers can turn them into
//! conflict errors instead of generic failures.
//!
//! # Examples
//!
//! ```rust,ignore
//! use registre_server::features::shared::error_helpers::map_unique_violation;
//!
//! .map_err(|e| {
//!     map_unique_violation(e, "employees_email_key", EmployeeError::EmailTaken(email.clone()), EmployeeError::Database)
//! })?;
//! ```

use sqlx::Error as SqlxError;

/// Check if the error is a foreign key violation
pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_foreign_key_violation();
    }
    false
}

/// Name of the unique constraint that was violated, if any
fn violated_unique_constraint(error: &SqlxError) -> Option<&str> {
    match error {
        SqlxError::Database(db_err) if db_err.is_unique_violation() => db_err.constraint(),
        _ => None,
    }
}

/// Map a unique violation on `constraint` to `on_conflict`, anything else through `default_wrapper`
pub fn map_unique_violation<E, F>(
    error: SqlxError,
    constraint: &str,
    on_conflict: E,
    default_wrapper: F,
) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if violated_unique_constraint(&error) == Some(constraint) {
        on_conflict
    } else {
        default_wrapper(error)
    }
}
