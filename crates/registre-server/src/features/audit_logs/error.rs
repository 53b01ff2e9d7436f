use crate::error::AppError;
use crate::features::shared::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum AuditLogError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuditLogError> for AppError {
    fn from(err: AuditLogError) -> Self {
        match err {
            AuditLogError::Validation(errors) => AppError::Validation(errors),
            AuditLogError::Database(e) => AppError::Database(e),
        }
    }
}
