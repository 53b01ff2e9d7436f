use registre_common::CommonError;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::shared::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Statement '{0}' not found")]
    NotFound(Uuid),

    #[error("Detainee '{0}' not found")]
    DetaineeNotFound(Uuid),

    #[error("Change capture failed: {0}")]
    ChangeCapture(#[from] CommonError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StatementError> for AppError {
    fn from(err: StatementError) -> Self {
        match err {
            StatementError::Validation(errors) => AppError::Validation(errors),
            StatementError::NotFound(_) => {
                AppError::NotFound("Déclaration introuvable".to_string())
            },
            StatementError::DetaineeNotFound(_) => AppError::NotFound("Détenu introuvable".to_string()),
            StatementError::ChangeCapture(e) => AppError::Internal(e.to_string()),
            StatementError::Database(e) => AppError::Database(e),
        }
    }
}
