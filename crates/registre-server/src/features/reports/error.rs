use registre_common::CommonError;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::shared::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Report '{0}' not found")]
    NotFound(Uuid),

    #[error("Change capture failed: {0}")]
    ChangeCapture(#[from] CommonError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Validation(errors) => AppError::Validation(errors),
            ReportError::NotFound(_) => AppError::NotFound("Rapport introuvable".to_string()),
            ReportError::ChangeCapture(e) => AppError::Internal(e.to_string()),
            ReportError::Database(e) => AppError::Database(e),
        }
    }
}
