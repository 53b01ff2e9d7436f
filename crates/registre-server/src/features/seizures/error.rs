use registre_common::CommonError;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::shared::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum SeizureError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Seizure '{0}' not found")]
    NotFound(Uuid),

    #[error("Change capture failed: {0}")]
    ChangeCapture(#[from] CommonError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<SeizureError> for AppError {
    fn from(err: SeizureError) -> Self {
        match err {
            SeizureError::Validation(errors) => AppError::Validation(errors),
            SeizureError::NotFound(_) => AppError::NotFound("Saisie introuvable".to_string()),
            SeizureError::ChangeCapture(e) => AppError::Internal(e.to_string()),
            SeizureError::Database(e) => AppError::Database(e),
        }
    }
}
