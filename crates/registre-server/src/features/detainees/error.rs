use registre_common::CommonError;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::shared::FieldErrors;

/// Errors raised by detainee commands and queries
#[derive(Debug, thiserror::Error)]
pub enum DetaineeError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Detainee '{0}' not found")]
    NotFound(Uuid),

    #[error("Detainee '{0}' still has statements")]
    HasStatements(Uuid),

    #[error("Change capture failed: {0}")]
    ChangeCapture(#[from] CommonError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DetaineeError> for AppError {
    fn from(err: DetaineeError) -> Self {
        match err {
            DetaineeError::Validation(errors) => AppError::Validation(errors),
            DetaineeError::NotFound(_) => AppError::NotFound("Détenu introuvable".to_string()),
            DetaineeError::HasStatements(_) => AppError::Conflict(
                "Impossible de supprimer ce détenu : des déclarations y sont rattachées".to_string(),
            ),
            DetaineeError::ChangeCapture(e) => AppError::Internal(e.to_string()),
            DetaineeError::Database(e) => AppError::Database(e),
        }
    }
}
