use registre_common::CommonError;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::shared::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum IncidentError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Incident '{0}' not found")]
    NotFound(Uuid),

    #[error("Victim '{0}' not found")]
    VictimNotFound(Uuid),

    #[error("Change capture failed: {0}")]
    ChangeCapture(#[from] CommonError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<IncidentError> for AppError {
    fn from(err: IncidentError) -> Self {
        match err {
            IncidentError::Validation(errors) => AppError::Validation(errors),
            IncidentError::NotFound(_) => AppError::NotFound("Incident introuvable".to_string()),
            IncidentError::VictimNotFound(_) => {
                AppError::NotFound("Victime introuvable".to_string())
            },
            IncidentError::ChangeCapture(e) => AppError::Internal(e.to_string()),
            IncidentError::Database(e) => AppError::Database(e),
        }
    }
}
