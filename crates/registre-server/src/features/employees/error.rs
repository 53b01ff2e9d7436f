use registre_common::CommonError;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::shared::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum EmployeeError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Employee '{0}' not found")]
    NotFound(Uuid),

    #[error("Email '{0}' is already used by another employee")]
    EmailTaken(String),

    #[error("Change capture failed: {0}")]
    ChangeCapture(#[from] CommonError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<EmployeeError> for AppError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::Validation(errors) => AppError::Validation(errors),
            EmployeeError::NotFound(_) => AppError::NotFound("Employé introuvable".to_string()),
            EmployeeError::EmailTaken(_) => {
                AppError::Conflict("Cette adresse e-mail est déjà utilisée par un employé".to_string())
            },
            EmployeeError::ChangeCapture(e) => AppError::Internal(e.to_string()),
            EmployeeError::Database(e) => AppError::Database(e),
        }
    }
}
