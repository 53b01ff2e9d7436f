use registre_common::CommonError;
use uuid::Uuid;

use crate::error::AppError;
use crate::features::shared::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("User '{0}' not found")]
    NotFound(Uuid),

    #[error("Email '{0}' is already in use")]
    EmailTaken(String),

    #[error("Users cannot deactivate their own account")]
    SelfDeactivation,

    #[error("Password reset token is invalid, expired or already used")]
    InvalidResetToken,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Change capture failed: {0}")]
    ChangeCapture(#[from] CommonError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(errors) => AppError::Validation(errors),
            UserError::NotFound(_) => AppError::NotFound("Utilisateur introuvable".to_string()),
            UserError::EmailTaken(_) => {
                AppError::Conflict("Cette adresse e-mail est déjà utilisée".to_string())
            },
            UserError::SelfDeactivation => AppError::BadRequest(
                "Vous ne pouvez pas désactiver votre propre compte".to_string(),
            ),
            UserError::InvalidResetToken => AppError::BadRequest(
                "Lien de réinitialisation invalide ou expiré".to_string(),
            ),
            UserError::PasswordHash(e) => AppError::Internal(e),
            UserError::ChangeCapture(e) => AppError::Internal(e.to_string()),
            UserError::Database(e) => AppError::Database(e),
        }
    }
}
