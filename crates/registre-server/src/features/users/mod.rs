//! User accounts
//!
//! Mutations are reserved to administrators. Users are deactivated rather
//! than deleted, and passwords only change through the reset flow.

pub mod commands;
pub mod error;
pub mod model;
pub mod password;
pub mod queries;
pub mod routes;

pub use commands::{
    CompletePasswordResetCommand, CreateUserCommand, DeleteUserCommand,
    InitiatePasswordResetCommand, UpdateUserCommand,
};
pub use error::UserError;
pub use model::{PasswordResetToken, User, UserView};
pub(crate) use model::USER_VIEW_SELECT;
pub use queries::{GetUserQuery, ListUsersQuery, ListUsersResponse, UserSortBy};
pub use routes::users_routes;

/// Unique constraint on `users.email`
pub(crate) const USER_EMAIL_KEY: &str = "users_email_key";
