pub mod bootstrap;
pub mod create;
pub mod delete;
pub mod password_reset;
pub mod update;

pub use create::CreateUserCommand;
pub use delete::DeleteUserCommand;
pub use password_reset::{CompletePasswordResetCommand, InitiatePasswordResetCommand};
pub use update::UpdateUserCommand;
