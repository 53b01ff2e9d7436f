pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateStatementCommand;
pub use delete::DeleteStatementCommand;
pub use update::UpdateStatementCommand;
