pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateDetaineeCommand;
pub use delete::DeleteDetaineeCommand;
pub use update::UpdateDetaineeCommand;
