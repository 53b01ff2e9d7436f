pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateSeizureCommand;
pub use delete::DeleteSeizureCommand;
pub use update::UpdateSeizureCommand;
