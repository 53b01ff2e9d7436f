pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateEmployeeCommand;
pub use delete::DeleteEmployeeCommand;
pub use update::UpdateEmployeeCommand;
