pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateReportCommand;
pub use delete::DeleteReportCommand;
pub use update::UpdateReportCommand;
