//! Field reports

pub mod commands;
pub mod error;
pub mod model;
pub mod queries;
pub mod routes;

pub use commands::{CreateReportCommand, DeleteReportCommand, UpdateReportCommand};
pub use error::ReportError;
pub use model::{Report, ReportView};
pub(crate) use model::REPORT_VIEW_SELECT;
pub use queries::{GetReportQuery, ListReportsQuery, ListReportsResponse, ReportSortBy};
pub use routes::reports_routes;
