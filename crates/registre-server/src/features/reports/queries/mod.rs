pub mod get;
pub mod list;

pub use get::GetReportQuery;
pub use list::{ListReportsQuery, ListReportsResponse, ReportSortBy};
