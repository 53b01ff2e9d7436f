pub mod get;
pub mod list;

pub use get::GetSeizureQuery;
pub use list::{ListSeizuresQuery, ListSeizuresResponse, SeizureSortBy};
