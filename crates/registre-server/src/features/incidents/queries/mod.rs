pub mod get;
pub mod list;

pub use get::GetIncidentQuery;
pub use list::{IncidentSortBy, ListIncidentsQuery, ListIncidentsResponse};
