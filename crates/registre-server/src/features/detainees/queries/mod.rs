pub mod get;
pub mod list;
pub mod search;

pub use get::GetDetaineeQuery;
pub use list::{DetaineeSortBy, ListDetaineesQuery, ListDetaineesResponse};
pub use search::{DetaineeOption, SearchDetaineesQuery};
