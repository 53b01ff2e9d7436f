pub mod get;
pub mod list;

pub use get::GetUserQuery;
pub use list::{ListUsersQuery, ListUsersResponse, UserSortBy};
