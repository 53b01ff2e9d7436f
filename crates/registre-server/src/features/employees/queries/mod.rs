pub mod get;
pub mod list;

pub use get::GetEmployeeQuery;
pub use list::{EmployeeSortBy, ListEmployeesQuery, ListEmployeesResponse};
