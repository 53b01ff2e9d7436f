//! Employee records
//!
//! Employees are deactivated rather than deleted.

pub mod commands;
pub mod error;
pub mod model;
pub mod queries;
pub mod routes;

pub use commands::{CreateEmployeeCommand, DeleteEmployeeCommand, UpdateEmployeeCommand};
pub use error::EmployeeError;
pub use model::{Employee, EmployeeView};
pub(crate) use model::EMPLOYEE_VIEW_SELECT;
pub use queries::{EmployeeSortBy, GetEmployeeQuery, ListEmployeesQuery, ListEmployeesResponse};
pub use routes::employees_routes;

/// Unique constraint on `employees.email`
pub(crate) const EMPLOYEE_EMAIL_KEY: &str = "employees_email_key";
