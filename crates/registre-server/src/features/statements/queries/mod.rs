pub mod get;
pub mod list;

pub use get::GetStatementQuery;
pub use list::{ListStatementsQuery, ListStatementsResponse, StatementSortBy};
