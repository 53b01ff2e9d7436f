//! Statements made by detainees
//!
//! A statement always belongs to an existing detainee.

pub mod commands;
pub mod error;
pub mod model;
pub mod queries;
pub mod routes;

pub use commands::{CreateStatementCommand, DeleteStatementCommand, UpdateStatementCommand};
pub use error::StatementError;
pub use model::{Statement, StatementView};
pub(crate) use model::STATEMENT_VIEW_SELECT;
pub use queries::{GetStatementQuery, ListStatementsQuery, ListStatementsResponse, StatementSortBy};
pub use routes::statements_routes;
