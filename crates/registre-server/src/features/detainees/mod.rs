//! Detainee records
//!
//! Registration, update, release/transfer (as status updates) and deletion of
//! detainees. Every mutation writes its audit entry in the same transaction.

pub mod commands;
pub mod error;
pub mod model;
pub mod queries;
pub mod routes;

pub use commands::{CreateDetaineeCommand, DeleteDetaineeCommand, UpdateDetaineeCommand};
pub use error::DetaineeError;
pub use model::{Detainee, DetaineeStatus, DetaineeView};
pub(crate) use model::DETAINEE_VIEW_SELECT;
pub use queries::{
    DetaineeOption, DetaineeSortBy, GetDetaineeQuery, ListDetaineesQuery, ListDetaineesResponse,
    SearchDetaineesQuery,
};
pub use routes::detainees_routes;
