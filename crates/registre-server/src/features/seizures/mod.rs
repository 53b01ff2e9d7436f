//! Seized items

pub mod commands;
pub mod error;
pub mod model;
pub mod queries;
pub mod routes;

pub use commands::{CreateSeizureCommand, DeleteSeizureCommand, UpdateSeizureCommand};
pub use error::SeizureError;
pub use model::{Seizure, SeizureStatus, SeizureView};
pub(crate) use model::SEIZURE_VIEW_SELECT;
pub use queries::{GetSeizureQuery, ListSeizuresQuery, ListSeizuresResponse, SeizureSortBy};
pub use routes::seizures_routes;
