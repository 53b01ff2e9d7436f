//! Incidents and their victims
//!
//! Victims are tracked as their own entity type in the ledger; deleting an
//! incident removes its victims with it.

pub mod commands;
pub mod error;
pub mod model;
pub mod queries;
pub mod routes;

pub use commands::{
    AddVictimCommand, CreateIncidentCommand, DeleteIncidentCommand, RemoveVictimCommand,
    UpdateIncidentCommand, UpdateVictimCommand,
};
pub use error::IncidentError;
pub use model::{Incident, IncidentDetail, IncidentView, Victim, VictimInput};
pub(crate) use model::INCIDENT_VIEW_SELECT;
pub use queries::{GetIncidentQuery, IncidentSortBy, ListIncidentsQuery, ListIncidentsResponse};
pub use routes::incidents_routes;
