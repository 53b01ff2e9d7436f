//! Login/logout notifications written to the ledger

pub mod commands;
pub mod routes;

pub use commands::{RecordSessionEventCommand, SessionEvent};
pub use routes::session_events_routes;
