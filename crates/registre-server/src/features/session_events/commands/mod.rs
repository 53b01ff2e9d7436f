pub mod record;

pub use record::{RecordSessionEventCommand, SessionEvent};
