pub mod create;
pub mod delete;
pub mod update;
pub mod victims;

pub use create::CreateIncidentCommand;
pub use delete::DeleteIncidentCommand;
pub use update::UpdateIncidentCommand;
pub use victims::{AddVictimCommand, RemoveVictimCommand, UpdateVictimCommand};
