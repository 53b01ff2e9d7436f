pub mod list;
pub mod trail;

pub use list::{ListAuditLogsQuery, ListAuditLogsResponse};
pub use trail::GetEntityTrailQuery;
