//! Dashboard: headline counters and the latest ledger entries

pub mod error;
pub mod queries;
pub mod routes;

pub use error::DashboardError;
pub use queries::{DashboardStats, GetDashboardStatsQuery, RecentActivityQuery};
pub use routes::dashboard_routes;
