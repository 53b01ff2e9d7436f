pub mod recent;
pub mod stats;

pub use recent::RecentActivityQuery;
pub use stats::{DashboardStats, GetDashboardStatsQuery};
