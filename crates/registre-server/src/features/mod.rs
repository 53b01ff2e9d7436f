//! Feature modules implementing the registry API
//!
//! Each tracked entity is a vertical slice following the CQRS pattern, with
//! its own commands, queries and routes.
//!
//! # Features
//!
//! - **detainees**: people held in custody, with their release or transfer
//! - **employees**: staff records (soft delete)
//! - **incidents**: incidents and their victims
//! - **reports**: written reports
//! - **statements**: statements taken from a detainee
//! - **seizures**: seized items and their custody status
//! - **users**: accounts, roles and password resets
//! - **audit_logs**: read access to the ledger
//! - **dashboard**: counters and recent activity
//! - **session_events**: login/logout notifications
//!
//! # Architecture
//!
//! Each entity slice follows the structure:
//! - `model.rs` - Row type, view type and its `Audited` binding
//! - `error.rs` - Slice error, converted into `AppError`
//! - `commands/` - Write operations (create, update, delete), each writing its
//!   ledger entry in the same transaction
//! - `queries/` - Read operations (get, list), never audited
//! - `routes.rs` - HTTP route definitions
//!
//! Commands and queries implement the mediator pattern using the `mediator` crate.

pub mod audit_logs;
pub mod dashboard;
pub mod detainees;
pub mod employees;
pub mod incidents;
pub mod reports;
pub mod seizures;
pub mod session_events;
pub mod shared;
pub mod statements;
pub mod users;

use axum::Router;
use sqlx::PgPool;

/// Creates the `/api/v1` router with all feature routes mounted
pub fn router(pool: PgPool) -> Router<()> {
    Router::new()
        .nest("/detainees", detainees::detainees_routes())
        .nest("/employees", employees::employees_routes())
        .nest("/incidents", incidents::incidents_routes())
        .nest("/reports", reports::reports_routes())
        .nest("/statements", statements::statements_routes())
        .nest("/seizures", seizures::seizures_routes())
        .nest("/users", users::users_routes())
        .nest("/dashboard", dashboard::dashboard_routes())
        .nest("/audit-logs", audit_logs::audit_logs_routes())
        .nest("/session-events", session_events::session_events_routes())
        .with_state(pool)
}
