//! Registre Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Pieces shared by the Registre workspace members:
//!
//! - **Logging**: `tracing` subscriber set-up driven by environment variables
//! - **Change capture**: field-level diff of two record states, as stored in the audit ledger
//! - **Errors**: the shared error type

pub mod changes;
pub mod error;
pub mod logging;

pub use changes::{
    capture_changes, capture_patch_changes, capture_record_changes, ChangeSet, FieldChange,
};
pub use error::{CommonError, Result};
