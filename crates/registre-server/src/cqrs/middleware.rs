//! CQRS markers
//!
//! Commands change state and always write an audit entry in the same
//! transaction. Queries only read and are never audited.

/// A write operation
pub trait Command {}

/// A read operation
pub trait Query {}
