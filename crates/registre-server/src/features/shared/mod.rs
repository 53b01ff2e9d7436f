//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **pagination**: page parameters, metadata, sort direction, search patterns
//! - **validation**: per-field validation with French messages
//! - **patch**: helpers for partial updates
//! - **extractors**: `Json`/`Query`/`Path` wrappers answering with the error envelope
//! - **error_helpers**: database constraint violation helpers
//! - **types**: value types used by several entities
//! - **test_helpers**: test fixtures (test-only)

pub mod error_helpers;
pub mod extractors;
pub mod pagination;
pub mod patch;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used types
pub use extractors::{AppJson, AppPath, AppQuery};
pub use pagination::{search_pattern, PaginationMetadata, PaginationParams, SortOrder};
pub use types::Sex;
pub use validation::FieldErrors;
