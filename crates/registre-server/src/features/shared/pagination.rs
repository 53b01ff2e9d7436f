//! Shared pagination utilities
//!
//! Offset pagination used by every list query, plus the sort direction and
//! search-term helpers those queries share.
//!
//! # Examples
//!
//! ```rust,ignore
//! use registre_server::features::shared::pagination::{PaginationParams, PaginationMetadata};
//!
//! let params = PaginationParams::new(Some(2), Some(20)).validated()?;
//! let offset = params.offset();
//!
//! // After fetching data...
//! let metadata = PaginationMetadata::new(params.page(), params.limit(), 100);
//! ```

use serde::{Deserialize, Serialize};

use super::validation::FieldErrors;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Page request parameters
///
/// Defaults to page 1 with 10 items. Out-of-range values are a validation
/// error rather than being clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Items per page, 1 to 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Value for the SQL OFFSET clause
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Check bounds and return the parameters unchanged
    pub fn validated(self) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.page() < 1 {
            errors.add("page", "La page doit être supérieure ou égale à 1");
        }
        if !(1..=MAX_LIMIT).contains(&self.limit()) {
            errors.add("limit", format!("La limite doit être comprise entre 1 et {}", MAX_LIMIT));
        }
        errors.into_result().map(|()| self)
    }
}

/// Pagination metadata for list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PaginationMetadata {
    /// `total_pages` is `ceil(total_items / limit)`
    pub fn new(page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if limit <= 0 {
            0
        } else {
            (total_items + limit - 1) / limit
        };

        Self {
            page,
            limit,
            total_items,
            total_pages,
        }
    }

    pub fn from_params(params: &PaginationParams, total_items: i64) -> Self {
        Self::new(params.page(), params.limit(), total_items)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Turn a free-text search into an `ILIKE` pattern
///
/// Blank input yields `None` (no filtering). `%`, `_` and `\` are escaped so
/// they match literally.
pub fn search_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    if term.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}
