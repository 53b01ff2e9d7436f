//! Request extractors with the application's rejection type
//!
//! Wrapping `Json`, `Query` and `Path` means a malformed body, an unknown sort
//! column or an invalid id is answered with the standard error envelope before
//! any handler logic runs.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body; deserialisation failures become `VALIDATION_ERROR`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string; unknown enum values (e.g. `sort_by`) become `VALIDATION_ERROR`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path parameters; a malformed id becomes `BAD_REQUEST`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
