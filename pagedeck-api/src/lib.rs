//! # pagedeck-api
//!
//! REST API server over the pagedeck page operations.

mod api;
pub use api::{app, AppError, ErrorResponse};
