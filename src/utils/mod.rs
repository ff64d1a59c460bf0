//! Utility module - shared helpers and types
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResponse`] - unified error and response types
//! - [`logger`] - tracing setup
//! - [`validation`] - input validation helpers
//! - [`util`] - timestamps and ID generation

pub mod error;
pub mod logger;
pub mod result;
pub mod util;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
pub use util::{current_year, now_millis, snowflake_id};
