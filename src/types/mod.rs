//! Shared types for the report service

pub mod error;

pub use error::{ReportError, Result};
