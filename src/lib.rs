//! Teacher report - reporting API for the Quran learning platform
//!
//! Reads students, teachers, assignment submissions and app-install survey
//! answers from MongoDB and serves aggregated reports over authenticated
//! HTTP endpoints.
//!
//! ## Reports
//!
//! - **Grading**: graded vs ungraded submissions and per-teacher counts
//! - **Submissions**: reviewed submissions of one teacher
//! - **Installs**: app installs attributed to agents, social media and friends

pub mod auth;
pub mod config;
pub mod db;
pub mod report;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{ReportError, Result};
