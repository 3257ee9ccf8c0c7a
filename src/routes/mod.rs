//! HTTP routes for the report service

pub mod auth_routes;
pub mod health;
pub mod reports;
pub mod response;

pub use auth_routes::handle_login;
pub use health::health_check;
pub use reports::{handle_report_request, ReportEndpoint};
pub use response::{cors_preflight, error_response, json_response, not_found_response, BoxBody};
