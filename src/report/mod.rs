//! Reporting core
//!
//! Each report fetches records through [`ReportStore`] and then runs an
//! explicit filter, join, group and sort pass in process:
//!
//! - **grading**: overview counts and per-teacher graded table
//! - **submissions**: reviewed submissions of one teacher
//! - **installs**: survey answers bucketed by referral source and platform

pub mod date_range;
pub mod grading;
pub mod installs;
pub mod memory;
pub mod names;
pub mod roster;
pub mod store;
pub mod submissions;

pub use date_range::DateRange;
pub use grading::{
    GenderFilter, GradingParams, GradingReport, GradingRequest, GradingSummary, TeacherRow,
};
pub use installs::{AttributionRow, InstallReport, SurveyParams};
pub use memory::MemoryStore;
pub use names::display_name;
pub use roster::{AgentRoster, ReportTables, TeacherAllowList};
pub use store::{ActivityField, ReportStore, SubmissionQuery};
pub use submissions::{SubmissionParams, SubmissionReport, SubmissionRequest, SubmissionRow};
