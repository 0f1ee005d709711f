//! Report snapshot and its text renderings

mod model;
mod render;

pub use model::{ConfidenceReport, JobStatus};
pub use render::{ReportFormat, ReportRenderer};
