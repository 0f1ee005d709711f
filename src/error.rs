//! Error taxonomy for report generation
//!
//! None of these are recoverable inside a run. The first one raised stops the
//! aggregation and no report is produced.

use crate::llm::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Transport, authentication or service failure reaching the oracle
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(#[from] BackendError),

    /// The oracle answer has no `|` separating score from summary
    #[error("Malformed oracle response (missing '|' delimiter): {raw:?}")]
    MalformedResponse { raw: String },

    /// The score portion of an oracle answer is not a finite number
    #[error("Invalid score in oracle response: {raw:?}")]
    InvalidScore { raw: String },

    /// The weight table is empty or its weights do not sum to a positive value
    #[error("Weight table total is {total}; weighted score would divide by zero")]
    DivisionByZero { total: f64 },

    /// The job description is structurally unusable
    #[error("Invalid job description: {0}")]
    InvalidJob(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse job description: {0}")]
    Parse(String),
}

impl ReportError {
    /// Stable machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::OracleUnavailable(_) => "oracle_unavailable",
            ReportError::MalformedResponse { .. } => "malformed_response",
            ReportError::InvalidScore { .. } => "invalid_score",
            ReportError::DivisionByZero { .. } => "division_by_zero",
            ReportError::InvalidJob(_) => "invalid_job",
            ReportError::Io(_) => "io",
            ReportError::Parse(_) => "parse",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
