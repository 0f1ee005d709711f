//! Oracle response parsing
//!
//! The oracle answers in free text of the form `<score> | <summary>`. This is
//! the only place that knows about that contract.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DELIMITER: char = '|';

/// Oracle answer split on the delimiter, score still in its literal form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVerdict {
    pub score: String,
    pub summary: String,
}

/// Numeric score plus narrative, as stored on an evaluated node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub score: f64,
    pub summary: String,
}

/// Splits `raw` on the first delimiter.
///
/// The score text is returned untouched; the summary is everything after the
/// first delimiter, trimmed.
pub fn parse(raw: &str) -> Result<RawVerdict> {
    let (score, summary) =
        raw.split_once(DELIMITER)
            .ok_or_else(|| ReportError::MalformedResponse {
                raw: raw.to_string(),
            })?;

    Ok(RawVerdict {
        score: score.to_string(),
        summary: summary.trim().to_string(),
    })
}

/// Parses the trimmed score text as a finite number
pub fn parse_score(score: &str) -> Result<f64> {
    score
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ReportError::InvalidScore {
            raw: score.to_string(),
        })
}

impl RawVerdict {
    pub fn into_verdict(self) -> Result<Verdict> {
        let score = parse_score(&self.score)?;
        if !(0.0..=1.0).contains(&score) {
            warn!(score, "Oracle score outside [0, 1], keeping as reported");
        }

        Ok(Verdict {
            score,
            summary: self.summary,
        })
    }
}

/// `parse` followed by numeric conversion of the score
pub fn parse_verdict(raw: &str) -> Result<Verdict> {
    parse(raw)?.into_verdict()
}
