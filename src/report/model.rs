use crate::evidence::EvidenceNode;
use crate::scoring::DocumentScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Completed => "Completed",
        }
    }
}

/// Read-only snapshot handed to the renderer.
///
/// Only ever built from a fully scored run, so `job` (when present) has a
/// score and summary at every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub report_context: String,
    pub total_documents: usize,
    /// The scored step tree; absent for field-only reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<EvidenceNode>,
    pub documents: Vec<DocumentScore>,
}

impl ConfidenceReport {
    pub fn new(title: impl Into<String>, documents: Vec<DocumentScore>) -> Self {
        Self {
            title: title.into(),
            generated_at: Utc::now(),
            status: JobStatus::Completed,
            report_context: String::new(),
            total_documents: documents.len(),
            job: None,
            documents,
        }
    }

    pub fn with_job(mut self, job: EvidenceNode, report_context: impl Into<String>) -> Self {
        self.job = Some(job);
        self.report_context = report_context.into();
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Job-level score, if the step tree was scored
    pub fn job_score(&self) -> Option<f64> {
        self.job.as_ref().and_then(|job| job.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_only_report() {
        let report = ConfidenceReport::new("Weekly", vec![]);
        assert_eq!(report.status, JobStatus::Completed);
        assert_eq!(report.total_documents, 0);
        assert!(report.job_score().is_none());

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("\"job\""));
        assert!(json.contains("\"status\":\"completed\""));
    }

    #[test]
    fn test_job_score_from_root() {
        let mut root = EvidenceNode::new("job");
        root.score = Some(0.8);
        root.summary = Some("fine".to_string());

        let report = ConfidenceReport::new("Weekly", vec![]).with_job(root, "ctx");
        assert_eq!(report.job_score(), Some(0.8));
        assert_eq!(report.report_context, "ctx");
    }
}
