//! End-to-end report generation for a loaded job

use crate::error::Result;
use crate::evidence::Aggregator;
use crate::job::ConfidenceJob;
use crate::report::ConfidenceReport;
use crate::scoring::{score_documents, DocumentScore};
use std::time::Instant;
use tracing::info;

pub struct ReportPipeline {
    aggregator: Aggregator,
}

impl ReportPipeline {
    pub fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }

    /// Scores documents and the step tree, then snapshots the result.
    ///
    /// Document scoring runs first since it needs no oracle; a bad weight
    /// table fails the run before any request is sent.
    pub async fn run(&self, mut job: ConfidenceJob) -> Result<ConfidenceReport> {
        let start = Instant::now();
        job.validate()?;

        let documents = document_scores(&job)?;
        self.aggregator
            .evaluate_job(&mut job.root, &job.report_context)
            .await?;

        info!(
            documents = documents.len(),
            nodes = job.root.node_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Report complete"
        );

        Ok(ConfidenceReport::new(job.title, documents).with_job(job.root, job.report_context))
    }
}

/// Field-only report: weighted document scores, no oracle involved
pub fn weigh_documents(job: &ConfidenceJob) -> Result<ConfidenceReport> {
    job.validate()?;
    let documents = document_scores(job)?;
    Ok(ConfidenceReport::new(job.title.clone(), documents))
}

fn document_scores(job: &ConfidenceJob) -> Result<Vec<DocumentScore>> {
    if job.documents.is_empty() {
        return Ok(Vec::new());
    }
    score_documents(&job.documents, &job.weights)
}
