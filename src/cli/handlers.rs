//! Subcommand handlers. Each returns the process exit code.

use super::commands::{GenerateArgs, WeighArgs};
use crate::config::ReportConfig;
use crate::job::ConfidenceJob;
use crate::pipeline::{weigh_documents, ReportPipeline};
use crate::report::{ConfidenceReport, ReportFormat, ReportRenderer};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, error, info};

pub async fn handle_generate(args: &GenerateArgs) -> i32 {
    let defaults = ReportConfig::default();
    let config = ReportConfig {
        provider: args.backend.unwrap_or(defaults.provider),
        model: args.model.clone().unwrap_or_else(|| defaults.model.clone()),
        request_timeout_secs: args.timeout.unwrap_or(defaults.request_timeout_secs),
        parallel_siblings: args.parallel || defaults.parallel_siblings,
        recordings_dir: args.record_dir.clone().or_else(|| defaults.recordings_dir.clone()),
        recording_mode: args
            .recording_mode
            .map(Into::into)
            .unwrap_or(defaults.recording_mode),
        ..defaults
    };

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return 1;
    }
    debug!("{}", config);

    let job = match ConfidenceJob::from_path(&args.job) {
        Ok(job) => job,
        Err(e) => {
            error!(kind = e.kind(), "Failed to load {}: {}", args.job.display(), e);
            return 1;
        }
    };

    let client = match config.create_client() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize LLM client: {}", e);
            return 1;
        }
    };
    info!(
        provider = config.provider.as_str(),
        model = %config.model,
        "Generating confidence report"
    );

    let pipeline = ReportPipeline::new(config.create_aggregator(client));
    let report = match pipeline.run(job).await {
        Ok(report) => report,
        Err(e) => {
            error!(kind = e.kind(), "Report generation aborted: {}", e);
            return 1;
        }
    };

    match emit(&report, args.format.into(), args.output.as_deref()) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

pub fn handle_weigh(args: &WeighArgs) -> i32 {
    let report = match ConfidenceJob::from_path(&args.job).and_then(|job| weigh_documents(&job)) {
        Ok(report) => report,
        Err(e) => {
            error!(kind = e.kind(), "Failed to score {}: {}", args.job.display(), e);
            return 1;
        }
    };

    match emit(&report, args.format.into(), args.output.as_deref()) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

/// Renders `report` to `output`, or stdout when no path is given
pub fn emit(report: &ConfidenceReport, format: ReportFormat, output: Option<&Path>) -> Result<()> {
    let rendered = ReportRenderer::new(format).render(report)?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
