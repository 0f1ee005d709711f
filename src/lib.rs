//! confreport - LLM-assisted confidence reports for document extraction jobs
//!
//! An extraction job is described as a tree of processing steps. Each leaf
//! carries free-text notes about what happened while extracting data; an LLM
//! rates those notes with a confidence score and a one-sentence summary. The
//! ratings are then rolled up bottom-up: every step is scored from its
//! children's sentences, and the job is scored from its top-level steps with
//! an extra downward bias and optional business context.
//!
//! Alongside the tree, a job may carry extracted documents. Their fields are
//! scored with a weight table (`Σ confidence·weight / Σ weights`).
//!
//! # Core Concepts
//!
//! - **Oracle**: anything that turns (evidence, instructions) into a raw
//!   `"<score> | <summary>"` response. [`LlmOracle`] backs it with an
//!   [`LLMClient`].
//! - **Evidence tree**: [`EvidenceNode`] holds notes, children and, once
//!   evaluated, a score and summary.
//! - **Aggregator**: [`Aggregator`] walks the tree in post-order and records a
//!   verdict on every node.
//!
//! # Example Usage
//!
//! ```ignore
//! use confreport::{ConfidenceJob, ReportConfig, ReportPipeline};
//! use std::path::Path;
//!
//! async fn run() -> confreport::Result<()> {
//!     let config = ReportConfig::default();
//!     let client = config.create_client().expect("client");
//!     let pipeline = ReportPipeline::new(config.create_aggregator(client));
//!
//!     let job = ConfidenceJob::from_path(Path::new("job.yaml"))?;
//!     let report = pipeline.run(job).await?;
//!     println!("{:?}", report.job_score());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod evidence;
pub mod job;
pub mod llm;
pub mod oracle;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod util;

pub use config::{ConfigError, ReportConfig};
pub use error::{ReportError, Result};
pub use evidence::{Aggregator, EvidenceNode};
pub use job::ConfidenceJob;
pub use llm::{BackendError, GenAIClient, LLMClient};
pub use oracle::{LlmOracle, Oracle, Verdict};
pub use pipeline::{weigh_documents, ReportPipeline};
pub use report::{ConfidenceReport, ReportFormat, ReportRenderer};
pub use scoring::{weighted_score, ScoredField, WeightTable};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
