//! Job descriptions: the step tree, extracted documents and field weights
//!
//! A job file is YAML or JSON:
//!
//! ```yaml
//! name: invoice batch 2024-08
//! report_context: Feeds the quarterly VAT filing.
//! steps:
//!   - name: Table extraction
//!     sub_steps:
//!       - name: Header detection
//!         notes: ["Header row detected on all pages"]
//! documents:
//!   - document_name: Invoice_001.pdf
//!     fields:
//!       - { name: Invoice Number, value: INV-1001, confidence: 0.98 }
//!     errors: None
//! weights:
//!   Invoice Number: 2.0
//! ```

use crate::error::{ReportError, Result};
use crate::evidence::EvidenceNode;
use crate::scoring::{DocumentExtraction, WeightTable};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_TITLE: &str = "Document Extraction Report";
const DEFAULT_JOB_NAME: &str = "extraction job";

#[derive(Debug, Deserialize)]
struct JobFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    report_context: String,
    #[serde(default)]
    notes: Vec<String>,
    #[serde(default)]
    steps: Vec<EvidenceNode>,
    #[serde(default)]
    documents: Vec<DocumentExtraction>,
    #[serde(default)]
    weights: WeightTable,
}

/// A loaded job, with the steps hung under a single root node
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "JobFile")]
pub struct ConfidenceJob {
    pub title: String,
    pub report_context: String,
    pub root: EvidenceNode,
    pub documents: Vec<DocumentExtraction>,
    pub weights: WeightTable,
}

impl From<JobFile> for ConfidenceJob {
    fn from(file: JobFile) -> Self {
        let name = file
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_JOB_NAME.to_string());

        let mut root = EvidenceNode::new(name).with_children(file.steps);
        root.notes = file.notes;

        Self {
            title: file.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            report_context: file.report_context,
            root,
            documents: file.documents,
            weights: file.weights,
        }
    }
}

impl ConfidenceJob {
    pub fn new(root: EvidenceNode) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            report_context: String::new(),
            root,
            documents: Vec::new(),
            weights: WeightTable::new(),
        }
    }

    pub fn with_report_context(mut self, context: impl Into<String>) -> Self {
        self.report_context = context.into();
        self
    }

    pub fn with_documents(mut self, documents: Vec<DocumentExtraction>, weights: WeightTable) -> Self {
        self.documents = documents;
        self.weights = weights;
        self
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| ReportError::Parse(e.to_string()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ReportError::Parse(e.to_string()))
    }

    /// Loads a job file, JSON for `.json` and YAML otherwise
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        debug!(path = %path.display(), json = is_json, "Loading job description");

        let job = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        job.validate()?;
        Ok(job)
    }

    pub fn validate(&self) -> Result<()> {
        self.root.validate()?;
        for document in &self.documents {
            document.validate()?;
        }
        self.weights.validate()
    }
}
