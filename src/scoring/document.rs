use super::weighted::{weighted_score, ScoredField, WeightTable};
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_errors() -> String {
    "None".to_string()
}

/// Fields extracted from one source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtraction {
    pub document_name: String,
    #[serde(default)]
    pub fields: Vec<ScoredField>,
    /// Free-text description of extraction problems
    #[serde(default = "default_errors")]
    pub errors: String,
}

/// One row of a document's field table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    pub name: String,
    pub value: String,
    pub confidence: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentScore {
    pub document_name: String,
    pub field_count: usize,
    pub weighted_score: f64,
    pub errors: String,
    pub rows: Vec<FieldRow>,
}

impl DocumentExtraction {
    pub fn validate(&self) -> Result<()> {
        if self.document_name.trim().is_empty() {
            return Err(ReportError::InvalidJob(
                "document_name must not be empty".to_string(),
            ));
        }

        if let Some(field) = self
            .fields
            .iter()
            .find(|f| !(0.0..=1.0).contains(&f.confidence))
        {
            return Err(ReportError::InvalidJob(format!(
                "field '{}' of '{}' has confidence {} outside [0, 1]",
                field.name, self.document_name, field.confidence
            )));
        }

        Ok(())
    }
}

pub fn score_document(document: &DocumentExtraction, weights: &WeightTable) -> Result<DocumentScore> {
    let weighted = weighted_score(&document.fields, weights)?;
    debug!(document = %document.document_name, score = weighted, "Document scored");

    let rows = document
        .fields
        .iter()
        .map(|field| FieldRow {
            name: field.name.clone(),
            value: field.value.clone(),
            confidence: field.confidence,
            weight: weights.weight(&field.name),
        })
        .collect();

    Ok(DocumentScore {
        document_name: document.document_name.clone(),
        field_count: document.fields.len(),
        weighted_score: weighted,
        errors: document.errors.clone(),
        rows,
    })
}

/// Scores every document in order; the first failure aborts
pub fn score_documents(
    documents: &[DocumentExtraction],
    weights: &WeightTable,
) -> Result<Vec<DocumentScore>> {
    documents
        .iter()
        .map(|doc| score_document(doc, weights))
        .collect()
}
