//! Oracle-free confidence scoring of extracted fields

mod document;
mod weighted;

pub use document::{score_document, score_documents, DocumentExtraction, DocumentScore, FieldRow};
pub use weighted::{weighted_score, ScoredField, WeightTable, DEFAULT_WEIGHT};
