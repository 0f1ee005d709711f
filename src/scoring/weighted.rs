//! Weighted confidence over flat extracted fields
//!
//! The normalizer is the sum of every weight in the table, not just the
//! weights of fields that are present. A document missing a weighted field
//! therefore scores lower than the mean of what it does have.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight applied to fields the table does not mention
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// An extracted value and the extractor's confidence in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredField {
    pub name: String,
    pub value: String,
    pub confidence: f64,
}

impl ScoredField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            confidence,
        }
    }
}

/// Field name to weight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(BTreeMap<String, f64>);

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weight(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.insert(name, weight);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, weight: f64) {
        self.0.insert(name.into(), weight);
    }

    /// Weight for `name`, [`DEFAULT_WEIGHT`] when absent
    pub fn weight(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn total_weight(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, weight)| (name.as_str(), *weight))
    }

    /// Rejects negative or non-finite weights
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ReportError::InvalidJob(format!(
                    "weight for field '{}' must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// `Σ confidence·weight(name) / Σ all table weights`
///
/// Negative or non-finite weights are rejected before anything is summed.
pub fn weighted_score(fields: &[ScoredField], weights: &WeightTable) -> Result<f64> {
    weights.validate()?;

    let total_weight = weights.total_weight();
    if weights.is_empty() || !total_weight.is_finite() || total_weight <= 0.0 {
        return Err(ReportError::DivisionByZero {
            total: total_weight,
        });
    }

    let total_score: f64 = fields
        .iter()
        .map(|field| field.confidence * weights.weight(&field.name))
        .sum();

    Ok(total_score / total_weight)
}
