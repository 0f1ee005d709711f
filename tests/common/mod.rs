//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use confreport::oracle::Oracle;
use confreport::Result;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Evidence and instructions of a single oracle call
#[derive(Debug, Clone, PartialEq)]
pub struct OracleCall {
    pub evidence: String,
    pub instructions: String,
}

/// Oracle whose answer depends only on its input.
///
/// The score is derived from the evidence length, so two runs over the same
/// tree produce the same answers. Evidence containing `slow:` is delayed,
/// which lets tests push a sibling to finish last.
#[derive(Default)]
pub struct DeterministicOracle {
    calls: Mutex<Vec<OracleCall>>,
}

impl DeterministicOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn answer(evidence: &str) -> String {
        let score = 0.5 + (evidence.len() % 50) as f64 / 100.0;
        let words = evidence.split_whitespace().count();
        format!("{:.2} | Reviewed {} words of evidence.", score, words)
    }
}

#[async_trait]
impl Oracle for DeterministicOracle {
    async fn evaluate(&self, evidence: &str, instructions: &str) -> Result<String> {
        if evidence.contains("slow:") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.calls.lock().unwrap().push(OracleCall {
            evidence: evidence.to_string(),
            instructions: instructions.to_string(),
        });
        Ok(Self::answer(evidence))
    }

    fn name(&self) -> &str {
        "deterministic"
    }
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
