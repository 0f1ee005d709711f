use crate::error::{ReportError, Result};
use crate::oracle::Verdict;
use serde::{Deserialize, Serialize};

/// A node in the processing hierarchy: the job root, a step, or a sub-step.
///
/// `score` and `summary` are empty until the aggregator has evaluated the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceNode {
    pub name: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default, alias = "steps", alias = "sub_steps")]
    pub children: Vec<EvidenceNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl EvidenceNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: Vec::new(),
            children: Vec::new(),
            score: None,
            summary: None,
        }
    }

    pub fn leaf<I, S>(name: impl Into<String>, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            notes: notes.into_iter().map(Into::into).collect(),
            ..Self::new(name)
        }
    }

    pub fn with_child(mut self, child: EvidenceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = EvidenceNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_evaluated(&self) -> bool {
        self.score.is_some() && self.summary.is_some()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        Some(Verdict {
            score: self.score?,
            summary: self.summary.clone()?,
        })
    }

    pub(crate) fn record(&mut self, verdict: &Verdict) {
        self.score = Some(verdict.score);
        self.summary = Some(verdict.summary.clone());
    }

    /// True when this node and every descendant carry a score and summary
    pub fn is_fully_evaluated(&self) -> bool {
        self.is_evaluated() && self.children.iter().all(EvidenceNode::is_fully_evaluated)
    }

    /// Drops all scores and summaries in the subtree
    pub fn clear_verdicts(&mut self) {
        self.score = None;
        self.summary = None;
        for child in &mut self.children {
            child.clear_verdicts();
        }
    }

    /// Number of nodes in the subtree, this one included
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(EvidenceNode::node_count)
            .sum::<usize>()
    }

    /// Pre-order walk yielding `(depth, node)`
    pub fn walk(&self) -> Vec<(usize, &EvidenceNode)> {
        let mut out = Vec::with_capacity(self.node_count());
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a EvidenceNode)>) {
        out.push((depth, self));
        for child in &self.children {
            child.walk_into(depth + 1, out);
        }
    }

    /// Checks the per-node required fields; structure is taken as given
    pub fn validate(&self) -> Result<()> {
        self.validate_at("")
    }

    fn validate_at(&self, parent_path: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            let location = if parent_path.is_empty() {
                "the root".to_string()
            } else {
                format!("a child of '{}'", parent_path)
            };
            return Err(ReportError::InvalidJob(format!(
                "node name must not be empty ({})",
                location
            )));
        }

        let path = if parent_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", parent_path, self.name)
        };
        for child in &self.children {
            child.validate_at(&path)?;
        }
        Ok(())
    }
}
