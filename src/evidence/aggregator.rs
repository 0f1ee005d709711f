//! Bottom-up scoring of an evidence tree
//!
//! Every node is scored only after all of its children are, and children are
//! folded into the parent's evidence in source order. With a deterministic
//! oracle the whole run is a pure function of the tree and the context.

use super::tree::EvidenceNode;
use crate::error::Result;
use crate::oracle::{child_sentence, parse_verdict, Oracle, OracleRequest, Verdict};
use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, info};

/// Drives oracle calls over a step tree and stores verdicts on its nodes
pub struct Aggregator {
    oracle: Arc<dyn Oracle>,
    parallel_siblings: bool,
}

impl Aggregator {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            parallel_siblings: false,
        }
    }

    /// Evaluate siblings concurrently.
    ///
    /// Parents still wait for every child and prompt order is unchanged, but
    /// the oracle sees overlapping requests. Only enable this when the provider
    /// has no ordering or rate constraints.
    pub fn with_parallel_siblings(mut self, enabled: bool) -> Self {
        self.parallel_siblings = enabled;
        self
    }

    /// Scores the whole tree and returns the job-level verdict.
    ///
    /// `root` is the job; its children are the steps. `report_context` is the
    /// business framing given to the final call only. On error the tree may be
    /// partially scored and must not be reported.
    pub async fn evaluate_job(
        &self,
        root: &mut EvidenceNode,
        report_context: &str,
    ) -> Result<Verdict> {
        root.validate()?;
        info!(job = %root.name, nodes = root.node_count(), "Scoring evidence tree");

        let sentences = self.evaluate_children(&mut root.children, 1).await?;
        let request = OracleRequest::job(&sentences, &root.notes, report_context);
        let verdict = self.score(&root.name, 0, request).await?;
        root.record(&verdict);

        info!(job = %root.name, score = verdict.score, "Job scored");
        Ok(verdict)
    }

    /// Scores a single step subtree (step or sub-step template, never the job
    /// template).
    pub async fn evaluate_step(&self, node: &mut EvidenceNode) -> Result<Verdict> {
        node.validate()?;
        self.evaluate_node(node, 1).await
    }

    fn evaluate_node<'a>(
        &'a self,
        node: &'a mut EvidenceNode,
        depth: usize,
    ) -> BoxFuture<'a, Result<Verdict>> {
        async move {
            let request = if node.is_leaf() {
                OracleRequest::leaf(&node.notes)
            } else {
                let sentences = self.evaluate_children(&mut node.children, depth + 1).await?;
                OracleRequest::step(&sentences, &node.notes)
            };

            let verdict = self.score(&node.name, depth, request).await?;
            node.record(&verdict);
            Ok(verdict)
        }
        .boxed()
    }

    /// Evaluates `children` and returns their parent-facing sentences in order
    async fn evaluate_children(
        &self,
        children: &mut [EvidenceNode],
        depth: usize,
    ) -> Result<Vec<String>> {
        let verdicts = if self.parallel_siblings {
            try_join_all(
                children
                    .iter_mut()
                    .map(|child| self.evaluate_node(child, depth)),
            )
            .await?
        } else {
            let mut verdicts = Vec::with_capacity(children.len());
            for child in children.iter_mut() {
                verdicts.push(self.evaluate_node(child, depth).await?);
            }
            verdicts
        };

        Ok(verdicts
            .iter()
            .map(|v| child_sentence(&v.score.to_string(), &v.summary))
            .collect())
    }

    async fn score(&self, name: &str, depth: usize, request: OracleRequest) -> Result<Verdict> {
        debug!(
            node = %name,
            depth,
            tier = request.tier.as_str(),
            evidence_len = request.evidence.len(),
            "Requesting oracle verdict"
        );

        let raw = self
            .oracle
            .evaluate(&request.evidence, &request.instructions())
            .await?;
        let verdict = parse_verdict(&raw)?;

        info!(node = %name, depth, score = verdict.score, "Node scored");
        Ok(verdict)
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("oracle", &self.oracle.name())
            .field("parallel_siblings", &self.parallel_siblings)
            .finish()
    }
}
