//! The step tree and its bottom-up aggregation

mod aggregator;
mod tree;

pub use aggregator::Aggregator;
pub use tree::EvidenceNode;
