//! Scoring instructions and evidence text for each tier of the step tree

use std::fmt::Write as _;

/// Evidence substituted when a node has nothing to report
pub const NO_ISSUES: &str = "No issues";

/// Which instruction template a node is scored with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// A sub-step scored from its own processing notes
    Leaf,
    /// A step scored from its sub-steps' verdicts
    Step,
    /// The whole job, scored from its steps' verdicts plus business context
    Job,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Leaf => "leaf",
            Tier::Step => "step",
            Tier::Job => "job",
        }
    }
}

/// One "score this evidence" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    pub tier: Tier,
    pub evidence: String,
    /// Business or regulatory framing, only used for the job tier
    pub context: Option<String>,
}

const RESPONSE_FORMAT: &str = "Respond with the confidence score as a plain decimal number, \
then a single '|' character, then the summary. Do not use the '|' character anywhere else \
and do not add any other text.";

const LEAF_INSTRUCTIONS: &str = "You are reviewing one sub-step of a document and table \
extraction pipeline. The processing notes recorded for this sub-step are given below. Rate how \
reliable the output of this sub-step is with a confidence score between 0 and 1, where 1 means \
fully reliable. If the notes state that there were no issues, treat that as positive evidence \
of a reliable result rather than as missing information. Then write a short narrative summary \
of what the notes say about the sub-step.";

const STEP_INSTRUCTIONS: &str = "You are reviewing one processing step of a document and table \
extraction pipeline. The text below lists the confidence score and summary of each sub \
processing step of this step. Produce a weighted aggregate confidence score between 0 and 1 for \
the whole step, weighting the sub-steps according to how much they matter for the reliability \
of the step's output. Then write a summary of the step that a non-technical reader can follow. \
Do not mention the intended audience and do not comment on how the summary was written.";

const JOB_INSTRUCTIONS: &str = "You are writing the overall assessment of a document and table \
extraction job. The text below lists the confidence score and summary of each processing step \
of the job. Produce a weighted aggregate confidence score between 0 and 1 for the whole job. If \
any of the evidence mentions data quality issues that were not corrected, bias the aggregate \
score downward. Then write a summary of the job's reliability that a non-technical reader can \
follow. Do not mention the intended audience and do not comment on how the summary was written.";

impl OracleRequest {
    pub fn leaf(notes: &[String]) -> Self {
        Self {
            tier: Tier::Leaf,
            evidence: notes_evidence(notes),
            context: None,
        }
    }

    pub fn step(child_sentences: &[String], own_notes: &[String]) -> Self {
        Self {
            tier: Tier::Step,
            evidence: aggregate_evidence(child_sentences, own_notes),
            context: None,
        }
    }

    pub fn job(step_sentences: &[String], own_notes: &[String], context: &str) -> Self {
        let context = context.trim();
        Self {
            tier: Tier::Job,
            evidence: aggregate_evidence(step_sentences, own_notes),
            context: (!context.is_empty()).then(|| context.to_string()),
        }
    }

    /// Full instruction text sent alongside the evidence
    pub fn instructions(&self) -> String {
        let mut text = match self.tier {
            Tier::Leaf => LEAF_INSTRUCTIONS,
            Tier::Step => STEP_INSTRUCTIONS,
            Tier::Job => JOB_INSTRUCTIONS,
        }
        .to_string();

        if let Some(context) = &self.context {
            let _ = write!(text, "\n\nBusiness context for this report: {}", context);
        }

        text.push_str("\n\n");
        text.push_str(RESPONSE_FORMAT);
        text
    }
}

/// Notes joined by single spaces, or [`NO_ISSUES`] when there are none.
///
/// Notes are trimmed and blank ones dropped, so a list of blank notes counts
/// as empty.
pub fn notes_evidence(notes: &[String]) -> String {
    let joined = notes
        .iter()
        .map(|note| note.trim())
        .filter(|note| !note.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        NO_ISSUES.to_string()
    } else {
        joined
    }
}

/// The sentence a scored child contributes to its parent's evidence
pub fn child_sentence(score_text: &str, summary: &str) -> String {
    format!(
        "The confidence score is {} for this sub processing step: {}.",
        score_text,
        summary.strip_suffix('.').unwrap_or(summary)
    )
}

fn aggregate_evidence(sentences: &[String], own_notes: &[String]) -> String {
    let mut parts: Vec<String> = sentences.to_vec();

    let notes = notes_evidence(own_notes);
    if notes != NO_ISSUES {
        parts.push(format!(
            "Additional notes for this processing step: {}.",
            notes.strip_suffix('.').unwrap_or(&notes)
        ));
    }

    if parts.is_empty() {
        NO_ISSUES.to_string()
    } else {
        parts.join(" ")
    }
}
