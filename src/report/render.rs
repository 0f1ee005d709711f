//! Report rendering to text formats
//!
//! The renderer only reads the snapshot it is given; scoring is finished by
//! the time anything reaches this module.

use super::model::ConfidenceReport;
use crate::evidence::EvidenceNode;
use crate::scoring::DocumentScore;
use anyhow::{Context, Result};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain text for terminals
    Human,
    Markdown,
    Json,
    Yaml,
}

pub struct ReportRenderer {
    format: ReportFormat,
}

fn score_text(score: Option<f64>) -> String {
    score
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "n/a".to_string())
}

impl ReportRenderer {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, report: &ConfidenceReport) -> Result<String> {
        match self.format {
            ReportFormat::Human => Ok(self.render_human(report)),
            ReportFormat::Markdown => Ok(self.render_markdown(report)),
            ReportFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize report to JSON"),
            ReportFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize report to YAML")
            }
        }
    }

    fn render_human(&self, report: &ConfidenceReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n{}\n\n", report.title, RULE));

        output.push_str("Job Summary:\n");
        output.push_str(&format!(
            "\u{251C}\u{2500} Date:                       {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        output.push_str(&format!(
            "\u{251C}\u{2500} Total Documents Processed:  {}\n",
            report.total_documents
        ));
        if let Some(job) = &report.job {
            output.push_str(&format!(
                "\u{251C}\u{2500} Overall Confidence:         {}\n",
                score_text(job.score)
            ));
        }
        output.push_str(&format!(
            "\u{2514}\u{2500} Job Status:                 {}\n\n",
            report.status.as_str()
        ));

        if let Some(job) = &report.job {
            if !report.report_context.trim().is_empty() {
                output.push_str(&format!("Context: {}\n\n", report.report_context.trim()));
            }
            output.push_str("Overall Assessment:\n");
            output.push_str(&format!("{}\n\n", job.summary.as_deref().unwrap_or("")));

            if !job.children.is_empty() {
                output.push_str("Processing Steps:\n");
                for child in &job.children {
                    Self::push_human_node(&mut output, child, 0);
                }
                output.push('\n');
            }
        }

        for document in &report.documents {
            Self::push_human_document(&mut output, document);
        }

        output
    }

    fn push_human_node(output: &mut String, node: &EvidenceNode, depth: usize) {
        let indent = "  ".repeat(depth + 1);
        output.push_str(&format!(
            "{}\u{2022} {} [{}]\n",
            indent,
            node.name,
            score_text(node.score)
        ));
        if let Some(summary) = node.summary.as_deref().filter(|s| !s.is_empty()) {
            output.push_str(&format!("{}  {}\n", indent, summary));
        }
        for child in &node.children {
            Self::push_human_node(output, child, depth + 1);
        }
    }

    fn push_human_document(output: &mut String, document: &DocumentScore) {
        output.push_str(&format!("Document: {}\n", document.document_name));
        output.push_str(&format!(
            "\u{251C}\u{2500} Total Fields Extracted:     {}\n",
            document.field_count
        ));
        output.push_str(&format!(
            "\u{251C}\u{2500} Weighted Confidence Score:  {:.2}\n",
            document.weighted_score
        ));
        output.push_str(&format!(
            "\u{2514}\u{2500} Errors Encountered:         {}\n",
            document.errors
        ));

        if !document.rows.is_empty() {
            let name_width = document
                .rows
                .iter()
                .map(|r| r.name.chars().count())
                .chain(std::iter::once("Field Name".len()))
                .max()
                .unwrap_or(0);
            let value_width = document
                .rows
                .iter()
                .map(|r| r.value.chars().count())
                .chain(std::iter::once("Extracted Value".len()))
                .max()
                .unwrap_or(0);

            output.push_str(&format!(
                "   {:<nw$}  {:<vw$}  {:>10}  {:>6}\n",
                "Field Name",
                "Extracted Value",
                "Confidence",
                "Weight",
                nw = name_width,
                vw = value_width
            ));
            for row in &document.rows {
                output.push_str(&format!(
                    "   {:<nw$}  {:<vw$}  {:>10.2}  {:>6}\n",
                    row.name,
                    row.value,
                    row.confidence,
                    row.weight,
                    nw = name_width,
                    vw = value_width
                ));
            }
        }
        output.push('\n');
    }

    fn render_markdown(&self, report: &ConfidenceReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", report.title));
        output.push_str("## Job Summary\n\n");
        output.push_str(&format!(
            "- **Date:** {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        output.push_str(&format!(
            "- **Total Documents Processed:** {}\n",
            report.total_documents
        ));
        output.push_str(&format!("- **Job Status:** {}\n", report.status.as_str()));
        if let Some(job) = &report.job {
            output.push_str(&format!(
                "- **Overall Confidence:** {}\n",
                score_text(job.score)
            ));
        }
        output.push('\n');

        if let Some(job) = &report.job {
            output.push_str("## Overall Assessment\n\n");
            if !report.report_context.trim().is_empty() {
                output.push_str(&format!("> {}\n\n", report.report_context.trim()));
            }
            output.push_str(&format!("{}\n\n", job.summary.as_deref().unwrap_or("")));

            if !job.children.is_empty() {
                output.push_str("## Processing Steps\n\n");
                for child in &job.children {
                    Self::push_markdown_node(&mut output, child, 0);
                }
                output.push('\n');
            }
        }

        for document in &report.documents {
            output.push_str(&format!("## Document: {}\n\n", document.document_name));
            output.push_str(&format!(
                "- **Total Fields Extracted:** {}\n",
                document.field_count
            ));
            output.push_str(&format!(
                "- **Weighted Confidence Score:** {:.2}\n",
                document.weighted_score
            ));
            output.push_str(&format!("- **Errors Encountered:** {}\n\n", document.errors));

            if !document.rows.is_empty() {
                output.push_str("| Field Name | Extracted Value | Confidence Score | Weight |\n");
                output.push_str("|---|---|---:|---:|\n");
                for row in &document.rows {
                    output.push_str(&format!(
                        "| {} | {} | {:.2} | {} |\n",
                        escape_cell(&row.name),
                        escape_cell(&row.value),
                        row.confidence,
                        row.weight
                    ));
                }
                output.push('\n');
            }
        }

        output
    }

    fn push_markdown_node(output: &mut String, node: &EvidenceNode, depth: usize) {
        let indent = "  ".repeat(depth);
        output.push_str(&format!(
            "{}- **{}** ({}){}\n",
            indent,
            node.name,
            score_text(node.score),
            node.summary
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| format!(": {}", s))
                .unwrap_or_default()
        ));
        for child in &node.children {
            Self::push_markdown_node(output, child, depth + 1);
        }
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
