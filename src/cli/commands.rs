use crate::llm::RecordingMode;
use crate::report::ReportFormat;
use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// LLM-assisted confidence reports for document extraction jobs
#[derive(Parser, Debug)]
#[command(
    name = "confreport",
    about = "LLM-assisted confidence reports for document extraction jobs",
    version,
    long_about = "confreport scores every step of a document/table extraction job by asking \
                  an LLM to rate the processing notes, aggregates the ratings bottom-up into \
                  step and job confidence scores with plain-language summaries, and adds \
                  weighted confidence scores for the extracted fields."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate a full confidence report for a job",
        long_about = "Scores the job's step tree with the configured LLM and renders the report.\n\n\
                      Examples:\n  \
                      confreport generate job.yaml\n  \
                      confreport generate job.yaml --format markdown -o report.md\n  \
                      confreport generate job.json --backend ollama --model llama3.1:8b"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Compute weighted field scores only (no LLM calls)",
        long_about = "Scores each document's extracted fields with the job's weight table.\n\n\
                      Examples:\n  \
                      confreport weigh job.yaml\n  \
                      confreport weigh job.yaml --format json"
    )]
    Weigh(WeighArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "JOB", help = "Job description file (YAML or JSON)")]
    pub job: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the report to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "LLM provider (overrides CONFREPORT_PROVIDER)"
    )]
    pub backend: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name (overrides CONFREPORT_MODEL)"
    )]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Per-request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Score sibling steps concurrently")]
    pub parallel: bool,

    #[arg(
        long,
        value_name = "DIR",
        help = "Record or replay LLM exchanges in this directory"
    )]
    pub record_dir: Option<PathBuf>,

    #[arg(long, value_enum, requires = "record_dir", help = "Recording mode")]
    pub recording_mode: Option<RecordingModeArg>,
}

#[derive(Parser, Debug, Clone)]
pub struct WeighArgs {
    #[arg(value_name = "JOB", help = "Job description file (YAML or JSON)")]
    pub job: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the report to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Human,
    Markdown,
    Json,
    Yaml,
}

impl From<OutputFormatArg> for ReportFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => ReportFormat::Human,
            OutputFormatArg::Markdown => ReportFormat::Markdown,
            OutputFormatArg::Json => ReportFormat::Json,
            OutputFormatArg::Yaml => ReportFormat::Yaml,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingModeArg {
    Record,
    Replay,
    Auto,
}

impl From<RecordingModeArg> for RecordingMode {
    fn from(arg: RecordingModeArg) -> Self {
        match arg {
            RecordingModeArg::Record => RecordingMode::Record,
            RecordingModeArg::Replay => RecordingMode::Replay,
            RecordingModeArg::Auto => RecordingMode::Auto,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    crate::config::parse_provider(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_generate_args() {
        let args = CliArgs::parse_from(["confreport", "generate", "job.yaml"]);
        match args.command {
            Commands::Generate(generate) => {
                assert_eq!(generate.job, PathBuf::from("job.yaml"));
                assert_eq!(generate.format, OutputFormatArg::Human);
                assert!(generate.backend.is_none());
                assert!(generate.timeout.is_none());
                assert!(!generate.parallel);
                assert!(generate.output.is_none());
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_with_options() {
        let args = CliArgs::parse_from([
            "confreport",
            "generate",
            "job.json",
            "--format",
            "markdown",
            "--backend",
            "ollama",
            "--model",
            "llama3.1:8b",
            "--timeout",
            "120",
            "--parallel",
            "--record-dir",
            "recordings",
            "--recording-mode",
            "replay",
            "-o",
            "report.md",
        ]);

        match args.command {
            Commands::Generate(generate) => {
                assert_eq!(generate.format, OutputFormatArg::Markdown);
                assert_eq!(generate.backend, Some(AdapterKind::Ollama));
                assert_eq!(generate.model.as_deref(), Some("llama3.1:8b"));
                assert_eq!(generate.timeout, Some(120));
                assert!(generate.parallel);
                assert_eq!(generate.record_dir, Some(PathBuf::from("recordings")));
                assert_eq!(generate.recording_mode, Some(RecordingModeArg::Replay));
                assert_eq!(generate.output, Some(PathBuf::from("report.md")));
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_recording_mode_requires_dir() {
        let result = CliArgs::try_parse_from([
            "confreport",
            "generate",
            "job.yaml",
            "--recording-mode",
            "replay",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_weigh_command() {
        let args = CliArgs::parse_from(["confreport", "weigh", "job.yaml", "-f", "json"]);
        match args.command {
            Commands::Weigh(weigh) => {
                assert_eq!(weigh.format, OutputFormatArg::Json);
            }
            _ => panic!("Expected Weigh command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["confreport", "-v", "weigh", "job.yaml"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["confreport", "--log-level", "debug", "weigh", "job.yaml"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));

        assert!(CliArgs::try_parse_from(["confreport", "-v", "-q", "weigh", "job.yaml"]).is_err());
    }

    #[test]
    fn test_adapter_kind_parsing() {
        assert!(parse_adapter_kind("anthropic").is_ok());
        assert!(parse_adapter_kind("ollama").is_ok());
        assert!(parse_adapter_kind("openai").is_ok());
        assert!(parse_adapter_kind("invalid").is_err());
    }
}
