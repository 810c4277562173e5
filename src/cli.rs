//! CLI interface for the resume ATS toolkit

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Extensions accepted by commands that read resume documents
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "txt", "text", "md", "markdown", "html", "htm", "doc"];

#[derive(Parser)]
#[command(name = "resume-ats")]
#[command(version)]
#[command(about = "Resume parsing and ATS compatibility scoring")]
#[command(long_about = "Sanitize resume text, split it into structured sections, and score structured resume data against applicant tracking system heuristics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score structured resume data (JSON)
    Score {
        /// Path to resume data JSON file
        #[arg(short, long)]
        resume: PathBuf,

        /// Target industry for keyword coverage
        #[arg(short, long)]
        industry: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include per-check messages and keyword lists
        #[arg(short, long)]
        detailed: bool,
    },

    /// Extract, parse and score a resume document
    Analyze {
        /// Path to resume file (PDF, TXT, MD, HTML, DOC)
        #[arg(short = 'f', long)]
        input: PathBuf,

        /// Target industry for keyword coverage
        #[arg(short, long)]
        industry: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include per-check messages and keyword lists
        #[arg(short, long)]
        detailed: bool,
    },

    /// Parse a resume document into structured sections
    Parse {
        /// Path to resume file (PDF, TXT, MD, HTML, DOC)
        #[arg(short = 'f', long)]
        input: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the sanitized text of a resume document
    Sanitize {
        /// Path to resume file (PDF, TXT, MD, HTML, DOC)
        #[arg(short = 'f', long)]
        input: PathBuf,
    },

    /// List supported industries and their keywords
    Industries,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_command() {
        let cli = Cli::try_parse_from([
            "resume-ats", "score", "--resume", "cv.json", "--industry", "Finance", "-o", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Score { resume, industry, output, save, detailed } => {
                assert_eq!(resume, PathBuf::from("cv.json"));
                assert_eq!(industry.as_deref(), Some("Finance"));
                assert_eq!(output.as_deref(), Some("json"));
                assert!(save.is_none());
                assert!(!detailed);
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), DOCUMENT_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), DOCUMENT_EXTENSIONS).is_err());
        assert_eq!(
            validate_file_extension(Path::new("cv"), &["json"]),
            Err("File has no extension".to_string())
        );
    }
}
