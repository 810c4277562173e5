//! resume-ats: resume parsing and ATS compatibility scoring

use clap::Parser;
use colored::Colorize;
use log::{debug, error, info};
use resume_ats::cli::{self, Cli, Commands, ConfigAction, DOCUMENT_EXTENSIONS};
use resume_ats::config::{Config, OutputFormat};
use resume_ats::input::InputManager;
use resume_ats::model::ResumeData;
use resume_ats::output::{save_report_to_file, AtsReport, ReportGenerator};
use resume_ats::processing::{parse_resume_to_structured, sanitize_content, AtsScorer, Industry};
use resume_ats::{Result, ResumeAtsError};
use std::path::{Path, PathBuf};
use std::process;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint
const SUGGESTION_THRESHOLD: f64 = 0.7;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration from {}: {}", config_path.display(), e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        match &e {
            ResumeAtsError::InsufficientContent { .. } => eprintln!("{} {}", "error:".red().bold(), e),
            _ => error!("Command failed: {}", e),
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Score { resume, industry, output, save, detailed } => {
            cli::validate_file_extension(&resume, &["json"])
                .map_err(|e| ResumeAtsError::InvalidInput(format!("Resume data file: {}", e)))?;
            let format = resolve_format(output.as_deref(), &config)?;

            info!("Scoring resume data from {}", resume.display());
            let json = tokio::fs::read_to_string(&resume).await?;
            let data = ResumeData::from_json(&json)?;

            let industry = resolve_industry(industry, &config);
            let result = AtsScorer::from_config(&config.scoring).score(&data, Some(industry.as_str()));
            let report = AtsReport::new(result, resume.display().to_string());

            emit_report(&report, &format, &config, detailed, save.as_deref())
        }

        Commands::Analyze { input, industry, output, save, detailed } => {
            cli::validate_file_extension(&input, DOCUMENT_EXTENSIONS)
                .map_err(|e| ResumeAtsError::InvalidInput(format!("Resume file: {}", e)))?;
            let format = resolve_format(output.as_deref(), &config)?;

            let mut input_manager = InputManager::from_config(&config.extraction);
            let text = input_manager.extract_resume_text(&input).await?;

            let structured = parse_resume_to_structured(&text);
            debug!("Parsed {} sections from {}", structured.sections.len(), input.display());
            let data = structured.to_resume_data();

            let industry = resolve_industry(industry, &config);
            let result = AtsScorer::from_config(&config.scoring).score(&data, Some(industry.as_str()));
            let report = AtsReport::new(result, input.display().to_string());

            emit_report(&report, &format, &config, detailed, save.as_deref())
        }

        Commands::Parse { input, output } => {
            cli::validate_file_extension(&input, DOCUMENT_EXTENSIONS)
                .map_err(|e| ResumeAtsError::InvalidInput(format!("Resume file: {}", e)))?;
            let format = resolve_format(output.as_deref(), &config)?;

            let mut input_manager = InputManager::from_config(&config.extraction);
            let text = input_manager.extract_resume_text(&input).await?;
            let structured = parse_resume_to_structured(&text);

            let generator = ReportGenerator::with_options(config.output.color_output, false, true, true);
            println!("{}", generator.generate_structure(&structured, &format)?);
            Ok(())
        }

        Commands::Sanitize { input } => {
            cli::validate_file_extension(&input, DOCUMENT_EXTENSIONS)
                .map_err(|e| ResumeAtsError::InvalidInput(format!("Resume file: {}", e)))?;

            let mut input_manager = InputManager::from_config(&config.extraction);
            let raw = input_manager.extract_text(&input).await?;
            println!("{}", sanitize_content(&raw));
            Ok(())
        }

        Commands::Industries => {
            for industry in Industry::ALL {
                let mut keywords: Vec<String> =
                    industry.keywords().iter().map(|k| k.to_string()).collect();
                if let Some(extra) = custom_keywords_for(industry, &config) {
                    keywords.extend(extra.iter().cloned());
                }
                println!("{}", industry.name().bold());
                println!("  {}", keywords.join(", "));
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeAtsError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("# {}", config_path.display());
                println!("{}", content);
                Ok(())
            }
            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset to defaults at {}", config_path.display());
                Ok(())
            }
            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
                Ok(())
            }
        },
    }
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(ResumeAtsError::InvalidInput),
        None => Ok(config.output.format),
    }
}

/// Industry label to score against, warning with the closest match when unknown
fn resolve_industry(requested: Option<String>, config: &Config) -> String {
    let label = requested.unwrap_or_else(|| config.scoring.default_industry.clone());

    if Industry::from_name(&label).is_none() {
        let hint = match Industry::closest(&label) {
            Some((closest, similarity)) if similarity >= SUGGESTION_THRESHOLD => {
                format!(" Did you mean '{}'?", closest)
            }
            _ => String::new(),
        };
        eprintln!(
            "{} Unknown industry '{}'.{} Using {} keywords.",
            "warning:".yellow().bold(),
            label,
            hint,
            Industry::Business
        );
    }

    label
}

fn custom_keywords_for<'a>(industry: Industry, config: &'a Config) -> Option<&'a Vec<String>> {
    config
        .scoring
        .custom_keywords
        .iter()
        .find(|(name, _)| Industry::from_name(name) == Some(industry))
        .map(|(_, keywords)| keywords)
}

fn emit_report(
    report: &AtsReport,
    format: &OutputFormat,
    config: &Config,
    detailed: bool,
    save: Option<&Path>,
) -> Result<()> {
    let detailed = detailed || config.output.detailed;

    match save {
        Some(path) => {
            let generator = ReportGenerator::with_options(false, detailed, true, true);
            let content = generator.generate_report(report, format)?;
            save_report_to_file(&content, path)?;
            println!("Report saved to {}", display_path(path).display());
        }
        None => {
            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
            println!("{}", generator.generate_report(report, format)?);
        }
    }

    Ok(())
}

fn display_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
