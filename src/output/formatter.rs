//! Output formatters for ATS reports and parsed resume structure

use crate::config::OutputFormat;
use crate::error::{Result, ResumeAtsError};
use crate::output::report::AtsReport;
use crate::processing::ats_score::{CheckResult, CheckStatus};
use crate::processing::blocks::{EducationBlock, ExperienceBlock};
use crate::processing::sections::ContactInfo;
use crate::processing::structure::{SectionContent, StructuredResume};
use colored::{Color, Colorize};
use std::path::Path;

/// Number of missing keywords listed in detailed output
const MISSING_KEYWORDS_SHOWN: usize = 8;

/// Trait for formatting reports and parsed resumes
pub trait OutputFormatter {
    fn format_report(&self, report: &AtsReport) -> Result<String>;
    fn format_structure(&self, resume: &StructuredResume) -> Result<String>;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for piping into other tools
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn category_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Comma-joined category labels, or `None` when there are none
fn category_list(checks: &[(&str, &CheckResult)]) -> Option<String> {
    if checks.is_empty() {
        return None;
    }
    let labels: Vec<String> = checks.iter().map(|(name, _)| category_label(name)).collect();
    Some(labels.join(", "))
}

fn contact_lines(contact: &ContactInfo) -> Vec<(&'static str, &str)> {
    let mut lines = Vec::new();
    if !contact.name.is_empty() {
        lines.push(("Name", contact.name.as_str()));
    }
    let optional = [
        ("Email", &contact.email),
        ("Phone", &contact.phone),
        ("Location", &contact.location),
        ("LinkedIn", &contact.linkedin),
        ("Website", &contact.website),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push((label, value.as_str()));
        }
    }
    lines
}

fn experience_heading(block: &ExperienceBlock) -> String {
    let mut heading = block.title.clone();
    if let Some(company) = &block.company {
        heading.push_str(&format!(" at {}", company));
    }
    if let Some(dates) = &block.dates {
        heading.push_str(&format!(" ({})", dates));
    }
    heading
}

fn education_heading(block: &EducationBlock) -> String {
    let mut heading = block.title.clone();
    if let Some(institution) = block.institution.as_ref().filter(|i| **i != block.title) {
        heading.push_str(&format!(", {}", institution));
    }
    if let Some(dates) = &block.dates {
        heading.push_str(&format!(" ({})", dates));
    }
    heading
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            80..=100 => ("STRONG", Color::Green),
            60..=79 => ("GOOD", Color::Yellow),
            40..=59 => ("FAIR", Color::BrightYellow),
            _ => ("LOW", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_status(&self, status: CheckStatus) -> String {
        let color = match status {
            CheckStatus::Excellent | CheckStatus::Complete => Color::Green,
            CheckStatus::Good | CheckStatus::Partial => Color::Yellow,
            CheckStatus::NeedsImprovement | CheckStatus::Incomplete => Color::Red,
        };
        // Pad before coloring so escape codes don't break alignment
        let padded = format!("{:<17}", status.as_str());
        self.colorize(&padded, color)
    }

    fn format_check(&self, name: &str, check: &CheckResult) -> String {
        let mut line = format!(
            "  {:<11} {:>3}/100  {}",
            category_label(name),
            check.score,
            self.format_status(check.status)
        );
        if self.detailed {
            line.push_str(&check.message);
        }
        line.trim_end().to_string()
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AtsReport) -> Result<String> {
        let mut output = String::new();
        let result = &report.result;

        output.push_str(&self.format_header("ATS COMPATIBILITY REPORT", 1));
        output.push_str(&format!(
            "Source: {} | Industry: {} | Generated: {}\n",
            report.metadata.source,
            report.metadata.industry,
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&self.format_header("Overall Score", 2));
        output.push_str(&format!(
            "Overall Score: {}/100 {}\n",
            result.overall_score,
            self.format_score_badge(result.overall_score)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.verdict, Color::Cyan)));
        if let Some(strengths) = category_list(&report.strengths()) {
            output.push_str(&format!("Strengths: {}\n", self.colorize(&strengths, Color::Green)));
        }
        if let Some(weak) = category_list(&report.improvement_areas()) {
            output.push_str(&format!("Focus on: {}\n", self.colorize(&weak, Color::Red)));
        }

        output.push_str(&self.format_header("Checks", 2));
        for (name, check) in result.checks.iter() {
            output.push_str(&self.format_check(name, check));
            output.push('\n');
        }

        if self.detailed {
            output.push_str(&self.format_header("Keywords", 3));
            if result.matched_keywords.is_empty() {
                output.push_str("Matched: none\n");
            } else {
                output.push_str(&format!(
                    "Matched: {}\n",
                    self.colorize(&result.matched_keywords.join(", "), Color::Green)
                ));
            }
            if !result.missing_keywords.is_empty() {
                let shown: Vec<&str> = result
                    .missing_keywords
                    .iter()
                    .take(MISSING_KEYWORDS_SHOWN)
                    .map(String::as_str)
                    .collect();
                output.push_str(&format!(
                    "Missing: {}\n",
                    self.colorize(&shown.join(", "), Color::Red)
                ));
            }
        }

        output.push_str(&self.format_header("Suggestions", 2));
        if result.suggestions.is_empty() {
            output.push_str(&self.colorize("No suggestions, nice work!\n", Color::Green));
        } else {
            for (i, suggestion) in result.suggestions.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, suggestion));
            }
        }

        Ok(output)
    }

    fn format_structure(&self, resume: &StructuredResume) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("PARSED RESUME", 1));

        for section in &resume.sections {
            output.push_str(&self.format_header(
                &format!("{} [{}]", section.title, section.id),
                2,
            ));

            match &section.content {
                SectionContent::Header(contact) => {
                    for (label, value) in contact_lines(contact) {
                        output.push_str(&format!("{:<9} {}\n", format!("{}:", label), value));
                    }
                }
                SectionContent::Paragraph(text) => {
                    output.push_str(text);
                    output.push('\n');
                }
                SectionContent::List(items) => {
                    for item in items {
                        output.push_str(&format!("  • {}\n", item));
                    }
                }
                SectionContent::ExperienceBlock(blocks) => {
                    for block in blocks {
                        output.push_str(&format!(
                            "{}\n",
                            self.colorize(&experience_heading(block), Color::Cyan)
                        ));
                        for responsibility in &block.responsibilities {
                            output.push_str(&format!("  • {}\n", responsibility));
                        }
                    }
                }
                SectionContent::EducationBlock(blocks) => {
                    for block in blocks {
                        output.push_str(&format!(
                            "{}\n",
                            self.colorize(&education_heading(block), Color::Cyan)
                        ));
                        for detail in &block.details {
                            output.push_str(&format!("  • {}\n", detail));
                        }
                    }
                }
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AtsReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_structure(&self, resume: &StructuredResume) -> Result<String> {
        self.to_json(resume)
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_status(status: CheckStatus) -> &'static str {
        match status {
            CheckStatus::Excellent | CheckStatus::Complete => "✅",
            CheckStatus::Good | CheckStatus::Partial => "🟡",
            CheckStatus::NeedsImprovement | CheckStatus::Incomplete => "❌",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AtsReport) -> Result<String> {
        let mut output = String::new();
        let result = &report.result;

        output.push_str("# ATS Compatibility Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Version:** {}\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.tool_version
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Industry:** {}\n\n",
                report.metadata.source, report.metadata.industry
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!("**Overall Score:** {}/100\n\n", result.overall_score));
        output.push_str(&format!("**Verdict:** {}\n\n", report.verdict));
        if let Some(strengths) = category_list(&report.strengths()) {
            output.push_str(&format!("**Strengths:** {}\n\n", strengths));
        }
        if let Some(weak) = category_list(&report.improvement_areas()) {
            output.push_str(&format!("**Focus on:** {}\n\n", weak));
        }

        output.push_str("## Checks\n\n");
        output.push_str("| Category | Score | Status | Notes |\n");
        output.push_str("|----------|-------|--------|-------|\n");
        for (name, check) in result.checks.iter() {
            output.push_str(&format!(
                "| {} | {} | {} {} | {} |\n",
                category_label(name),
                check.score,
                Self::markdown_status(check.status),
                check.status.as_str(),
                check.message.replace('|', "\\|")
            ));
        }
        output.push('\n');

        output.push_str("## Keywords\n\n");
        output.push_str(&format!(
            "- **Matched:** {}\n",
            if result.matched_keywords.is_empty() {
                "none".to_string()
            } else {
                result.matched_keywords.join(", ")
            }
        ));
        if !result.missing_keywords.is_empty() {
            output.push_str(&format!("- **Missing:** {}\n", result.missing_keywords.join(", ")));
        }
        output.push('\n');

        output.push_str("## Suggestions\n\n");
        if result.suggestions.is_empty() {
            output.push_str("No suggestions.\n");
        } else {
            for suggestion in &result.suggestions {
                output.push_str(&format!("- [ ] {}\n", suggestion));
            }
        }

        Ok(output)
    }

    fn format_structure(&self, resume: &StructuredResume) -> Result<String> {
        let mut output = String::from("# Parsed Resume\n");

        for section in &resume.sections {
            output.push_str(&format!("\n## {}\n\n", section.title));

            match &section.content {
                SectionContent::Header(contact) => {
                    for (label, value) in contact_lines(contact) {
                        output.push_str(&format!("- **{}:** {}\n", label, value));
                    }
                }
                SectionContent::Paragraph(text) => {
                    output.push_str(text);
                    output.push('\n');
                }
                SectionContent::List(items) => {
                    for item in items {
                        output.push_str(&format!("- {}\n", item));
                    }
                }
                SectionContent::ExperienceBlock(blocks) => {
                    for block in blocks {
                        output.push_str(&format!("### {}\n\n", experience_heading(block)));
                        for responsibility in &block.responsibilities {
                            output.push_str(&format!("- {}\n", responsibility));
                        }
                        output.push('\n');
                    }
                }
                SectionContent::EducationBlock(blocks) => {
                    for block in blocks {
                        output.push_str(&format!("### {}\n\n", education_heading(block)));
                        for detail in &block.details {
                            output.push_str(&format!("- {}\n", detail));
                        }
                        output.push('\n');
                    }
                }
            }
        }

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: &OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_report(&self, report: &AtsReport, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_structure(&self, resume: &StructuredResume, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_structure(resume)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        ResumeAtsError::OutputFormatting(format!(
            "Failed to write report to '{}': {}",
            file_path.display(),
            e
        ))
    })?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "resume".to_string());

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_ats{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResumeData;
    use crate::processing::ats_score::calculate_ats_score;
    use crate::processing::structure::parse_resume_to_structured;
    use tempfile::TempDir;

    fn sample_report() -> AtsReport {
        AtsReport::new(calculate_ats_score(&ResumeData::default(), Some("Technology")), "resume.json")
    }

    #[test]
    fn test_console_report_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_report(&sample_report()).unwrap();

        assert!(output.contains("ATS COMPATIBILITY REPORT"));
        assert!(output.contains("Overall Score: 4/100 [LOW]"));
        assert!(output.contains("Experience"));
        assert!(output.contains("No work experience added"));
        assert!(output.contains("Suggestions"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_console_summary_hides_messages() {
        let output = ConsoleFormatter::new(false, false).format_report(&sample_report()).unwrap();
        assert!(!output.contains("No work experience added"));
        assert!(!output.contains("Matched:"));
    }

    #[test]
    fn test_reports_list_strengths_and_focus_areas() {
        let data = ResumeData {
            skills: crate::model::Skills {
                technical: ["Origami", "Juggling", "Calligraphy", "Pottery"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                soft: ["Patience", "Listening", "Humor", "Tact"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            ..Default::default()
        };
        let report = AtsReport::new(calculate_ats_score(&data, Some("Technology")), "resume.json");

        let console = ConsoleFormatter::new(false, false).format_report(&report).unwrap();
        assert!(console.contains("Strengths: Skills"));
        assert!(console.contains("Focus on: Contact, Experience, Education"));

        let markdown = MarkdownFormatter::new(false).format_report(&report).unwrap();
        assert!(markdown.contains("**Strengths:** Skills"));
        assert!(markdown.contains("**Focus on:** Contact, Experience, Education"));

        let empty = ConsoleFormatter::new(false, false).format_report(&sample_report()).unwrap();
        assert!(!empty.contains("Strengths:"));
    }

    #[test]
    fn test_json_report_is_parseable() {
        let output = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["result"]["overallScore"], 4);
        assert_eq!(value["metadata"]["industry"], "Technology");
        assert_eq!(value["metadata"]["source"], "resume.json");
    }

    #[test]
    fn test_markdown_report_has_check_table() {
        let output = MarkdownFormatter::new(true).format_report(&sample_report()).unwrap();

        assert!(output.starts_with("# ATS Compatibility Report"));
        assert!(output.contains("| Category | Score | Status | Notes |"));
        assert!(output.contains("| Education | 40 | ❌ incomplete | No education added |"));
        assert!(output.contains("- [ ] "));
    }

    #[test]
    fn test_structure_rendering() {
        let resume = parse_resume_to_structured(
            "Jane Smith\njane@example.com\n\nEXPERIENCE\nSoftware Engineer at Acme\n- Built APIs\n",
        );

        let console = ConsoleFormatter::new(false, false).format_structure(&resume).unwrap();
        assert!(console.contains("Name:     Jane Smith"));
        assert!(console.contains("Software Engineer at Acme"));
        assert!(console.contains("  • Built APIs"));

        let markdown = MarkdownFormatter::new(false).format_structure(&resume).unwrap();
        assert!(markdown.contains("## Contact Information"));
        assert!(markdown.contains("### Software Engineer at Acme"));

        let json = JsonFormatter::new(true).format_structure(&resume).unwrap();
        assert!(json.contains("\"experience_block\""));
    }

    #[test]
    fn test_generator_dispatches_by_format() {
        let generator = ReportGenerator::with_options(false, false, false, false);
        let report = sample_report();

        let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
        assert!(json.starts_with('{'));
        let markdown = generator.generate_report(&report, &OutputFormat::Markdown).unwrap();
        assert!(markdown.starts_with('#'));
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("out.md");

        save_report_to_file("# Report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report");
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Json, "cv/jane.pdf", false), "jane_ats.json");
        assert_eq!(suggest_filename(&OutputFormat::Markdown, "", false), "resume_ats.md");

        let stamped = suggest_filename(&OutputFormat::Console, "jane.txt", true);
        assert!(stamped.starts_with("jane_ats_"));
        assert!(stamped.ends_with(".txt"));
    }
}
