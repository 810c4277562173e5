//! Report structures wrapping an ATS score with generation metadata

use crate::processing::ats_score::{AtsScoreResult, CheckResult, CheckStatus};
use crate::processing::keywords::Industry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scored resume ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    /// One-line verdict derived from the overall score
    pub verdict: String,

    /// Score, per-category checks and suggestions
    pub result: AtsScoreResult,

    /// Report metadata and generation info
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Version of the tool that produced the report
    pub tool_version: String,

    /// File or label the resume came from
    pub source: String,

    /// Industry whose keyword table was used
    pub industry: Industry,
}

impl AtsReport {
    pub fn new(result: AtsScoreResult, source: impl Into<String>) -> Self {
        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            source: source.into(),
            industry: result.industry,
        };

        Self {
            verdict: verdict_for(result.overall_score).to_string(),
            result,
            metadata,
        }
    }

    pub fn overall_score(&self) -> u8 {
        self.result.overall_score
    }

    /// Categories at the top tier of their scale
    pub fn strengths(&self) -> Vec<(&'static str, &CheckResult)> {
        self.result
            .checks
            .iter()
            .filter(|(_, check)| matches!(check.status, CheckStatus::Excellent | CheckStatus::Complete))
            .collect()
    }

    /// Categories at the lowest tier of their scale
    pub fn improvement_areas(&self) -> Vec<(&'static str, &CheckResult)> {
        self.result
            .checks
            .iter()
            .filter(|(_, check)| check.status.is_lowest_tier())
            .collect()
    }
}

pub fn verdict_for(score: u8) -> &'static str {
    match score {
        80..=100 => "Strong ATS compatibility",
        60..=79 => "Good ATS compatibility with room for improvement",
        40..=59 => "Fair ATS compatibility; several areas need work",
        _ => "Low ATS compatibility; start with the suggestions below",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResumeData;
    use crate::processing::ats_score::calculate_ats_score;

    #[test]
    fn test_report_for_empty_resume() {
        let result = calculate_ats_score(&ResumeData::default(), Some("Finance"));
        let report = AtsReport::new(result, "empty.json");

        assert_eq!(report.metadata.industry, Industry::Finance);
        assert_eq!(report.metadata.source, "empty.json");
        assert_eq!(report.verdict, verdict_for(report.overall_score()));
        assert!(report.strengths().is_empty());

        let weak: Vec<&str> = report.improvement_areas().iter().map(|(name, _)| *name).collect();
        assert!(weak.contains(&"experience"));
        assert!(weak.contains(&"contact"));
    }

    #[test]
    fn test_verdict_bands() {
        assert_eq!(verdict_for(100), "Strong ATS compatibility");
        assert!(verdict_for(65).starts_with("Good"));
        assert!(verdict_for(40).starts_with("Fair"));
        assert!(verdict_for(0).starts_with("Low"));
    }
}
