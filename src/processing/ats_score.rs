//! Rule-based ATS (Applicant Tracking System) score over structured resume data

use crate::config::{ScoreWeights, ScoringConfig};
use crate::model::{ExperienceEntry, ResumeData};
use crate::processing::keywords::{
    count_metrics, has_action_verb, has_bullet, has_metric, Industry, KeywordSet,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of missing keywords quoted in the keyword suggestion
const SUGGESTED_KEYWORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStatus {
    Excellent,
    Good,
    NeedsImprovement,
    Complete,
    Partial,
    Incomplete,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Excellent => "excellent",
            CheckStatus::Good => "good",
            CheckStatus::NeedsImprovement => "needs-improvement",
            CheckStatus::Complete => "complete",
            CheckStatus::Partial => "partial",
            CheckStatus::Incomplete => "incomplete",
        }
    }

    /// The worst status a category can report
    pub fn is_lowest_tier(&self) -> bool {
        matches!(self, CheckStatus::NeedsImprovement | CheckStatus::Incomplete)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub score: u8,
    pub status: CheckStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsChecks {
    pub contact: CheckResult,
    pub experience: CheckResult,
    pub skills: CheckResult,
    pub education: CheckResult,
    pub keywords: CheckResult,
    pub metrics: CheckResult,
}

impl AtsChecks {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CheckResult)> {
        [
            ("contact", &self.contact),
            ("experience", &self.experience),
            ("skills", &self.skills),
            ("education", &self.education),
            ("keywords", &self.keywords),
            ("metrics", &self.metrics),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreResult {
    pub overall_score: u8,
    pub checks: AtsChecks,
    pub suggestions: Vec<String>,
    pub industry: Industry,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

/// Excellent/good thresholds for the tiered categories
#[derive(Debug, Clone, Copy)]
struct Tiers {
    excellent: u8,
    good: u8,
}

const EXPERIENCE_TIERS: Tiers = Tiers { excellent: 80, good: 60 };
const SKILLS_TIERS: Tiers = Tiers { excellent: 80, good: 60 };
const KEYWORD_TIERS: Tiers = Tiers { excellent: 50, good: 20 };
const METRIC_TIERS: Tiers = Tiers { excellent: 60, good: 30 };
const CONTACT_COMPLETE: u8 = 80;
const CONTACT_PARTIAL: u8 = 50;

fn tiered(score: u8, tiers: Tiers) -> CheckStatus {
    if score >= tiers.excellent {
        CheckStatus::Excellent
    } else if score >= tiers.good {
        CheckStatus::Good
    } else {
        CheckStatus::NeedsImprovement
    }
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Scores resumes against one set of weights and keyword tables
#[derive(Debug, Clone, Default)]
pub struct AtsScorer {
    weights: ScoreWeights,
    custom_keywords: HashMap<Industry, Vec<String>>,
}

impl AtsScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Append extra terms to an industry's keyword table
    pub fn with_custom_keywords(mut self, industry: Industry, keywords: Vec<String>) -> Self {
        self.custom_keywords.entry(industry).or_default().extend(keywords);
        self
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        let mut scorer = Self::new().with_weights(config.weights);
        for (name, keywords) in &config.custom_keywords {
            match Industry::from_name(name) {
                Some(industry) => scorer = scorer.with_custom_keywords(industry, keywords.clone()),
                None => log::warn!("Ignoring custom keywords for unknown industry '{}'", name),
            }
        }
        scorer
    }

    /// Compute the composite score and per-category breakdown.
    ///
    /// Total over any resume: missing data lowers sub-scores instead of
    /// failing. Unknown or missing industries use the Business table.
    pub fn score(&self, data: &ResumeData, industry: Option<&str>) -> AtsScoreResult {
        let industry = Industry::resolve(industry);

        let contact = self.check_contact(data);
        let experience = self.check_experience(&data.experience);
        let skills = self.check_skills(data);
        let education = self.check_education(data);
        let (keywords, matched_keywords, missing_keywords) = self.check_keywords(data, industry);
        let metrics = self.check_metrics(&data.experience);

        let w = &self.weights;
        let weighted = f64::from(contact.score) * w.contact
            + f64::from(experience.score) * w.experience
            + f64::from(skills.score) * w.skills
            + f64::from(education.score) * w.education
            + f64::from(keywords.score) * w.keywords
            + f64::from(metrics.score) * w.metrics;
        let overall_score = to_score(weighted);

        debug!(
            "ATS breakdown ({}): contact={} experience={} skills={} education={} keywords={} metrics={} -> {}",
            industry,
            contact.score,
            experience.score,
            skills.score,
            education.score,
            keywords.score,
            metrics.score,
            overall_score
        );

        let checks = AtsChecks {
            contact,
            experience,
            skills,
            education,
            keywords,
            metrics,
        };
        let suggestions = build_suggestions(&checks, data, industry, &missing_keywords);

        AtsScoreResult {
            overall_score,
            checks,
            suggestions,
            industry,
            matched_keywords,
            missing_keywords,
        }
    }

    fn check_contact(&self, data: &ResumeData) -> CheckResult {
        let info = &data.personal_info;
        let filled = |value: &str| !value.trim().is_empty();

        let mut score: u32 = 0;
        if filled(&info.full_name) {
            score += 25;
        }
        if info.email.contains('@') {
            score += 25;
        }
        if filled(&info.phone) {
            score += 20;
        }
        if filled(&info.location) {
            score += 15;
        }
        if filled(&info.linkedin) {
            score += 10;
        }
        if filled(&info.website) {
            score += 5;
        }
        let score = score.min(100) as u8;

        let (status, message) = if score >= CONTACT_COMPLETE {
            (CheckStatus::Complete, "Contact information is complete")
        } else if score >= CONTACT_PARTIAL {
            (CheckStatus::Partial, "Some contact details are missing")
        } else {
            (CheckStatus::Incomplete, "Key contact information is missing")
        };

        CheckResult { score, status, message: message.to_string() }
    }

    fn check_experience(&self, entries: &[ExperienceEntry]) -> CheckResult {
        if entries.is_empty() {
            return CheckResult {
                score: 0,
                status: CheckStatus::NeedsImprovement,
                message: "No work experience added".to_string(),
            };
        }

        let total: u32 = entries.iter().map(experience_entry_score).sum();
        let score = to_score(f64::from(total) / entries.len() as f64);
        let status = tiered(score, EXPERIENCE_TIERS);
        let message = match status {
            CheckStatus::Excellent => "Experience entries are detailed and achievement-focused",
            CheckStatus::Good => "Experience is solid but could show more impact",
            _ => "Experience descriptions need more detail, action verbs and measurable results",
        };

        CheckResult { score, status, message: message.to_string() }
    }

    fn check_skills(&self, data: &ResumeData) -> CheckResult {
        let count = data.skills.iter().filter(|s| !s.trim().is_empty()).count();
        let score = match count {
            n if n >= 8 => 100,
            n if n >= 5 => 80,
            n if n >= 3 => 60,
            n if n >= 1 => 40,
            _ => 0,
        };

        CheckResult {
            score,
            status: tiered(score, SKILLS_TIERS),
            message: format!("{} skill{} listed", count, if count == 1 { "" } else { "s" }),
        }
    }

    fn check_education(&self, data: &ResumeData) -> CheckResult {
        let (score, status, message) = if data.education.iter().any(|e| e.is_complete()) {
            (100, CheckStatus::Complete, "Education details are complete")
        } else if !data.education.is_empty() {
            (60, CheckStatus::Partial, "Some education details are missing")
        } else {
            (40, CheckStatus::Incomplete, "No education added")
        };

        CheckResult { score, status, message: message.to_string() }
    }

    fn check_keywords(
        &self,
        data: &ResumeData,
        industry: Industry,
    ) -> (CheckResult, Vec<String>, Vec<String>) {
        let extra = self.custom_keywords.get(&industry).map(Vec::as_slice).unwrap_or(&[]);
        let set = KeywordSet::for_industry(industry, extra);

        let corpus: Vec<&str> = data
            .experience
            .iter()
            .map(|e| e.description.as_str())
            .chain(data.skills.iter().map(String::as_str))
            .collect();
        let corpus = corpus.join("\n");

        let found = set.found_in(&corpus);
        let matched: Vec<String> = found.iter().map(|i| set.keywords()[*i].clone()).collect();
        let missing: Vec<String> = set
            .keywords()
            .iter()
            .enumerate()
            .filter(|(i, _)| !found.contains(i))
            .map(|(_, k)| k.clone())
            .collect();

        let score = if set.is_empty() {
            0
        } else {
            to_score(matched.len() as f64 / set.len() as f64 * 100.0 * 1.2)
        };

        let result = CheckResult {
            score,
            status: tiered(score, KEYWORD_TIERS),
            message: format!("{} of {} {} keywords found", matched.len(), set.len(), industry),
        };
        (result, matched, missing)
    }

    fn check_metrics(&self, entries: &[ExperienceEntry]) -> CheckResult {
        let total: usize = entries.iter().map(|e| count_metrics(&e.description)).sum();
        let score = if entries.is_empty() {
            0
        } else {
            to_score(total as f64 / entries.len() as f64 * 30.0)
        };

        CheckResult {
            score,
            status: tiered(score, METRIC_TIERS),
            message: format!(
                "{} quantifiable metric{} across {} role{}",
                total,
                if total == 1 { "" } else { "s" },
                entries.len(),
                if entries.len() == 1 { "" } else { "s" }
            ),
        }
    }
}

/// Per-entry experience score: completeness, action verbs, bullets, metrics
fn experience_entry_score(entry: &ExperienceEntry) -> u32 {
    let mut score = 0;
    if entry.has_required_fields() {
        score += 40;
    }
    if has_action_verb(&entry.description) {
        score += 20;
    }
    if has_bullet(&entry.description) {
        score += 20;
    }
    if has_metric(&entry.description) {
        score += 20;
    }
    score
}

fn build_suggestions(
    checks: &AtsChecks,
    data: &ResumeData,
    industry: Industry,
    missing_keywords: &[String],
) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::new();
    let mut push = |s: String| {
        if !suggestions.contains(&s) {
            suggestions.push(s);
        }
    };

    if checks.contact.score < CONTACT_COMPLETE {
        push("Complete your contact information with your full name, a professional email, phone number and location".to_string());
    }

    if checks.experience.score < EXPERIENCE_TIERS.good {
        if data.experience.is_empty() {
            push("Add your work experience with company, position, dates and a description of your impact".to_string());
        } else {
            if data.experience.iter().any(|e| !e.has_required_fields()) {
                push("Fill in company, position, start date and description for every experience entry".to_string());
            }
            push("Start experience bullet points with strong action verbs such as led, developed or improved".to_string());
        }
    }

    if checks.skills.score < SKILLS_TIERS.good {
        push("Add more relevant skills; aim for at least 8 technical and soft skills".to_string());
    }

    if checks.education.status != CheckStatus::Complete {
        if data.education.is_empty() {
            push("Add your education background".to_string());
        } else {
            push("Complete your education details including school, degree, field of study and dates".to_string());
        }
    }

    if checks.keywords.score < KEYWORD_TIERS.good {
        let examples: Vec<&str> = missing_keywords
            .iter()
            .take(SUGGESTED_KEYWORDS)
            .map(String::as_str)
            .collect();
        if examples.is_empty() {
            push(format!("Include more {} industry keywords", industry));
        } else {
            push(format!(
                "Include more {} industry keywords such as: {}",
                industry,
                examples.join(", ")
            ));
        }
    }

    if checks.metrics.score < METRIC_TIERS.good {
        push("Quantify your achievements with numbers, percentages or dollar amounts".to_string());
    }

    suggestions
}

/// Score with the fixed default weights and keyword tables
pub fn calculate_ats_score(data: &ResumeData, industry: Option<&str>) -> AtsScoreResult {
    AtsScorer::new().score(data, industry)
}
