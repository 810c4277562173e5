//! Read-only keyword, verb and pattern tables used by the scorer and parser

use aho_corasick::{AhoCorasick, MatchKind};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use strsim::jaro_winkler;

/// Target industries with a dedicated keyword table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    Technology,
    Healthcare,
    Finance,
    Creative,
    Business,
    Research,
}

impl Industry {
    pub const ALL: [Industry; 6] = [
        Industry::Technology,
        Industry::Healthcare,
        Industry::Finance,
        Industry::Creative,
        Industry::Business,
        Industry::Research,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Healthcare => "Healthcare",
            Industry::Finance => "Finance",
            Industry::Creative => "Creative",
            Industry::Business => "Business",
            Industry::Research => "Research",
        }
    }

    /// Case-insensitive lookup by label
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|industry| industry.name().eq_ignore_ascii_case(wanted))
    }

    /// Resolve a label, falling back to Business for unknown or missing labels
    pub fn resolve(name: Option<&str>) -> Self {
        match name.filter(|n| !n.trim().is_empty()) {
            Some(label) => Self::from_name(label).unwrap_or_else(|| {
                warn!("Unknown industry '{}', using Business keywords", label);
                Industry::Business
            }),
            None => Industry::Business,
        }
    }

    /// Closest known industry name, used for "did you mean" hints
    pub fn closest(name: &str) -> Option<(Self, f64)> {
        let lowered = name.trim().to_lowercase();
        Self::ALL
            .iter()
            .map(|industry| (*industry, jaro_winkler(&lowered, &industry.name().to_lowercase())))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Industry::Technology => &[
                "javascript", "python", "react", "node.js", "sql", "aws", "docker",
                "kubernetes", "api", "git", "agile", "cloud", "typescript", "ci/cd",
                "microservices",
            ],
            Industry::Healthcare => &[
                "patient care", "clinical", "medical", "hipaa", "emr", "nursing",
                "diagnosis", "treatment", "pharmaceutical", "compliance", "healthcare",
                "quality assurance",
            ],
            Industry::Finance => &[
                "financial analysis", "excel", "accounting", "budget", "forecasting",
                "risk management", "investment", "portfolio", "audit", "gaap",
                "financial modeling", "compliance",
            ],
            Industry::Creative => &[
                "adobe", "photoshop", "illustrator", "figma", "branding", "ui/ux",
                "typography", "visual design", "content creation", "sketch", "design",
                "storytelling",
            ],
            Industry::Business => &[
                "strategy", "management", "leadership", "project management",
                "stakeholder", "analytics", "kpi", "roi", "business development",
                "operations", "process improvement", "budget",
            ],
            Industry::Research => &[
                "research", "analysis", "methodology", "statistics", "publication",
                "laboratory", "experiment", "hypothesis", "peer review", "grant",
                "data collection", "literature review",
            ],
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Verbs that mark an accomplishment-oriented description
pub const ACTION_VERBS: &[&str] = &[
    "led", "managed", "developed", "created", "implemented", "designed", "improved",
    "increased", "decreased", "reduced", "achieved", "delivered", "launched", "built",
    "optimized", "streamlined", "coordinated", "established", "generated", "spearheaded",
    "mentored", "negotiated", "automated", "architected",
];

/// Characters that indicate a bulleted description
pub const BULLET_MARKERS: &[char] = &['•', '-', '*'];

/// Percentage, dollar amount, bare number with optional k/m suffix, "Nx", "N:N"
pub static METRIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+(?:\.\d+)?\s?%",
        r"\$\s?\d[\d,]*(?:\.\d+)?\s?[kKmMbB]?",
        r"\b\d+(?:\.\d+)?[kKmM]?\b",
        r"\b\d+(?:\.\d+)?[xX]\b",
        r"\b\d+:\d+\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid metric regex"))
    .collect()
});

static ACTION_VERB_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::Standard)
        .build(ACTION_VERBS)
        .expect("Failed to build action verb matcher")
});

/// Total number of metric-pattern matches in a text
pub fn count_metrics(text: &str) -> usize {
    METRIC_PATTERNS.iter().map(|re| re.find_iter(text).count()).sum()
}

pub fn has_metric(text: &str) -> bool {
    METRIC_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Whether any action verb appears as a whole word
pub fn has_action_verb(text: &str) -> bool {
    let bytes = text.as_bytes();
    ACTION_VERB_MATCHER
        .find_overlapping_iter(text)
        .any(|m| is_word_boundary(bytes, m.start(), m.end()))
}

pub fn has_bullet(text: &str) -> bool {
    text.contains(BULLET_MARKERS)
}

fn is_word_boundary(bytes: &[u8], start: usize, end: usize) -> bool {
    let before = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
    let after = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
    before && after
}

/// Substring matcher over one industry's keyword list, plus any custom terms
pub struct KeywordSet {
    keywords: Vec<String>,
    matcher: AhoCorasick,
}

impl KeywordSet {
    pub fn new(keywords: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&keywords)
            .expect("Keyword patterns are plain literals");

        Self { keywords, matcher }
    }

    pub fn for_industry(industry: Industry, extra: &[String]) -> Self {
        let mut keywords: Vec<String> = industry.keywords().iter().map(|k| k.to_string()).collect();
        keywords.extend(extra.iter().cloned());
        Self::new(keywords)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Indices of keywords occurring anywhere in the haystack, in table order
    pub fn found_in(&self, haystack: &str) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .matcher
            .find_overlapping_iter(haystack)
            .map(|m| m.pattern().as_usize())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        found.sort_unstable();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_lookup_and_fallback() {
        assert_eq!(Industry::from_name("technology"), Some(Industry::Technology));
        assert_eq!(Industry::from_name(" Finance "), Some(Industry::Finance));
        assert_eq!(Industry::resolve(Some("Aerospace")), Industry::Business);
        assert_eq!(Industry::resolve(None), Industry::Business);
        assert_eq!(Industry::resolve(Some("")), Industry::Business);
    }

    #[test]
    fn test_closest_industry() {
        let (industry, score) = Industry::closest("Tech").unwrap();
        assert_eq!(industry, Industry::Technology);
        assert!(score > 0.8);
    }

    #[test]
    fn test_keyword_tables_sizes() {
        for industry in Industry::ALL {
            let len = industry.keywords().len();
            assert!((10..=15).contains(&len), "{} has {} keywords", industry, len);
        }
    }

    #[test]
    fn test_action_verbs_match_whole_words() {
        assert!(has_action_verb("Managed a team of 10"));
        assert!(has_action_verb("LED the migration"));
        assert!(!has_action_verb("Handled customer calls"));
        assert!(!has_action_verb("Was called upon"));
    }

    #[test]
    fn test_metric_counting() {
        assert!(has_metric("Increased revenue by 35%"));
        assert!(has_metric("Saved $2.5M annually"));
        assert!(has_metric("3x faster builds"));
        assert!(has_metric("Kept a 4:1 ratio"));
        assert!(!has_metric("Wrote documentation"));
        // "35%" hits the percentage and the bare number pattern, "10" the bare number
        assert_eq!(count_metrics("Increased revenue by 35% and managed a team of 10"), 3);
    }

    #[test]
    fn test_keyword_set_finds_substrings() {
        let set = KeywordSet::for_industry(Industry::Technology, &["Rust".to_string(), "react".to_string()]);
        assert_eq!(set.len(), Industry::Technology.keywords().len() + 1);

        let found = set.found_in("react node.js sql");
        let names: Vec<&str> = found.iter().map(|i| set.keywords()[*i].as_str()).collect();
        assert_eq!(names, vec!["react", "node.js", "sql"]);
    }
}
