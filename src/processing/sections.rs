//! Section header classification and contact block extraction

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// Maximum number of leading lines treated as the contact header block
pub const MAX_HEADER_LINES: usize = 10;

const MAX_HEADER_WORDS: usize = 4;
const MAX_HEADER_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Other,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Header => "header",
            SectionType::Summary => "summary",
            SectionType::Experience => "experience",
            SectionType::Education => "education",
            SectionType::Skills => "skills",
            SectionType::Other => "other",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keyword sets in precedence order; the first category with a hit wins
const SECTION_KEYWORDS: &[(SectionType, &[&str])] = &[
    (
        SectionType::Summary,
        &["SUMMARY", "PROFILE", "OBJECTIVE", "ABOUT ME", "OVERVIEW"],
    ),
    (
        SectionType::Experience,
        &["EXPERIENCE", "EMPLOYMENT", "WORK HISTORY", "PROFESSIONAL BACKGROUND", "CAREER HISTORY"],
    ),
    (
        SectionType::Education,
        &["EDUCATION", "ACADEMIC", "QUALIFICATIONS", "DEGREES"],
    ),
    (
        SectionType::Skills,
        &["SKILLS", "COMPETENCIES", "EXPERTISE", "TECHNOLOGIES", "TECHNICAL PROFICIENCIES"],
    ),
    (
        SectionType::Other,
        &[
            "CERTIFICATIONS", "CERTIFICATES", "PROJECTS", "AWARDS", "HONORS", "LANGUAGES",
            "VOLUNTEER", "PUBLICATIONS", "INTERESTS", "HOBBIES", "REFERENCES", "ACTIVITIES",
        ],
    ),
];

/// A line recognised as the start of a section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionHeading {
    pub section_type: SectionType,
    pub title: String,
}

/// Decide whether a line opens a new section, and which one.
///
/// Only short lines qualify: at most four words and forty characters, and
/// either upper-case, colon-terminated or at most three words. Bullet lines
/// never qualify.
pub fn classify_line(line: &str) -> Option<SectionHeading> {
    let trimmed = line.trim();
    if trimmed.is_empty() || starts_with_bullet(trimmed) {
        return None;
    }

    let title = trimmed.trim_end_matches(':').trim();
    let word_count = title.unicode_words().count();
    if word_count == 0 || word_count > MAX_HEADER_WORDS || title.chars().count() > MAX_HEADER_CHARS {
        return None;
    }

    let is_upper = title.chars().any(|c| c.is_alphabetic())
        && title.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase());
    let has_colon = trimmed.ends_with(':');
    if !(is_upper || has_colon || word_count <= 3) {
        return None;
    }

    // Short mixed-case lines like "Acme Technologies" are body text unless the
    // keyword is all there is besides a few heading modifiers
    let strict_shape = is_upper || has_colon;
    let upper = title.to_uppercase();
    SECTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords.iter().any(|k| {
                upper.contains(k) && (strict_shape || only_modifiers_remain(&upper, k))
            })
        })
        .map(|(section_type, _)| {
            debug!("Detected {} section heading: {}", section_type, title);
            SectionHeading {
                section_type: *section_type,
                title: title.to_string(),
            }
        })
}

/// Words that may accompany a section keyword in a mixed-case heading
const HEADING_MODIFIERS: &[&str] = &[
    "technical", "professional", "work", "core", "key", "relevant", "additional",
    "career", "selected", "personal", "and", "&", "my", "other", "recent",
];

fn only_modifiers_remain(upper_title: &str, keyword: &str) -> bool {
    upper_title
        .replacen(keyword, " ", 1)
        .split(|c: char| c.is_whitespace() || c == '/' || c == ',')
        .filter(|w| !w.is_empty())
        .all(|w| HEADING_MODIFIERS.contains(&w.to_lowercase().as_str()))
}

pub fn starts_with_bullet(line: &str) -> bool {
    line.trim_start()
        .starts_with(|c: char| matches!(c, '•' | '-' | '*' | '·' | '▪' | '◦' | '–'))
}

/// Remove a leading bullet marker and surrounding whitespace
pub fn strip_bullet(line: &str) -> String {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '•' | '-' | '*' | '·' | '▪' | '◦' | '–'))
        .trim()
        .to_string()
}

/// Contact details recovered from the header block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
}

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Invalid email regex")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d[\d\s().-]{7,}\d").expect("Invalid phone regex"));
static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/[^\s|,]+").expect("Invalid LinkedIn regex")
});
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://|www\.)[^\s|,]+").expect("Invalid URL regex")
});

static FIELD_GAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("Invalid field gap regex"));

/// Extract contact details from the header lines.
///
/// Email, LinkedIn, website and phone are detected independently on every
/// part of a line, each match cut out before the next check. Whatever text
/// is left then supplies the name (first plain chunk) and the location (first
/// chunk with a comma and no "@").
pub fn extract_contact_info(lines: &[String]) -> ContactInfo {
    let mut contact = ContactInfo::default();

    for line in lines.iter().take(MAX_HEADER_LINES) {
        // Header lines often pack several fields separated by pipes or bullets
        for part in line.split(&['|', '•', '·'][..]).map(str::trim).filter(|p| !p.is_empty()) {
            let mut rest = part.to_string();

            if let Some(email) = take_match(&EMAIL_RE, &mut rest) {
                contact.email.get_or_insert(email);
            }
            if let Some(linkedin) = take_match(&LINKEDIN_RE, &mut rest) {
                contact.linkedin.get_or_insert(linkedin);
            } else if rest.to_lowercase().contains("linkedin") {
                contact.linkedin.get_or_insert_with(|| rest.trim().to_string());
                rest.clear();
            }
            if let Some(website) = take_match(&URL_RE, &mut rest) {
                contact.website.get_or_insert(website);
            }
            if let Some(phone) = take_phone(&mut rest) {
                contact.phone.get_or_insert(phone);
            }

            // PDF extraction often turns separators into runs of spaces
            for chunk in FIELD_GAP_RE.split(rest.trim()).map(str::trim).filter(|c| !c.is_empty()) {
                if contact.name.is_empty() && looks_like_name(chunk) {
                    contact.name = chunk.to_string();
                } else if contact.location.is_none() && chunk.contains(',') && !chunk.contains('@') {
                    contact.location = Some(chunk.to_string());
                }
            }
        }
    }

    contact
}

/// Cut the first match out of `text`, returning it
fn take_match(re: &Regex, text: &mut String) -> Option<String> {
    let (range, value) = re.find(text).map(|m| (m.range(), m.as_str().trim().to_string()))?;
    text.replace_range(range, "  ");
    Some(value)
}

fn take_phone(text: &mut String) -> Option<String> {
    let (range, value) = PHONE_RE
        .find(text)
        .filter(|m| m.as_str().chars().filter(|c| c.is_ascii_digit()).count() >= 7)
        .map(|m| (m.range(), m.as_str().trim().to_string()))?;
    text.replace_range(range, "  ");
    Some(value)
}

fn looks_like_name(part: &str) -> bool {
    !part.contains('@')
        && !part.contains(',')
        && !part.chars().any(|c| c.is_ascii_digit())
        && part.chars().any(|c| c.is_alphabetic())
        && part.unicode_words().count() <= 5
}
