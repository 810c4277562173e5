//! Groups the body lines of experience and education sections into entries

use crate::processing::sections::{starts_with_bullet, strip_bullet};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Role-keyword titles longer than this are treated as prose
const MAX_ROLE_TITLE_WORDS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBlock {
    pub title: String,
    pub company: Option<String>,
    pub dates: Option<String>,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationBlock {
    pub title: String,
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub dates: Option<String>,
    pub details: Vec<String>,
}

/// Which start pattern opened an experience entry, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TitlePattern {
    At,
    Pipe,
    Year,
    RoleKeyword,
}

static AT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)\s+(?:at|@)\s+(.+)$").expect("Invalid 'at' title regex"));
static PIPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^|]+?)\s*\|\s*(.+)$").expect("Invalid pipe title regex"));
static YEAR_AFTER_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z].*?\b(?:19|20)\d{2}\b").expect("Invalid year title regex"));
static ROLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:manager|director|engineer|analyst|developer|designer|specialist|coordinator|associate)s?\b")
        .expect("Invalid role keyword regex")
});
const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

static DATE_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{MONTH}\s+)?(?:19|20)\d{{2}}\b")).expect("Invalid date regex")
});
static DATE_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    let point = format!(r"(?:{MONTH}\s+)?(?:\d{{1,2}}/)?(?:19|20)\d{{2}}");
    Regex::new(&format!(
        r"(?i)^\(?{point}(?:\s*(?:-|–|—|to)\s*(?:{point}|present|current|now))?\)?$"
    ))
    .expect("Invalid date-only regex")
});
static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\b(?:bachelor|master|phd|ph\.d|doctorate|associate|mba|degree)|(?:^|[^a-z])(?:b\.a\.|b\.s\.|m\.a\.|m\.s\.|b\.sc|m\.sc))")
        .expect("Invalid degree regex")
});
static INSTITUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:university|college|institute)\b").expect("Invalid institution regex"));

/// Whether a line is nothing but a date or date range
pub fn is_date_line(line: &str) -> bool {
    DATE_ONLY_RE.is_match(line.trim())
}

/// Split "<text> <date...>" into the leading text and the date tail
fn split_trailing_dates(text: &str) -> (String, Option<String>) {
    match DATE_START_RE.find(text) {
        Some(m) if m.start() > 0 => {
            let head = text[..m.start()]
                .trim()
                .trim_end_matches(|c: char| matches!(c, ',' | '-' | '–' | '|' | '(' | ' '))
                .trim()
                .to_string();
            let tail = text[m.start()..].trim().trim_end_matches(')').trim().to_string();
            (head, Some(tail))
        }
        _ => (text.trim().to_string(), None),
    }
}

fn match_title(line: &str) -> Option<TitlePattern> {
    if starts_with_bullet(line) {
        return None;
    }
    if AT_RE.is_match(line) {
        Some(TitlePattern::At)
    } else if PIPE_RE.is_match(line) {
        Some(TitlePattern::Pipe)
    } else if YEAR_AFTER_TEXT_RE.is_match(line) && !is_date_line(line) {
        Some(TitlePattern::Year)
    } else if ROLE_RE.is_match(line) && line.unicode_words().count() <= MAX_ROLE_TITLE_WORDS {
        Some(TitlePattern::RoleKeyword)
    } else {
        None
    }
}

fn build_experience_block(line: &str, pattern: TitlePattern) -> ExperienceBlock {
    let mut block = ExperienceBlock::default();

    match pattern {
        TitlePattern::At | TitlePattern::Pipe => {
            let caps = match pattern {
                TitlePattern::At => AT_RE.captures(line),
                _ => PIPE_RE.captures(line),
            };
            if let Some(caps) = caps {
                block.title = caps[1].trim().to_string();
                // "Title | Company | 2020 - Present" style: dates may follow another pipe
                let rest = caps[2].trim();
                let (company_part, pipe_dates) = match rest.split_once('|') {
                    Some((company, dates)) => (company.trim(), Some(dates.trim().to_string())),
                    None => (rest, None),
                };
                let (company, dates) = split_trailing_dates(company_part);
                block.company = Some(company).filter(|c| !c.is_empty());
                block.dates = pipe_dates.or(dates);
            }
        }
        TitlePattern::Year => {
            let (title, dates) = split_trailing_dates(line);
            block.title = title;
            block.dates = dates;
        }
        TitlePattern::RoleKeyword => {
            block.title = line.trim().to_string();
        }
    }

    if block.title.is_empty() {
        block.title = line.trim().to_string();
    }
    block
}

/// Group experience-section lines into entries.
///
/// A line opens a new entry when it matches, in precedence order, "X at Y" /
/// "X @ Y", "X | Y", leading text followed by a 4-digit year, or a role-title
/// keyword. A date-only line directly after a title becomes that entry's
/// dates. Every other line becomes a responsibility with its bullet marker
/// stripped. Lines that appear before the first entry are kept and
/// prepended to the first entry.
pub fn parse_experience_blocks(lines: &[String]) -> (Vec<ExperienceBlock>, Vec<String>) {
    let mut blocks: Vec<ExperienceBlock> = Vec::new();
    let mut orphans: Vec<String> = Vec::new();

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(current) = blocks.last_mut() {
            if current.dates.is_none() && current.responsibilities.is_empty() && is_date_line(line) {
                current.dates = Some(line.trim_matches(|c: char| c == '(' || c == ')').to_string());
                continue;
            }
        }

        if let Some(pattern) = match_title(line) {
            blocks.push(build_experience_block(line, pattern));
            continue;
        }

        let text = strip_bullet(line);
        if text.is_empty() {
            continue;
        }
        match blocks.last_mut() {
            Some(current) => current.responsibilities.push(text),
            None => orphans.push(text),
        }
    }

    if let Some(first) = blocks.first_mut() {
        if !orphans.is_empty() {
            debug!("Attaching {} leading line(s) to first experience entry", orphans.len());
            let mut merged = std::mem::take(&mut orphans);
            merged.append(&mut first.responsibilities);
            first.responsibilities = merged;
        }
    }

    debug!("Parsed {} experience block(s)", blocks.len());
    (blocks, orphans)
}

fn build_education_block(line: &str) -> EducationBlock {
    let (text, dates) = split_trailing_dates(line);
    let mut block = EducationBlock {
        title: text.clone(),
        dates,
        ..Default::default()
    };

    let parts: Vec<&str> = text
        .split(&[',', '|', '–'][..])
        .flat_map(|p| p.split(" - "))
        .flat_map(|p| p.split(" at "))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    for part in parts {
        if block.institution.is_none() && INSTITUTION_RE.is_match(part) {
            block.institution = Some(part.to_string());
        } else if block.degree.is_none() && DEGREE_RE.is_match(part) {
            block.degree = Some(part.to_string());
        }
    }

    if block.title.is_empty() {
        block.title = line.trim().to_string();
    }
    block
}

/// Group education-section lines into entries.
///
/// A line opens a new entry when it mentions a degree keyword, the word
/// "degree", or an institution keyword. An institution line directly after
/// a degree-only entry completes that entry instead of opening a new one,
/// as does a date-only line. Remaining lines become details; leading
/// orphan lines are prepended to the first entry.
pub fn parse_education_blocks(lines: &[String]) -> (Vec<EducationBlock>, Vec<String>) {
    let mut blocks: Vec<EducationBlock> = Vec::new();
    let mut orphans: Vec<String> = Vec::new();

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(current) = blocks.last_mut() {
            if current.details.is_empty() {
                if current.dates.is_none() && is_date_line(line) {
                    current.dates = Some(line.trim_matches(|c: char| c == '(' || c == ')').to_string());
                    continue;
                }
                if current.institution.is_none()
                    && !starts_with_bullet(line)
                    && INSTITUTION_RE.is_match(line)
                    && !DEGREE_RE.is_match(line)
                {
                    let (institution, dates) = split_trailing_dates(line);
                    current.institution = Some(institution);
                    if current.dates.is_none() {
                        current.dates = dates;
                    }
                    continue;
                }
            }
        }

        let starts_entry = !starts_with_bullet(line)
            && (DEGREE_RE.is_match(line) || INSTITUTION_RE.is_match(line));
        if starts_entry {
            blocks.push(build_education_block(line));
            continue;
        }

        let text = strip_bullet(line);
        if text.is_empty() {
            continue;
        }
        match blocks.last_mut() {
            Some(current) => current.details.push(text),
            None => orphans.push(text),
        }
    }

    if let Some(first) = blocks.first_mut() {
        if !orphans.is_empty() {
            debug!("Attaching {} leading line(s) to first education entry", orphans.len());
            let mut merged = std::mem::take(&mut orphans);
            merged.append(&mut first.details);
            first.details = merged;
        }
    }

    debug!("Parsed {} education block(s)", blocks.len());
    (blocks, orphans)
}
