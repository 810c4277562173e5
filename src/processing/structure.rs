//! Structured, per-request view of raw resume text

use crate::model::{EducationEntry, ExperienceEntry, PersonalInfo, ResumeData};
use crate::processing::blocks::{
    parse_education_blocks, parse_experience_blocks, EducationBlock, ExperienceBlock,
};
use crate::processing::sections::{
    classify_line, extract_contact_info, strip_bullet, ContactInfo, SectionType, MAX_HEADER_LINES,
};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const HEADER_TITLE: &str = "Contact Information";
const OVERFLOW_TITLE: &str = "Additional Information";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredResume {
    pub sections: Vec<ResumeSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub content: SectionContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SectionContent {
    Header(ContactInfo),
    Paragraph(String),
    List(Vec<String>),
    ExperienceBlock(Vec<ExperienceBlock>),
    EducationBlock(Vec<EducationBlock>),
}

/// Section being accumulated while scanning lines
struct PendingSection {
    section_type: SectionType,
    title: String,
    lines: Vec<String>,
}

/// Split raw resume text into typed sections.
///
/// Up to the first ten lines before any recognised heading form the header
/// block and go through contact extraction; further lines before a heading
/// are kept in an "Additional Information" section. Every heading starts a
/// new section whose body is shaped according to its type.
pub fn parse_resume_to_structured(content: &str) -> StructuredResume {
    let lines: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let mut header_lines: Vec<String> = Vec::new();
    let mut overflow_lines: Vec<String> = Vec::new();
    let mut pending: Vec<PendingSection> = Vec::new();

    for line in lines {
        if let Some(heading) = classify_line(&line) {
            pending.push(PendingSection {
                section_type: heading.section_type,
                title: heading.title,
                lines: Vec::new(),
            });
            continue;
        }

        match pending.last_mut() {
            Some(section) => section.lines.push(line),
            None if header_lines.len() < MAX_HEADER_LINES => header_lines.push(line),
            None => overflow_lines.push(line),
        }
    }

    let mut sections = Vec::new();

    if !header_lines.is_empty() {
        sections.push(ResumeSection {
            id: section_id(SectionType::Header, 0),
            section_type: SectionType::Header,
            title: HEADER_TITLE.to_string(),
            content: SectionContent::Header(extract_contact_info(&header_lines)),
        });
    }

    if !overflow_lines.is_empty() {
        let index = sections.len();
        sections.push(ResumeSection {
            id: section_id(SectionType::Other, index),
            section_type: SectionType::Other,
            title: OVERFLOW_TITLE.to_string(),
            content: SectionContent::List(overflow_lines.iter().map(|l| strip_bullet(l)).collect()),
        });
    }

    for section in pending {
        let index = sections.len();
        let content = build_content(section.section_type, &section.lines);
        sections.push(ResumeSection {
            id: section_id(section.section_type, index),
            section_type: section.section_type,
            title: section.title,
            content,
        });
    }

    debug!("Structured resume into {} section(s)", sections.len());
    StructuredResume { sections }
}

fn section_id(section_type: SectionType, index: usize) -> String {
    format!("{}-{}", section_type, index)
}

fn build_content(section_type: SectionType, lines: &[String]) -> SectionContent {
    match section_type {
        SectionType::Summary => SectionContent::Paragraph(
            lines.iter().map(|l| strip_bullet(l)).collect::<Vec<_>>().join(" "),
        ),
        SectionType::Skills => SectionContent::List(split_skill_lines(lines)),
        SectionType::Experience => {
            let (blocks, orphans) = parse_experience_blocks(lines);
            if blocks.is_empty() {
                SectionContent::List(orphans)
            } else {
                SectionContent::ExperienceBlock(blocks)
            }
        }
        SectionType::Education => {
            let (blocks, orphans) = parse_education_blocks(lines);
            if blocks.is_empty() {
                SectionContent::List(orphans)
            } else {
                SectionContent::EducationBlock(blocks)
            }
        }
        SectionType::Header | SectionType::Other => {
            SectionContent::List(lines.iter().map(|l| strip_bullet(l)).filter(|l| !l.is_empty()).collect())
        }
    }
}

/// Skills lines are usually comma/pipe/bullet separated, sometimes "Label: a, b"
fn split_skill_lines(lines: &[String]) -> Vec<String> {
    let mut skills = Vec::new();
    for line in lines {
        let stripped = strip_bullet(line);
        let items = match stripped.split_once(':') {
            Some((_, rest)) => rest.to_string(),
            None => stripped,
        };
        for item in items.split(&[',', ';', '|', '•', '·'][..]) {
            let item = item.trim();
            if !item.is_empty() && !skills.iter().any(|s: &String| s.eq_ignore_ascii_case(item)) {
                skills.push(item.to_string());
            }
        }
    }
    skills
}

static DATE_RANGE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:-|–|—|\bto\b)\s*").expect("Invalid date range regex"));
static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^.*\b(?:in|of)\s+(.+)$").expect("Invalid field-of-study regex"));

fn split_date_range(dates: &str) -> (String, String, bool) {
    let mut parts = DATE_RANGE_SPLIT_RE.splitn(dates.trim(), 2);
    let start = parts.next().unwrap_or_default().trim().to_string();
    let end = parts.next().unwrap_or_default().trim().to_string();
    let lowered = end.to_lowercase();
    let current = ["present", "current", "now"].iter().any(|w| lowered.contains(w));
    if current {
        (start, String::new(), true)
    } else {
        (start, end, false)
    }
}

impl StructuredResume {
    pub fn sections_of(&self, section_type: SectionType) -> impl Iterator<Item = &ResumeSection> {
        self.sections.iter().filter(move |s| s.section_type == section_type)
    }

    pub fn contact(&self) -> Option<&ContactInfo> {
        self.sections.iter().find_map(|s| match &s.content {
            SectionContent::Header(contact) => Some(contact),
            _ => None,
        })
    }

    /// Map the parsed view onto the editable resume model so it can be scored
    pub fn to_resume_data(&self) -> ResumeData {
        let mut data = ResumeData::default();

        if let Some(contact) = self.contact() {
            data.personal_info = PersonalInfo {
                full_name: contact.name.clone(),
                email: contact.email.clone().unwrap_or_default(),
                phone: contact.phone.clone().unwrap_or_default(),
                location: contact.location.clone().unwrap_or_default(),
                linkedin: contact.linkedin.clone().unwrap_or_default(),
                website: contact.website.clone().unwrap_or_default(),
            };
        }

        for section in &self.sections {
            match (&section.section_type, &section.content) {
                (SectionType::Summary, SectionContent::Paragraph(text)) if data.summary.is_empty() => {
                    data.summary = text.clone();
                }
                (_, SectionContent::ExperienceBlock(blocks)) => {
                    data.experience.extend(blocks.iter().map(experience_entry));
                }
                (_, SectionContent::EducationBlock(blocks)) => {
                    data.education.extend(blocks.iter().map(education_entry));
                }
                (SectionType::Skills, SectionContent::List(items)) => {
                    data.skills.technical.extend(items.iter().cloned());
                }
                _ => {}
            }
        }

        data.normalize();
        data
    }
}

fn experience_entry(block: &ExperienceBlock) -> ExperienceEntry {
    let (start_date, end_date, current) = block
        .dates
        .as_deref()
        .map(split_date_range)
        .unwrap_or_default();

    ExperienceEntry {
        company: block.company.clone().unwrap_or_default(),
        position: block.title.clone(),
        start_date,
        end_date,
        current,
        description: block
            .responsibilities
            .iter()
            .map(|r| format!("• {}", r))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn education_entry(block: &EducationBlock) -> EducationEntry {
    let (start_date, end_date, _) = block
        .dates
        .as_deref()
        .map(split_date_range)
        .unwrap_or_default();

    let degree = block.degree.clone().unwrap_or_else(|| block.title.clone());
    let field = FIELD_RE
        .captures(&degree)
        .map(|caps| caps[1].trim().to_string())
        .or_else(|| {
            // "B.S. Computer Science": the field follows the degree abbreviation
            degree
                .split_once(". ")
                .map(|(_, rest)| rest.trim().to_string())
                .filter(|rest| !rest.is_empty())
        })
        .unwrap_or_default();

    EducationEntry {
        school: block.institution.clone().unwrap_or_default(),
        degree,
        field,
        start_date,
        end_date,
        gpa: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Jane Smith\n\
        jane.smith@example.com\n\
        (555) 123-4567 | Austin, TX\n\
        \n\
        SUMMARY\n\
        Backend engineer focused on reliable payment systems.\n\
        \n\
        EXPERIENCE\n\
        Senior Software Engineer at Acme Corp\n\
        Jan 2020 - Present\n\
        - Increased revenue by 35% and managed a team of 10\n\
        \n\
        EDUCATION\n\
        B.S. Computer Science\n\
        University of Texas\n\
        2012 - 2016\n\
        \n\
        SKILLS\n\
        React, Node.js, SQL\n\
        Tools: Rust; Go\n";

    #[test]
    fn test_header_section_first_with_name() {
        let resume = parse_resume_to_structured(SAMPLE);
        let first = &resume.sections[0];

        assert_eq!(first.section_type, SectionType::Header);
        assert_eq!(first.id, "header-0");
        match &first.content {
            SectionContent::Header(contact) => {
                assert_eq!(contact.name, "Jane Smith");
                assert_eq!(contact.email.as_deref(), Some("jane.smith@example.com"));
                assert_eq!(contact.location.as_deref(), Some("Austin, TX"));
            }
            other => panic!("unexpected header content: {:?}", other),
        }
    }

    #[test]
    fn test_experience_section_has_titled_block() {
        let resume = parse_resume_to_structured(SAMPLE);
        let experience = resume.sections_of(SectionType::Experience).next().unwrap();

        match &experience.content {
            SectionContent::ExperienceBlock(blocks) => {
                assert!(!blocks.is_empty());
                assert!(!blocks[0].title.is_empty());
                assert_eq!(blocks[0].company.as_deref(), Some("Acme Corp"));
            }
            other => panic!("unexpected experience content: {:?}", other),
        }
    }

    #[test]
    fn test_minimal_name_email_experience_input() {
        let text = "John Doe\njohn@doe.dev\nEXPERIENCE\nLead Developer at Initech\nBuilt the billing system";
        let resume = parse_resume_to_structured(text);

        assert_eq!(resume.sections[0].section_type, SectionType::Header);
        assert_eq!(resume.contact().unwrap().name, "John Doe");
        let experience = resume.sections_of(SectionType::Experience).next().unwrap();
        match &experience.content {
            SectionContent::ExperienceBlock(blocks) => assert_eq!(blocks[0].title, "Lead Developer"),
            other => panic!("unexpected experience content: {:?}", other),
        }
    }

    #[test]
    fn test_skills_and_summary_shapes() {
        let resume = parse_resume_to_structured(SAMPLE);

        let summary = resume.sections_of(SectionType::Summary).next().unwrap();
        assert_eq!(
            summary.content,
            SectionContent::Paragraph("Backend engineer focused on reliable payment systems.".to_string())
        );

        let skills = resume.sections_of(SectionType::Skills).next().unwrap();
        assert_eq!(
            skills.content,
            SectionContent::List(vec![
                "React".to_string(),
                "Node.js".to_string(),
                "SQL".to_string(),
                "Rust".to_string(),
                "Go".to_string(),
            ])
        );
    }

    #[test]
    fn test_section_ids_are_deterministic() {
        let a = parse_resume_to_structured(SAMPLE);
        let b = parse_resume_to_structured(SAMPLE);
        assert_eq!(a, b);
        let ids: Vec<&str> = a.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["header-0", "summary-1", "experience-2", "education-3", "skills-4"]);
    }

    #[test]
    fn test_long_preamble_overflows_into_other_section() {
        let text: String = (1..=12).map(|i| format!("Line number {}\n", i)).collect();
        let resume = parse_resume_to_structured(&text);

        assert_eq!(resume.sections.len(), 2);
        assert_eq!(resume.sections[1].title, OVERFLOW_TITLE);
        assert_eq!(
            resume.sections[1].content,
            SectionContent::List(vec!["Line number 11".to_string(), "Line number 12".to_string()])
        );
    }

    #[test]
    fn test_unparseable_experience_keeps_lines() {
        let text = "EXPERIENCE\nFreelance work for local shops\n- Websites and branding";
        let resume = parse_resume_to_structured(text);
        let experience = resume.sections_of(SectionType::Experience).next().unwrap();
        assert_eq!(
            experience.content,
            SectionContent::List(vec![
                "Freelance work for local shops".to_string(),
                "Websites and branding".to_string(),
            ])
        );
    }

    #[test]
    fn test_serialized_shape_uses_type_and_data() {
        let resume = parse_resume_to_structured(SAMPLE);
        let json = serde_json::to_value(&resume).unwrap();

        assert_eq!(json["sections"][0]["type"], "header");
        assert_eq!(json["sections"][0]["content"]["type"], "header");
        assert_eq!(json["sections"][2]["content"]["type"], "experience_block");
        assert!(json["sections"][2]["content"]["data"].is_array());
    }

    #[test]
    fn test_conversion_to_resume_data() {
        let data = parse_resume_to_structured(SAMPLE).to_resume_data();

        assert_eq!(data.personal_info.full_name, "Jane Smith");
        assert_eq!(data.personal_info.phone, "(555) 123-4567");
        assert_eq!(data.experience.len(), 1);

        let job = &data.experience[0];
        assert_eq!(job.position, "Senior Software Engineer");
        assert_eq!(job.company, "Acme Corp");
        assert_eq!(job.start_date, "Jan 2020");
        assert!(job.current);
        assert!(job.end_date.is_empty());
        assert!(job.description.starts_with("• Increased revenue"));

        let school = &data.education[0];
        assert_eq!(school.school, "University of Texas");
        assert_eq!(school.degree, "B.S. Computer Science");
        assert_eq!(school.field, "Computer Science");
        assert_eq!(school.start_date, "2012");
        assert_eq!(school.end_date, "2016");

        assert_eq!(data.skills.technical.len(), 5);
    }

    #[test]
    fn test_company_lines_stay_in_experience() {
        let resume = parse_resume_to_structured("EXPERIENCE\nEngineer @ Globex Technologies\n- Built APIs\n");
        assert_eq!(resume.sections.len(), 1);
        match &resume.sections[0].content {
            SectionContent::ExperienceBlock(blocks) => {
                assert_eq!(blocks[0].title, "Engineer");
                assert_eq!(blocks[0].company.as_deref(), Some("Globex Technologies"));
                assert_eq!(blocks[0].responsibilities, vec!["Built APIs"]);
            }
            other => panic!("unexpected experience content: {:?}", other),
        }

        let data = parse_resume_to_structured(
            "EXPERIENCE\nSenior Engineer\nAcme Technologies\n- Led migration of billing\n- Increased revenue by 20%\n",
        )
        .to_resume_data();
        assert!(data.skills.technical.is_empty());
        assert_eq!(data.experience.len(), 1);
        assert!(data.experience[0].description.contains("Led migration of billing"));
        assert!(data.experience[0].description.contains("Increased revenue by 20%"));
    }
}
