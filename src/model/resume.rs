//! Resume aggregate as edited by the user, one value per resume version

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Skills,
    pub certificates: Vec<Certificate>,
    pub projects: Vec<Project>,
    pub languages: Vec<Language>,
    pub volunteering: Vec<Volunteering>,
    pub awards: Vec<Award>,
    pub publications: Vec<Publication>,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    /// Meaningless while `current` is set
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certificate {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub language: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volunteering {
    pub organization: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Award {
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Publication {
    pub title: String,
    pub publisher: String,
    pub date: String,
    pub url: String,
}

impl ExperienceEntry {
    /// Toggle the "current position" flag; a current position has no end date
    pub fn set_current(&mut self, current: bool) {
        self.current = current;
        if current {
            self.end_date.clear();
        }
    }

    /// The four fields a complete entry must fill in
    pub fn has_required_fields(&self) -> bool {
        [&self.company, &self.position, &self.start_date, &self.description]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

impl EducationEntry {
    pub fn is_complete(&self) -> bool {
        [&self.school, &self.degree, &self.field, &self.start_date, &self.end_date]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

impl Skills {
    pub fn total(&self) -> usize {
        self.technical.len() + self.soft.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.technical.iter().chain(self.soft.iter())
    }
}

impl ResumeData {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let mut data: ResumeData = serde_json::from_str(json)?;
        data.normalize();
        Ok(data)
    }

    /// Enforce entry invariants after bulk edits or deserialization
    pub fn normalize(&mut self) {
        for entry in &mut self.experience {
            if entry.current {
                entry.end_date.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_current_clears_end_date() {
        let mut entry = ExperienceEntry {
            end_date: "2023-05".to_string(),
            ..Default::default()
        };

        entry.set_current(true);
        assert!(entry.current);
        assert!(entry.end_date.is_empty());

        entry.end_date = "2024-01".to_string();
        entry.set_current(false);
        assert_eq!(entry.end_date, "2024-01");
    }

    #[test]
    fn test_partial_camel_case_json_loads() {
        let json = r#"{
            "personalInfo": { "fullName": "Jane Smith", "email": "jane@example.com" },
            "experience": [
                { "company": "Acme", "position": "Engineer", "startDate": "2020",
                  "endDate": "2022", "current": true, "description": "Built things" }
            ],
            "skills": { "technical": ["Rust"] }
        }"#;

        let data = ResumeData::from_json(json).unwrap();
        assert_eq!(data.personal_info.full_name, "Jane Smith");
        assert!(data.personal_info.phone.is_empty());
        assert!(data.experience[0].end_date.is_empty());
        assert_eq!(data.skills.total(), 1);
        assert!(data.education.is_empty());
    }

    #[test]
    fn test_completeness_helpers() {
        let entry = EducationEntry {
            school: "MIT".to_string(),
            degree: "B.S.".to_string(),
            field: "Physics".to_string(),
            start_date: "2010".to_string(),
            end_date: " ".to_string(),
            gpa: None,
        };
        assert!(!entry.is_complete());
    }
}
