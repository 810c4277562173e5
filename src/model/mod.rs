//! Resume data model shared by the form layer, the parser and the scorer

pub mod resume;

pub use resume::{
    Award, Certificate, EducationEntry, ExperienceEntry, Language, PersonalInfo, Project,
    Publication, ResumeData, Skills, Volunteering,
};
