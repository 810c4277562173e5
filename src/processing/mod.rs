//! Text processing and analysis module
//! Sanitizing, section parsing and ATS scoring

pub mod ats_score;
pub mod blocks;
pub mod keywords;
pub mod sanitizer;
pub mod sections;
pub mod structure;

pub use ats_score::{calculate_ats_score, AtsScoreResult, AtsScorer, CheckResult, CheckStatus};
pub use keywords::Industry;
pub use sanitizer::sanitize_content;
pub use structure::{parse_resume_to_structured, ResumeSection, SectionContent, StructuredResume};
