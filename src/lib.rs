//! Resume ATS toolkit: sanitize resume text, parse it into structured
//! sections, and score structured resume data for ATS compatibility.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeAtsError};
pub use model::ResumeData;
pub use processing::{calculate_ats_score, parse_resume_to_structured, sanitize_content};
