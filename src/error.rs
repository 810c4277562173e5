//! Error handling for the resume ATS toolkit

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeAtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOC extraction error: {0}")]
    DocExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Could not extract enough readable text ({found} of {required} characters). \
         Please paste your resume text manually."
    )]
    InsufficientContent { found: usize, required: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeAtsError>;
