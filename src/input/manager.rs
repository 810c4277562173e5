//! Input manager for handling different file types

use crate::config::ExtractionConfig;
use crate::error::{Result, ResumeAtsError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocExtractor, HtmlExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::processing::sanitizer::{has_content, sanitize_content};
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// Minimum readable characters a resume must keep after sanitization
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 50;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
    min_content_chars: usize,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_cache(config.enable_caching)
            .with_min_chars(config.min_content_chars)
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_content_chars = min_chars;
        self
    }

    /// Raw text of a resume file, routed to the extractor for its type
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeAtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Html => {
                info!("Processing HTML file: {}", path.display());
                HtmlExtractor.extract(path).await?
            }
            FileType::Doc => {
                info!("Scanning legacy Word document: {}", path.display());
                DocExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ResumeAtsError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Extracted text, sanitized and checked against the content threshold
    pub async fn extract_resume_text(&mut self, path: &Path) -> Result<String> {
        let raw = self.extract_text(path).await?;
        prepare_resume_text(&raw, self.min_content_chars)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ResumeAtsError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Sanitize raw resume text and reject it when too little survives
pub fn prepare_resume_text(raw: &str, min_chars: usize) -> Result<String> {
    let sanitized = sanitize_content(raw);
    let found = if has_content(&sanitized) {
        sanitized.chars().count()
    } else {
        0
    };

    debug!("Readable characters after sanitizing: {} (need {})", found, min_chars);

    if found < min_chars {
        return Err(ResumeAtsError::InsufficientContent {
            found,
            required: min_chars,
        });
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_rejects_short_text() {
        let err = prepare_resume_text("<p>Jane</p>", DEFAULT_MIN_CONTENT_CHARS).unwrap_err();
        match err {
            ResumeAtsError::InsufficientContent { found, required } => {
                assert_eq!(found, 4);
                assert_eq!(required, 50);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_prepare_treats_placeholder_as_empty() {
        let err = prepare_resume_text("   \n\t ", 1).unwrap_err();
        assert!(matches!(err, ResumeAtsError::InsufficientContent { found: 0, .. }));
    }

    #[test]
    fn test_prepare_returns_sanitized_text() {
        let raw = "Jane   Smith\r\n\r\n\r\n\r\nSenior engineer building payment systems for ten years";
        let text = prepare_resume_text(raw, 20).unwrap();
        assert_eq!(
            text,
            "Jane Smith\n\nSenior engineer building payment systems for ten years"
        );
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            min_content_chars: 10,
            enable_caching: false,
        };
        let manager = InputManager::from_config(&config);
        assert_eq!(manager.min_content_chars, 10);
        assert!(!manager.enable_cache);
    }
}
