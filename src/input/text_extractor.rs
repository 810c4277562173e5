//! Text extraction from various file formats

use crate::error::{Result, ResumeAtsError};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use tokio::fs;

/// Shortest byte run the legacy document scanner keeps
const MIN_DOC_RUN: usize = 4;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ResumeAtsError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(html_to_text(&html_output))
    }
}

pub struct HtmlExtractor;

impl TextExtractor for HtmlExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Ok(html_to_text(&String::from_utf8_lossy(&bytes)))
    }
}

/// Legacy binary Word documents, read by scanning for printable byte runs
pub struct DocExtractor;

impl TextExtractor for DocExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        let text = scan_doc_bytes(&bytes);
        if text.is_empty() {
            return Err(ResumeAtsError::DocExtraction(format!(
                "No readable text found in '{}'",
                path.display()
            )));
        }
        Ok(text)
    }
}

static BLOCK_END_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6]|tr|ul|ol|section|header)>")
        .expect("Invalid block tag regex")
});
static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<li[^>]*>").expect("Invalid list item regex"));
static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:script|style|title)[^>]*>.*?</(?:script|style|title)>").expect("Invalid script regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

/// Reduce HTML to one line per block element, keeping list items as "- " bullets
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, "");
    let text = LIST_ITEM_RE.replace_all(&text, "- ");
    let text = BLOCK_END_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines.join("\n")
}

/// Recover text from a binary document.
///
/// Collects runs of printable ASCII bytes and, separately, runs of UTF-16LE
/// code units in the printable ASCII range. Runs shorter than four characters
/// or without a letter are dropped; whichever scan yields more text wins.
pub fn scan_doc_bytes(bytes: &[u8]) -> String {
    let ascii = collect_runs(bytes.iter().copied());
    // Text streams may start at either byte parity
    let utf16_even = collect_utf16_runs(bytes);
    let utf16_odd = collect_utf16_runs(bytes.get(1..).unwrap_or_default());

    [ascii, utf16_even, utf16_odd]
        .into_iter()
        .fold(Vec::new(), |best: Vec<String>, runs| {
            if text_length(&runs) > text_length(&best) {
                runs
            } else {
                best
            }
        })
        .join("\n")
}

fn text_length(runs: &[String]) -> usize {
    runs.iter().map(String::len).sum()
}

fn collect_utf16_runs(bytes: &[u8]) -> Vec<String> {
    collect_runs(
        bytes
            .chunks_exact(2)
            .map(|pair| if pair[1] == 0 { pair[0] } else { 0 }),
    )
}

fn collect_runs(units: impl Iterator<Item = u8>) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String| {
        let run = current.trim();
        if run.len() >= MIN_DOC_RUN && run.chars().any(|c| c.is_ascii_alphabetic()) {
            runs.push(run.to_string());
        }
        current.clear();
    };

    for byte in units {
        if byte == b'\t' || (0x20..=0x7e).contains(&byte) {
            current.push(byte as char);
        } else {
            flush(&mut current);
        }
    }
    flush(&mut current);

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_keeps_block_structure() {
        let html = "<h1>Jane Smith</h1><p>Engineer &amp; mentor</p><ul><li>Rust</li><li>Go</li></ul>";
        assert_eq!(html_to_text(html), "Jane Smith\nEngineer & mentor\n- Rust\n- Go");
    }

    #[test]
    fn test_html_to_text_drops_scripts() {
        let html = "<style>p { color: red; }</style><p>Visible</p><script>alert(1)</script>";
        assert_eq!(html_to_text(html), "Visible");
    }

    #[test]
    fn test_scan_ascii_runs() {
        let mut bytes = vec![0u8, 1, 2];
        bytes.extend_from_slice(b"Jane Smith");
        bytes.extend_from_slice(&[0xff, 0x00]);
        bytes.extend_from_slice(b"ab");
        bytes.extend_from_slice(&[0x00]);
        bytes.extend_from_slice(b"1234");
        bytes.extend_from_slice(&[0x00]);
        bytes.extend_from_slice(b"Software Engineer");

        assert_eq!(scan_doc_bytes(&bytes), "Jane Smith\nSoftware Engineer");
    }

    #[test]
    fn test_scan_prefers_utf16_when_longer() {
        let mut bytes = Vec::new();
        for c in "Experienced backend engineer".encode_utf16() {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        bytes.extend_from_slice(&[0x01, 0x02]);

        assert_eq!(scan_doc_bytes(&bytes), "Experienced backend engineer");
    }

    #[test]
    fn test_scan_finds_utf16_at_odd_offset() {
        let mut bytes = vec![0x07u8];
        for c in "Registered nurse with ICU experience".encode_utf16() {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        bytes.extend_from_slice(&[0x01, 0x02]);

        assert_eq!(scan_doc_bytes(&bytes), "Registered nurse with ICU experience");
    }

    #[test]
    fn test_scan_empty_input() {
        assert!(scan_doc_bytes(&[0u8, 1, 2, 3]).is_empty());
    }
}
