//! Content sanitizer for extracted or pasted resume text

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Returned whenever nothing readable survives sanitization
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "No content available";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(?:nbsp|amp|lt|gt|quot|#39);").expect("Invalid entity regex"));
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("Invalid space regex"));
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid blank line regex"));

/// Normalize raw text before structural parsing.
///
/// Strips HTML tags, decodes the common entities, normalizes line endings,
/// replaces anything outside printable ASCII (other than newline) with a
/// space, collapses horizontal whitespace and runs of blank lines.
/// Never fails; empty results become [`EMPTY_CONTENT_PLACEHOLDER`].
/// Applying it twice yields the same string as applying it once.
pub fn sanitize_content(raw: &str) -> String {
    if raw.trim().is_empty() {
        return EMPTY_CONTENT_PLACEHOLDER.to_string();
    }

    // Decoding can reveal new tags ("&lt;b&gt;") and stripping can reveal new
    // entities, so iterate until neither pass changes anything.
    let mut text = raw.to_string();
    loop {
        let stripped = TAG_RE.replace_all(&text, "");
        let decoded = decode_entities(&stripped);
        if decoded == text {
            break;
        }
        text = decoded;
    }

    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let printable: String = text
        .chars()
        .map(|c| if c == '\n' || (' '..='~').contains(&c) { c } else { ' ' })
        .collect();

    let lines: Vec<String> = printable
        .split('\n')
        .map(|line| SPACE_RUN_RE.replace_all(line, " ").trim().to_string())
        .collect();
    let joined = lines.join("\n");

    let collapsed = BLANK_RUN_RE.replace_all(&joined, "\n\n");
    let result = collapsed.trim();

    debug!("Sanitized content: {} -> {} characters", raw.len(), result.len());

    if result.is_empty() {
        EMPTY_CONTENT_PLACEHOLDER.to_string()
    } else {
        result.to_string()
    }
}

/// Sanitize possibly-absent input, as handed over by loosely typed callers
pub fn sanitize_optional(raw: Option<&str>) -> String {
    raw.map(sanitize_content)
        .unwrap_or_else(|| EMPTY_CONTENT_PLACEHOLDER.to_string())
}

/// Whether sanitization produced real content rather than the placeholder
pub fn has_content(sanitized: &str) -> bool {
    !sanitized.is_empty() && sanitized != EMPTY_CONTENT_PLACEHOLDER
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            match &caps[0] {
                "&nbsp;" => " ",
                "&amp;" => "&",
                "&lt;" => "<",
                "&gt;" => ">",
                "&quot;" => "\"",
                _ => "'",
            }
            .to_string()
        })
        .into_owned()
}
