//! One-line description extraction from skill and resource documents
//!
//! Precedence:
//! 1. `description:` inside a leading, closed `---` front-matter block
//! 2. the first `# ` or `## ` heading after the front-matter
//! 3. the first non-blank content line, truncated
//! 4. a fallback derived from the file or directory name
//!
//! Extraction is line based and stops reading as soon as the answer is known,
//! so resources are never loaded in full just to describe them.

use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

/// Longest content line used verbatim as a description
pub const MAX_LINE_DESCRIPTION: usize = 100;

const FRONT_MATTER_DELIMITER: &str = "---";
const ELLIPSIS: &str = "...";

// The pattern is a literal, so compiling it cannot fail at runtime
#[allow(clippy::expect_used)]
static DESCRIPTION_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^description:\s*(.*)$").expect("description key pattern is valid")
});

/// Extract the description of an in-memory document
#[must_use]
pub fn extract_description(content: &str, fallback: &str) -> String {
    // Reading from a byte slice cannot fail
    extract_description_from_reader(content.as_bytes(), fallback)
        .unwrap_or_else(|_| fallback.to_string())
}

/// Extract the description of a file, reading only as far as needed
pub fn extract_description_from_file(path: &Path, fallback: &str) -> io::Result<String> {
    let file = File::open(path)?;
    extract_description_from_reader(BufReader::new(file), fallback)
}

/// Extract the description from any line reader
pub fn extract_description_from_reader<R: BufRead>(
    reader: R,
    fallback: &str,
) -> io::Result<String> {
    let mut lines = reader.lines();

    let first = loop {
        match lines.next() {
            None => return Ok(fallback.to_string()),
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
        }
    };

    if first.trim() != FRONT_MATTER_DELIMITER {
        let body = std::iter::once(Ok(first)).chain(lines);
        return scan_body(body, fallback);
    }

    let mut block = vec![first];
    let mut description = None;
    let mut closed = false;
    for line in lines.by_ref() {
        let line = line?;
        if line.trim() == FRONT_MATTER_DELIMITER {
            closed = true;
            break;
        }
        if description.is_none() {
            description = front_matter_description(&line);
        }
        block.push(line);
    }

    if closed {
        if let Some(description) = description {
            return Ok(description);
        }
        scan_body(lines, fallback)
    } else {
        // Unterminated block: the whole document is treated as body
        scan_body(block.into_iter().map(Ok), fallback)
    }
}

/// Fallback description from a directory or file name
#[must_use]
pub fn fallback_description(name: &str) -> String {
    let stem = name.strip_suffix(crate::skill::MARKDOWN_EXT).unwrap_or(name);
    stem.replace(['_', '-'], " ")
}

fn front_matter_description(line: &str) -> Option<String> {
    let captures = DESCRIPTION_KEY.captures(line.trim())?;
    let value = captures.get(1)?.as_str().trim();
    if value.is_empty() {
        return None;
    }
    Some(strip_quotes(value).to_string())
}

fn strip_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && (first == '"' || first == '\'') => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let text = trimmed
        .strip_prefix("# ")
        .or_else(|| trimmed.strip_prefix("## "))?
        .trim();
    (!text.is_empty()).then_some(text)
}

fn scan_body<I>(lines: I, fallback: &str) -> io::Result<String>
where
    I: Iterator<Item = io::Result<String>>,
{
    let mut first_content: Option<String> = None;
    for line in lines {
        let line = line?;
        if let Some(heading) = heading_text(&line) {
            return Ok(heading.to_string());
        }
        let trimmed = line.trim();
        if first_content.is_none() && !trimmed.is_empty() && trimmed != FRONT_MATTER_DELIMITER {
            first_content = Some(trimmed.to_string());
        }
    }

    Ok(match first_content {
        Some(line) => truncate(&line),
        None => fallback.to_string(),
    })
}

fn truncate(line: &str) -> String {
    if line.chars().count() <= MAX_LINE_DESCRIPTION {
        return line.to_string();
    }
    let mut out: String = line.chars().take(MAX_LINE_DESCRIPTION).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_front_matter_wins_over_heading() {
        let doc = "---\ndescription: \"Design RESTful APIs\"\n---\n# API Design\n";
        assert_eq!(extract_description(doc, "x"), "Design RESTful APIs");
    }

    #[test]
    fn test_heading_without_front_matter() {
        let doc = "# Go Concurrency\n\nDetails...";
        assert_eq!(extract_description(doc, "x"), "Go Concurrency");
    }

    #[test]
    fn test_level_two_heading() {
        let doc = "\n\n## Setup Guide  \nbody";
        assert_eq!(extract_description(doc, "x"), "Setup Guide");
    }

    #[test]
    fn test_key_is_case_insensitive_and_single_quotes_stripped() {
        let doc = "---\nname: x\nDescription: 'Quoted value'\n---\n";
        assert_eq!(extract_description(doc, "x"), "Quoted value");
    }

    #[test]
    fn test_mismatched_quotes_are_kept() {
        let doc = "---\ndescription: \"half quoted'\n---\n";
        assert_eq!(extract_description(doc, "x"), "\"half quoted'");
    }

    #[test]
    fn test_front_matter_without_description_uses_heading() {
        let doc = "---\nname: tool\n---\n\n# Real Title\n";
        assert_eq!(extract_description(doc, "x"), "Real Title");
    }

    #[test]
    fn test_unterminated_front_matter_is_ignored() {
        let doc = "---\ndescription: never used\n# Heading Inside\n";
        assert_eq!(extract_description(doc, "x"), "Heading Inside");
    }

    #[test]
    fn test_unterminated_front_matter_falls_back_to_content_line() {
        let doc = "---\ndescription: never used\n";
        assert_eq!(extract_description(doc, "x"), "description: never used");
    }

    #[test]
    fn test_first_content_line_when_no_heading() {
        let doc = "\nJust some text.\n### Deep heading\n";
        assert_eq!(extract_description(doc, "x"), "Just some text.");
    }

    #[test]
    fn test_long_content_line_is_truncated() {
        let line = "a".repeat(150);
        let described = extract_description(&line, "x");
        assert_eq!(described, format!("{}...", "a".repeat(100)));
    }

    #[test]
    fn test_exactly_max_length_is_not_truncated() {
        let line = "b".repeat(MAX_LINE_DESCRIPTION);
        assert_eq!(extract_description(&line, "x"), line);
    }

    #[test]
    fn test_empty_document_uses_fallback() {
        assert_eq!(
            extract_description("  \n\n", &fallback_description("go_testing-guide")),
            "go testing guide"
        );
    }

    #[test]
    fn test_fallback_strips_markdown_extension() {
        assert_eq!(fallback_description("error-codes.md"), "error codes");
    }

    #[test]
    fn test_reader_stops_at_heading() {
        // Anything after the heading is never consumed
        let doc = "# Title\n";
        let reader = io::BufReader::new(doc.as_bytes().chain(FailingReader));
        assert_eq!(
            extract_description_from_reader(reader, "x").unwrap(),
            "Title"
        );
    }

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("read past the description"))
        }
    }
}
