//! Skill paths and tool names
//!
//! A skill is identified by its `SkillPath`: the slash-separated path of its
//! `SKILL.md` relative to the skills root (e.g. `team/go-testing/SKILL.md`).
//! The tool name exposed to clients is derived from the skill's own directory
//! name only, so `team/go-testing` and `go-testing` both become `go_testing`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::description::{extract_description_from_file, fallback_description};
use crate::error::Result;
use crate::uri;

/// Fixed file name of a skill-definition document
pub const SKILL_FILE: &str = "SKILL.md";

/// Extension of every indexed Markdown document
pub const MARKDOWN_EXT: &str = ".md";

/// Convert a skill path into its tool name
///
/// Strips the `SKILL.md` (or any `.md`) suffix, keeps the last remaining path
/// segment, lower-cases it and collapses every run of characters outside
/// `[a-z0-9]` into a single underscore. Total and free of I/O.
#[must_use]
pub fn to_tool_name(path: &str) -> String {
    let trimmed = path
        .strip_suffix(SKILL_FILE)
        .or_else(|| path.strip_suffix(MARKDOWN_EXT))
        .unwrap_or(path);
    let segment = trimmed
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .last()
        .unwrap_or("");
    normalize_name(segment)
}

/// Lower-case a directory name and collapse non-alphanumeric runs into `_`
#[must_use]
pub fn normalize_name(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut in_run = false;
    for ch in segment.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Heuristic inverse of [`to_tool_name`] used when no scanned skill matches
#[must_use]
pub fn guess_skill_path(tool_name: &str) -> String {
    format!("{}/{}", tool_name.replace('_', "-"), SKILL_FILE)
}

/// A skill found under the skills root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    /// Relative skill path, always `/`-separated and ending in `SKILL.md`
    pub path: String,
    /// Absolute path of the skill directory
    pub dir: PathBuf,
    tool_name: String,
}

impl Skill {
    /// Build a skill from the root and its relative skill path
    pub fn new(root: &Path, path: impl Into<String>) -> Self {
        let path = path.into();
        let rel_dir = path.strip_suffix(SKILL_FILE).unwrap_or(&path);
        let dir = rel_dir
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(root.to_path_buf(), |acc, seg| acc.join(seg));
        let tool_name = to_tool_name(&path);
        Self {
            path,
            dir,
            tool_name,
        }
    }

    /// Tool name exposed to clients
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Skill directory relative to the root, without a trailing slash
    pub fn rel_dir(&self) -> &str {
        self.path
            .strip_suffix(SKILL_FILE)
            .unwrap_or(&self.path)
            .trim_end_matches('/')
    }

    /// The skill's own directory name
    pub fn dir_name(&self) -> &str {
        self.rel_dir().rsplit('/').next().unwrap_or("")
    }

    /// Absolute path of the skill document
    pub fn file(&self) -> PathBuf {
        self.dir.join(SKILL_FILE)
    }

    /// `skill://` URI of the skill document
    pub fn uri(&self) -> String {
        uri::build_skill_uri(self.rel_dir())
    }

    /// Read the full skill document
    pub fn read_content(&self) -> Result<String> {
        Ok(fs::read_to_string(self.file())?)
    }

    /// Extract the one-line description, reading only the document head
    pub fn description(&self) -> Result<String> {
        Ok(extract_description_from_file(
            &self.file(),
            &fallback_description(self.dir_name()),
        )?)
    }
}
