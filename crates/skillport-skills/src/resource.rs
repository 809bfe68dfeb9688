//! Indexing of a skill's `resources/` directory

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::description::{extract_description_from_file, fallback_description};
use crate::skill::MARKDOWN_EXT;

/// Name of the per-skill resources subdirectory
pub const RESOURCES_DIR: &str = "resources";

/// An auxiliary Markdown document of a skill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// File name inside `resources/`, including the `.md` extension
    pub filename: String,
    /// One-line description extracted from the document head
    pub description: String,
}

/// Index the Markdown files directly inside `<skill_dir>/resources/`
///
/// Not recursive. A missing `resources/` (or a file in its place) yields an
/// empty list; a file that cannot be read is logged and left out. Sorted by
/// file name, byte-wise.
pub fn index_resources(skill_dir: &Path) -> Vec<ResourceInfo> {
    let dir = skill_dir.join(RESOURCES_DIR);
    if !dir.is_dir() {
        return Vec::new();
    }

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read resources directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut resources = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read entry in {:?}: {}", dir, e);
                continue;
            }
        };
        let path = entry.path();
        let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non UTF-8 resource name {:?}", path);
            continue;
        };
        if !filename.ends_with(MARKDOWN_EXT) || !path.is_file() {
            continue;
        }

        match extract_description_from_file(&path, &fallback_description(&filename)) {
            Ok(description) => resources.push(ResourceInfo {
                filename,
                description,
            }),
            Err(e) => warn!("Skipping resource {:?}: {}", path, e),
        }
    }

    resources.sort_by(|a, b| a.filename.cmp(&b.filename));
    resources
}

/// Render the section appended to a skill document when it has resources
///
/// Returns an empty string for an empty list so callers can append blindly.
#[must_use]
pub fn render_resources_section(resources: &[ResourceInfo]) -> String {
    if resources.is_empty() {
        return String::new();
    }

    let mut section = String::from("\n\n## Available Resources\n\n");
    for resource in resources {
        let name = resource
            .filename
            .strip_suffix(MARKDOWN_EXT)
            .unwrap_or(&resource.filename);
        section.push_str(&format!("- **{}**: {}\n", name, resource.description));
    }
    section
}
