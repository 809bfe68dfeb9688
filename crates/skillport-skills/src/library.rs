//! Filesystem-backed view of a skills directory
//!
//! Every operation re-reads the directory; nothing is cached between calls,
//! so a [`SkillLibrary`] can be shared freely across concurrent requests.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, SkillError};
use crate::resource::{index_resources, render_resources_section};
use crate::scanner::{scan_skills, tool_name_collisions};
use crate::skill::{guess_skill_path, Skill};
use crate::uri::{build_resource_uri, display_name, resolve_uri, MARKDOWN_MIME};

/// A skill exposed as a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Skill path the tool resolves to
    pub path: String,
}

/// Result of listing tools
#[derive(Debug, Clone, Default)]
pub struct ToolListing {
    /// Listed tools, in skill path order
    pub tools: Vec<ToolInfo>,
    /// Skills left out because their document could not be read
    pub skipped: usize,
    /// Skills left out because an earlier skill already uses their tool name
    pub shadowed: usize,
}

/// A listed resource: a skill document or one of its `resources/` files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// `skill://` URI
    pub uri: String,
    /// URI without scheme and `.md` extension
    pub display_name: String,
    /// One-line description
    pub description: String,
    /// Always `text/markdown`
    pub mime_type: &'static str,
}

/// Skills rooted at one directory
#[derive(Debug, Clone)]
pub struct SkillLibrary {
    root: PathBuf,
}

impl SkillLibrary {
    /// Create a library for `root`; the directory does not need to exist
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Skills root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the root and return every skill in path order
    pub fn skills(&self) -> Vec<Skill> {
        scan_skills(&self.root)
            .into_iter()
            .map(|path| Skill::new(&self.root, path))
            .collect()
    }

    /// List every skill as a tool
    ///
    /// Unreadable skills are skipped, and a tool name used by more than one
    /// skill is listed once, for the lexically first path.
    pub fn list_tools(&self) -> ToolListing {
        let paths = scan_skills(&self.root);
        for (name, colliding) in tool_name_collisions(&paths) {
            warn!(
                "Tool name '{}' is shared by {:?}; only {} is reachable",
                name, colliding, colliding[0]
            );
        }

        let mut listing = ToolListing::default();
        let mut seen = HashSet::new();
        for path in paths {
            let skill = Skill::new(&self.root, path);
            if !seen.insert(skill.tool_name().to_string()) {
                listing.shadowed += 1;
                continue;
            }
            match skill.description() {
                Ok(description) => listing.tools.push(ToolInfo {
                    name: skill.tool_name().to_string(),
                    description,
                    path: skill.path,
                }),
                Err(e) => {
                    warn!("Skipping skill {}: {}", skill.path, e);
                    listing.skipped += 1;
                }
            }
        }

        if listing.skipped > 0 {
            warn!(
                "Listed {} tools, skipped {} unreadable skills",
                listing.tools.len(),
                listing.skipped
            );
        }
        listing
    }

    /// Map a tool name back to a skill path
    ///
    /// Falls back to `<name with - for _>/SKILL.md` when no scanned skill
    /// matches; that path may not exist.
    pub fn resolve_tool(&self, tool_name: &str) -> String {
        scan_skills(&self.root)
            .into_iter()
            .find(|path| crate::skill::to_tool_name(path) == tool_name)
            .unwrap_or_else(|| {
                debug!("No scanned skill for tool '{}', guessing path", tool_name);
                guess_skill_path(tool_name)
            })
    }

    /// Return the skill document for a tool, followed by its resource list
    ///
    /// With no indexed resources the document is returned unchanged.
    pub fn call_tool(&self, tool_name: &str) -> Result<String> {
        let path = self.resolve_tool(tool_name);
        if !Path::new(&path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(SkillError::UnknownTool(tool_name.to_string()));
        }

        let skill = Skill::new(&self.root, path);
        let mut content = skill.read_content().map_err(|e| {
            debug!("Cannot read {}: {}", skill.path, e);
            SkillError::UnknownTool(tool_name.to_string())
        })?;

        let resources = index_resources(&skill.dir);
        content.push_str(&render_resources_section(&resources));
        Ok(content)
    }

    /// List every skill document and its indexed resources
    ///
    /// A skill whose document cannot be read is logged and left out along
    /// with its resources; the rest of the library is still listed.
    pub fn list_resources(&self) -> Vec<ResourceEntry> {
        let mut entries = Vec::new();
        for skill in self.skills() {
            let description = match skill.description() {
                Ok(description) => description,
                Err(e) => {
                    warn!("Skipping resources of skill {}: {}", skill.path, e);
                    continue;
                }
            };

            let uri = skill.uri();
            entries.push(ResourceEntry {
                display_name: display_name(&uri).to_string(),
                description,
                mime_type: MARKDOWN_MIME,
                uri,
            });

            for resource in index_resources(&skill.dir) {
                let uri = build_resource_uri(skill.rel_dir(), &resource.filename);
                entries.push(ResourceEntry {
                    display_name: display_name(&uri).to_string(),
                    description: resource.description,
                    mime_type: MARKDOWN_MIME,
                    uri,
                });
            }
        }
        entries
    }

    /// Read the raw text behind a `skill://` URI
    pub fn read_resource(&self, uri: Option<&str>) -> Result<String> {
        let uri = uri
            .filter(|u| !u.trim().is_empty())
            .ok_or(SkillError::MissingUri)?;
        let path = resolve_uri(&self.root, uri)?;
        fs::read_to_string(&path).map_err(|source| SkillError::ResourceRead {
            uri: uri.to_string(),
            path,
            source,
        })
    }
}
