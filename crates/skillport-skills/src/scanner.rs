//! Recursive discovery of skill documents under a root directory

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::skill::{to_tool_name, SKILL_FILE};

/// Find every `SKILL.md` below `root`, at any depth
///
/// Returns paths relative to `root`, `/`-separated, sorted lexically. A
/// missing root yields an empty list. Unreadable subdirectories are logged
/// and skipped. A `SKILL.md` directly in the root is ignored because it has
/// no skill directory to name it.
pub fn scan_skills(root: &Path) -> Vec<String> {
    let mut found = Vec::new();

    if !root.exists() {
        debug!("Skills directory does not exist: {:?}", root);
        return found;
    }

    if !root.is_dir() {
        warn!("Skills path is not a directory: {:?}", root);
        return found;
    }

    let mut visited = HashSet::new();
    walk(root, &mut Vec::new(), &mut visited, &mut found);
    found.sort();

    debug!("Scanned {} skills under {:?}", found.len(), root);
    found
}

fn walk(
    dir: &Path,
    segments: &mut Vec<String>,
    visited: &mut HashSet<PathBuf>,
    found: &mut Vec<String>,
) {
    // Symlinked directories may loop back on themselves
    if let Ok(canonical) = dir.canonicalize() {
        if !visited.insert(canonical) {
            debug!("Skipping already visited directory {:?}", dir);
            return;
        }
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read skills subdirectory {:?}: {}", dir, e);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read entry in {:?}: {}", dir, e);
                continue;
            }
        };
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if path.is_dir() {
            segments.push(name);
            walk(&path, segments, visited, found);
            segments.pop();
        } else if name == SKILL_FILE {
            if segments.is_empty() {
                debug!("Ignoring {} at the skills root", SKILL_FILE);
                continue;
            }
            found.push(format!("{}/{}", segments.join("/"), SKILL_FILE));
        }
    }
}

/// Group skill paths whose tool names collide
///
/// Only names shared by two or more paths are returned; each list keeps the
/// input order, so with sorted input the first path is the one that wins.
#[must_use]
pub fn tool_name_collisions(paths: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in paths {
        by_name
            .entry(to_tool_name(path))
            .or_default()
            .push(path.clone());
    }
    by_name.retain(|_, paths| paths.len() > 1);
    by_name
}
