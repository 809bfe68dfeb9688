//! `skill://` resource addressing
//!
//! `skill://<skill-directory>/SKILL.md` names a skill document and
//! `skill://<skill-directory>/resources/<file>.md` one of its resources.
//! `<skill-directory>` is the skill's directory relative to the skills root.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SkillError};
use crate::resource::RESOURCES_DIR;
use crate::skill::{MARKDOWN_EXT, SKILL_FILE};

/// Scheme prefix every resource URI starts with
pub const SKILL_URI_SCHEME: &str = "skill://";

/// Media type of every skill resource
pub const MARKDOWN_MIME: &str = "text/markdown";

/// URI of a skill document
#[must_use]
pub fn build_skill_uri(skill_dir: &str) -> String {
    format!("{SKILL_URI_SCHEME}{skill_dir}/{SKILL_FILE}")
}

/// URI of a resource document of a skill
#[must_use]
pub fn build_resource_uri(skill_dir: &str, filename: &str) -> String {
    format!("{SKILL_URI_SCHEME}{skill_dir}/{RESOURCES_DIR}/{filename}")
}

/// Human-readable name of a URI: scheme and `.md` extension stripped
#[must_use]
pub fn display_name(uri: &str) -> &str {
    let rest = uri.strip_prefix(SKILL_URI_SCHEME).unwrap_or(uri);
    rest.strip_suffix(MARKDOWN_EXT).unwrap_or(rest)
}

/// Resolve a URI to an absolute path inside `root`
///
/// The remainder after the scheme is normalized lexically before anything
/// touches the filesystem; `..` segments that would climb above the root,
/// absolute remainders and empty remainders are all rejected. An existing
/// target is then checked again after following symlinks.
pub fn resolve_uri(root: &Path, uri: &str) -> Result<PathBuf> {
    let invalid = |reason: &str| SkillError::InvalidUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    };

    let rest = uri
        .strip_prefix(SKILL_URI_SCHEME)
        .ok_or_else(|| invalid("expected the skill:// scheme"))?;

    let mut segments: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(rest).components() {
        match component {
            Component::Normal(segment) => segments.push(segment),
            Component::CurDir => {}
            Component::ParentDir => {
                if segments.pop().is_none() {
                    return Err(invalid("path escapes the skills directory"));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("absolute paths are not allowed"));
            }
        }
    }

    if segments.is_empty() {
        return Err(invalid("no path after the scheme"));
    }

    let base = std::path::absolute(root)?;
    let resolved = segments.iter().fold(base.clone(), |acc, seg| acc.join(seg));
    if !resolved.starts_with(&base) {
        return Err(invalid("path escapes the skills directory"));
    }

    // A symlink inside the root may still point elsewhere
    if let Ok(canonical) = resolved.canonicalize() {
        let canonical_base = base.canonicalize()?;
        if !canonical.starts_with(&canonical_base) {
            return Err(invalid("symlink target escapes the skills directory"));
        }
    }

    Ok(resolved)
}
