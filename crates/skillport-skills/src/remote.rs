//! Download of skill documents published over HTTP(S)

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, SkillError};
use crate::skill::{MARKDOWN_EXT, SKILL_FILE};

/// Fetch the raw text of a remote skill document
pub async fn fetch_skill(url: &str) -> Result<String> {
    let fetch_error = |reason: String| SkillError::Fetch {
        url: url.to_string(),
        reason,
    };

    let response = reqwest::get(url)
        .await
        .map_err(|e| fetch_error(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP {status}")));
    }

    response.text().await.map_err(|e| fetch_error(e.to_string()))
}

/// Derive a skill directory name from a document URL
///
/// `.../go-testing/SKILL.md` gives `go-testing`; `.../go-testing.md` gives
/// `go-testing`. Query strings and fragments are ignored.
#[must_use]
pub fn skill_name_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    // Host only, no path
    if segments.len() < 2 {
        return None;
    }
    segments.remove(0);

    let last = segments.pop()?;
    let name = if last.eq_ignore_ascii_case(SKILL_FILE) {
        segments.pop()?
    } else {
        last.strip_suffix(MARKDOWN_EXT).unwrap_or(last)
    };
    (!name.is_empty() && name != "." && name != "..").then(|| name.to_string())
}

/// Download a skill and store it as `<root>/<name>/SKILL.md`
///
/// Returns the written path. `name` defaults to [`skill_name_from_url`].
pub async fn install_remote_skill(root: &Path, url: &str, name: Option<&str>) -> Result<PathBuf> {
    let name = match name {
        Some(name) => name.to_string(),
        None => skill_name_from_url(url).ok_or_else(|| SkillError::Fetch {
            url: url.to_string(),
            reason: "cannot derive a skill name from the URL".to_string(),
        })?,
    };

    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(SkillError::Fetch {
            url: url.to_string(),
            reason: format!("invalid skill name '{name}'"),
        });
    }

    let content = fetch_skill(url).await?;
    let dir = root.join(&name);
    fs::create_dir_all(&dir)?;
    let file = dir.join(SKILL_FILE);
    fs::write(&file, content)?;

    info!("Installed skill '{}' from {} at {:?}", name, url, file);
    Ok(file)
}
