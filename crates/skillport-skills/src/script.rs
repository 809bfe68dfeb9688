//! Execution of helper scripts bundled with a skill
//!
//! Only files inside the resolved skill directory can be targeted. What the
//! script does once started is not restricted; callers gate whether scripts
//! run at all.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Result, SkillError};
use crate::scanner::scan_skills;
use crate::skill::{normalize_name, Skill};

/// Default shell interpreter
#[cfg(not(windows))]
pub const DEFAULT_SHELL: &str = "sh";
/// Default shell interpreter
#[cfg(windows)]
pub const DEFAULT_SHELL: &str = "cmd";

/// Captured result of a finished script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    /// Standard output, trimmed
    pub stdout: String,
    /// Standard error, trimmed
    pub stderr: String,
    /// Exit code, 0 when the platform reports none (e.g. killed by a signal)
    pub exit_code: i32,
}

impl ScriptOutput {
    /// Whether the script exited with code 0
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Plain-text rendering for tool results and the CLI
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = format!("Exit code: {}", self.exit_code);
        if !self.stdout.is_empty() {
            text.push_str(&format!("\n\nstdout:\n{}", self.stdout));
        }
        if !self.stderr.is_empty() {
            text.push_str(&format!("\n\nstderr:\n{}", self.stderr));
        }
        text
    }
}

/// Runs skill scripts through a shell interpreter
#[derive(Debug, Clone)]
pub struct ScriptExecutor {
    root: PathBuf,
    shell: String,
    timeout: Option<Duration>,
}

impl ScriptExecutor {
    /// Create an executor for skills under `root` using [`DEFAULT_SHELL`]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            shell: DEFAULT_SHELL.to_string(),
            timeout: None,
        }
    }

    /// Use a different shell interpreter
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Kill scripts that run longer than `timeout`; `None` waits forever
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Find the directory of a skill given its tool name or directory name
    ///
    /// Tries the literal name, then the name with `_` replaced by `-`, then
    /// every scanned skill whose tool name matches. First match wins.
    pub fn resolve_skill_dir(&self, skill: &str) -> Result<PathBuf> {
        let hyphenated = skill.replace('_', "-");
        for candidate in [skill, hyphenated.as_str()] {
            if is_single_segment(candidate) {
                let dir = self.root.join(candidate);
                if dir.is_dir() {
                    debug!("Resolved skill '{}' to {:?}", skill, dir);
                    return Ok(dir);
                }
            }
        }

        let wanted = normalize_name(skill);
        scan_skills(&self.root)
            .into_iter()
            .map(|path| Skill::new(&self.root, path))
            .find(|s| s.tool_name() == wanted)
            .map(|s| {
                debug!("Resolved skill '{}' by tool name to {:?}", skill, s.dir);
                s.dir
            })
            .ok_or_else(|| SkillError::SkillNotFound(skill.to_string()))
    }

    /// Resolve a script path inside `skill_dir`, enforcing containment
    pub fn resolve_script(&self, skill: &str, skill_dir: &Path, script: &str) -> Result<PathBuf> {
        let escape = || SkillError::PathEscape {
            skill: skill.to_string(),
            script: script.to_string(),
        };

        let segments = contained_segments(script).ok_or_else(escape)?;
        if segments.is_empty() {
            return Err(SkillError::ScriptNotFound {
                skill: skill.to_string(),
                script: script.to_string(),
            });
        }

        let base = std::path::absolute(skill_dir)?;
        let resolved = segments.iter().fold(base.clone(), |acc, seg| acc.join(seg));
        if !resolved.starts_with(&base) {
            return Err(escape());
        }

        if !resolved.is_file() {
            return Err(SkillError::ScriptNotFound {
                skill: skill.to_string(),
                script: script.to_string(),
            });
        }

        // A symlink inside the skill may still point elsewhere
        let canonical_base = base.canonicalize()?;
        let canonical = resolved.canonicalize()?;
        if !canonical.starts_with(&canonical_base) {
            return Err(escape());
        }

        Ok(resolved)
    }

    /// Run `script` of `skill` with `args` and capture its output
    ///
    /// The skill directory is the working directory and the environment is
    /// inherited. A non-zero exit is a successful result carrying that code.
    pub async fn execute(&self, skill: &str, script: &str, args: &[String]) -> Result<ScriptOutput> {
        let skill_dir = self.resolve_skill_dir(skill)?;
        let script_path = self.resolve_script(skill, &skill_dir, script)?;

        info!(
            "Running script {:?} for skill '{}' with {} args",
            script_path,
            skill,
            args.len()
        );

        let mut cmd = Command::new(&self.shell);
        #[cfg(windows)]
        cmd.arg("/C");
        cmd.arg(&script_path)
            .args(args)
            .current_dir(&skill_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| SkillError::LaunchFailure {
            script: script.to_string(),
            reason: format!("Failed to spawn '{}': {e}", self.shell),
        })?;

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| SkillError::ScriptTimeout {
                    script: script.to_string(),
                    timeout_secs: timeout.as_secs(),
                })??,
            None => child.wait_with_output().await?,
        };

        let result = ScriptOutput {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            exit_code: output.status.code().unwrap_or(0),
        };

        debug!("Script {:?} exited with {}", script_path, result.exit_code);
        Ok(result)
    }
}

fn is_single_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Normalize a relative script path lexically
///
/// Returns `None` if the path is absolute or any `..` would climb out of the
/// skill directory, including leading ones.
fn contained_segments(script: &str) -> Option<Vec<&std::ffi::OsStr>> {
    let mut segments = Vec::new();
    for component in Path::new(script).components() {
        match component {
            Component::Normal(segment) => segments.push(segment),
            Component::CurDir => {}
            Component::ParentDir => {
                segments.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(segments)
}
