//! Configuration types for the skill server

use serde::Deserialize;
use skillport_skills::ScriptExecutor;
use std::path::PathBuf;
use std::time::Duration;

/// Helper script settings
///
/// `enabled` is the user's opt-in for running scripts at all; the executor
/// itself never checks it.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScriptsConfig {
    /// Expose the script tool and allow scripts to run
    #[serde(default)]
    pub enabled: bool,

    /// Shell interpreter used to run scripts
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Kill scripts after this many seconds; unset waits forever
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_shell() -> String {
    skillport_skills::script::DEFAULT_SHELL.to_string()
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            shell: default_shell(),
            timeout_secs: None,
        }
    }
}

impl ScriptsConfig {
    /// Script timeout, if configured
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Build an executor for `skills_dir`, or `None` when scripts are disabled
    #[must_use]
    pub fn executor(&self, skills_dir: &std::path::Path) -> Option<ScriptExecutor> {
        self.enabled.then(|| {
            ScriptExecutor::new(skills_dir)
                .with_shell(self.shell.clone())
                .with_timeout(self.timeout())
        })
    }
}

/// Skill server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Skills root directory
    pub skills_dir: PathBuf,

    /// Helper script settings
    pub scripts: ScriptsConfig,
}

impl ServerConfig {
    /// Configuration with scripts disabled
    pub fn new(skills_dir: impl Into<PathBuf>) -> Self {
        Self {
            skills_dir: skills_dir.into(),
            scripts: ScriptsConfig::default(),
        }
    }

    /// Replace the script settings
    #[must_use]
    pub fn with_scripts(mut self, scripts: ScriptsConfig) -> Self {
        self.scripts = scripts;
        self
    }
}
