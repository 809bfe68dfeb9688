//! Error types for skill resolution and execution

use std::path::PathBuf;
use thiserror::Error;

/// Skill resolution errors
#[derive(Debug, Error)]
pub enum SkillError {
    /// No readable skill document maps to the tool name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// No skill directory matches the name by any lookup strategy
    #[error("Skill '{0}' not found")]
    SkillNotFound(String),

    /// Script path is contained in the skill directory but no file exists there
    #[error("Script '{script}' not found in skill '{skill}'")]
    ScriptNotFound {
        /// Skill name as requested
        skill: String,
        /// Script path as requested
        script: String,
    },

    /// Script path resolves outside the skill directory
    #[error("Script path '{script}' escapes the directory of skill '{skill}'")]
    PathEscape {
        /// Skill name as requested
        skill: String,
        /// Script path as requested
        script: String,
    },

    /// The shell interpreter could not be started
    #[error("Failed to launch script '{script}': {reason}")]
    LaunchFailure {
        /// Script path as requested
        script: String,
        /// Underlying spawn error
        reason: String,
    },

    /// Script did not finish within the configured timeout
    #[error("Script '{script}' timed out after {timeout_secs}s")]
    ScriptTimeout {
        /// Script path as requested
        script: String,
        /// Configured timeout in seconds
        timeout_secs: u64,
    },

    /// A resource read was requested without a URI
    #[error("Resource URI is required")]
    MissingUri,

    /// Resource URI has the wrong scheme or escapes the skills root
    #[error("Invalid resource URI '{uri}': {reason}")]
    InvalidUri {
        /// URI as requested
        uri: String,
        /// Why the URI was rejected
        reason: String,
    },

    /// The resolved resource file could not be read
    #[error("Failed to read resource '{uri}' at {path:?}: {source}")]
    ResourceRead {
        /// URI as requested
        uri: String,
        /// Resolved filesystem path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Remote skill download failed
    #[cfg(feature = "remote")]
    #[error("Failed to fetch '{url}': {reason}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Transport or status error
        reason: String,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SkillError>;
