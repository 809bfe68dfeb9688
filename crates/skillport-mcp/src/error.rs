//! Error types for the skill server

use rmcp::ErrorData;
use skillport_skills::SkillError;
use thiserror::Error;

/// Skill server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failure from skill resolution, resource reads or script execution
    #[error(transparent)]
    Skill(#[from] SkillError),

    /// Tool arguments did not match the tool's schema
    #[error("Invalid parameters for '{tool}': {details}")]
    InvalidParams {
        /// Tool name
        tool: String,
        /// Deserialization error
        details: String,
    },

    /// Transport-level error (stdio setup, peer disconnect)
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<ServerError> for ErrorData {
    fn from(err: ServerError) -> Self {
        let message = err.to_string();
        match err {
            ServerError::Skill(
                SkillError::MissingUri
                | SkillError::InvalidUri { .. }
                | SkillError::PathEscape { .. }
                | SkillError::UnknownTool(_)
                | SkillError::SkillNotFound(_)
                | SkillError::ScriptNotFound { .. },
            )
            | ServerError::InvalidParams { .. } => ErrorData::invalid_params(message, None),
            ServerError::Skill(SkillError::ResourceRead { .. }) => {
                ErrorData::resource_not_found(message, None)
            }
            ServerError::Skill(_) | ServerError::Transport(_) => {
                ErrorData::internal_error(message, None)
            }
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, ServerError>;
