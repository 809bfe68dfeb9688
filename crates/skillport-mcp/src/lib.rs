//! `Skillport` MCP Server Library
//!
//! Exposes a directory of Markdown skills over MCP (Model Context Protocol).
//!
//! ## Features
//!
//! - One tool per skill, returning the skill document plus its resource index
//! - Skill documents and `resources/*.md` files as `skill://` resources
//! - Optional `run_skill_script` tool, off unless enabled in configuration
//! - stdio transport via the rmcp SDK

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod config;
pub mod error;
pub mod server;

pub use config::{ScriptsConfig, ServerConfig};
pub use error::ServerError;
pub use server::{SkillServer, RUN_SCRIPT_TOOL};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{ScriptsConfig, ServerConfig, ServerError, SkillServer};
}
