//! `Skillport` Skills Core
//!
//! Resolves a directory of Markdown skills into tools and resources.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//!   go-testing/
//!     SKILL.md          -> tool `go_testing`, resource skill://go-testing/SKILL.md
//!     resources/*.md    -> resources skill://go-testing/resources/<file>
//!     scripts/*         -> helper scripts, run on demand
//!   team/api-design/
//!     SKILL.md          -> tool `api_design` (nesting depth is irrelevant)
//! ```
//!
//! Every call re-reads the filesystem; there is no cache to invalidate.

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod description;
pub mod error;
pub mod library;
#[cfg(feature = "remote")]
pub mod remote;
pub mod resource;
pub mod scanner;
pub mod script;
pub mod skill;
pub mod uri;

pub use error::{Result, SkillError};
pub use library::{ResourceEntry, SkillLibrary, ToolInfo, ToolListing};
pub use resource::ResourceInfo;
pub use script::{ScriptExecutor, ScriptOutput};
pub use skill::{to_tool_name, Skill, SKILL_FILE};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{ScriptExecutor, SkillError, SkillLibrary};
}
