use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "skillport")]
#[command(version, about = "Serve a directory of Markdown skills to MCP clients")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Skills root directory (defaults to ~/.skillport/skills)
    #[arg(long, global = true)]
    pub skills_dir: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Serve skills over MCP on stdin/stdout (default)
    Serve,

    /// List skill tools with their descriptions
    List,

    /// List skill:// resources
    Resources,

    /// Print a resource by URI
    Read {
        /// e.g. skill://api-design/SKILL.md
        uri: String,
    },

    /// Run a script bundled with a skill
    Run {
        /// Skill tool name or directory name
        skill: String,
        /// Script path relative to the skill directory
        script: String,
        /// Arguments passed to the script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Download a skill document into the skills root
    #[cfg(feature = "remote")]
    Fetch {
        /// URL of a SKILL.md file
        url: String,
        /// Directory name for the installed skill
        #[arg(long)]
        name: Option<String>,
    },

    /// Print the mcpServers entry for an MCP client config file
    ClientConfig {
        /// Server name used as the entry key
        #[arg(long, default_value = "skillport")]
        name: String,
    },
}
