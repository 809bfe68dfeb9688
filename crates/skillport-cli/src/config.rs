use anyhow::Context;
use serde::Deserialize;
use skillport_mcp::{ScriptsConfig, ServerConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[skills]
dir = "~/.skillport/skills"  # Or set SKILLPORT_SKILLS_DIR

[scripts]
enabled = false  # Let clients run scripts bundled with skills
shell = "sh"
# timeout_secs = 60

[logging]
level = "info"  # trace, debug, info, warn, error
"#;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SkillsConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub skills: SkillsConfig,
    #[serde(default)]
    pub scripts: ScriptsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Directory holding the global config and default skills: ~/.skillport
    fn home_dir() -> anyhow::Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".skillport"))
            .context("Could not find home directory")
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_dir = Self::home_dir()?;
        let config_path = config_dir.join("skillport.toml");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create {}", config_dir.display()))?;
            eprintln!("Created config directory: {}", config_dir.display());
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            eprintln!("Created default config: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.skillport/skillport.toml (auto-created if missing)
    /// 2. Local override: ./skillport.toml (workspace, optional)
    /// 3. Environment variables: SKILLPORT__SECTION__KEY
    /// 4. SKILLPORT_SKILLS_DIR (highest priority)
    ///
    /// Command-line flags are applied by the caller on top.
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        let mut config_builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("skillport").required(false))
            .add_source(
                config::Environment::with_prefix("SKILLPORT")
                    .prefix_separator("__")
                    .separator("__"),
            );

        if let Ok(dir) = env::var("SKILLPORT_SKILLS_DIR") {
            config_builder = config_builder.set_override("skills.dir", dir)?;
        }

        let config = config_builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from TOML text alone
    #[cfg(test)]
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Resolved skills root, `~` expanded; defaults to ~/.skillport/skills
    pub fn skills_dir(&self) -> anyhow::Result<PathBuf> {
        match self.skills.dir.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(dir) => expand_home(dir),
            None => Ok(Self::home_dir()?.join("skills")),
        }
    }

    /// Server configuration for the resolved skills root
    pub fn server_config(&self) -> anyhow::Result<ServerConfig> {
        Ok(ServerConfig::new(self.skills_dir()?).with_scripts(self.scripts.clone()))
    }
}

fn expand_home(dir: &str) -> anyhow::Result<PathBuf> {
    match dir.strip_prefix("~") {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => {
            let home = dirs::home_dir().context("Could not find home directory")?;
            Ok(home.join(rest.trim_start_matches(['/', '\\'])))
        }
        _ => Ok(Path::new(dir).to_path_buf()),
    }
}
