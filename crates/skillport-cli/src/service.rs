use crate::config::Config;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use skillport_mcp::{ServerConfig, SkillServer};
use skillport_skills::{ScriptExecutor, ScriptOutput, SkillLibrary};
use std::path::Path;
use tracing::{info, warn};

/// Skillport service - runs one command against the configured skills root
pub struct SkillportService {
    server_config: ServerConfig,
}

impl SkillportService {
    /// Create a service from loaded configuration
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            server_config: config.server_config()?,
        })
    }

    fn library(&self) -> SkillLibrary {
        SkillLibrary::new(&self.server_config.skills_dir)
    }

    /// Serve MCP over stdio until the client disconnects
    pub async fn serve(self) -> Result<()> {
        let skills_dir = &self.server_config.skills_dir;
        if !skills_dir.is_dir() {
            warn!(
                "Skills directory {:?} does not exist; serving an empty library",
                skills_dir
            );
        }

        SkillServer::new(&self.server_config)
            .run_stdio()
            .await
            .context("MCP server failed")
    }

    /// Tab-separated `name<TAB>description` lines for every tool
    pub fn list(&self) -> Vec<String> {
        let listing = self.library().list_tools();
        if listing.skipped > 0 || listing.shadowed > 0 {
            warn!(
                "{} skills skipped as unreadable, {} shadowed by name collisions",
                listing.skipped, listing.shadowed
            );
        }
        listing
            .tools
            .into_iter()
            .map(|tool| format!("{}\t{}", tool.name, tool.description))
            .collect()
    }

    /// `uri<TAB>description` lines for every resource
    pub fn resources(&self) -> Vec<String> {
        self.library()
            .list_resources()
            .into_iter()
            .map(|entry| format!("{}\t{}", entry.uri, entry.description))
            .collect()
    }

    /// Raw text of one resource
    pub fn read(&self, uri: &str) -> Result<String> {
        Ok(self.library().read_resource(Some(uri))?)
    }

    /// Run a skill script directly; the user invoking it is the opt-in
    pub async fn run_script(&self, skill: &str, script: &str, args: &[String]) -> Result<ScriptOutput> {
        let scripts = &self.server_config.scripts;
        let executor = ScriptExecutor::new(&self.server_config.skills_dir)
            .with_shell(scripts.shell.clone())
            .with_timeout(scripts.timeout());
        Ok(executor.execute(skill, script, args).await?)
    }

    /// Install a skill document from a URL
    #[cfg(feature = "remote")]
    pub async fn fetch(&self, url: &str, name: Option<&str>) -> Result<std::path::PathBuf> {
        let path = skillport_skills::remote::install_remote_skill(
            &self.server_config.skills_dir,
            url,
            name,
        )
        .await?;
        info!("Fetched {} into {:?}", url, path);
        Ok(path)
    }

    /// `mcpServers` entry a client application needs to launch this server
    pub fn client_config(&self, server_name: &str) -> Value {
        let command = std::env::current_exe()
            .map(|exe| exe.display().to_string())
            .unwrap_or_else(|_| "skillport".to_string());

        info!("Generating client config for '{}'", server_name);
        client_config_snippet(server_name, &command, &self.server_config.skills_dir)
    }
}

fn client_config_snippet(server_name: &str, command: &str, skills_dir: &Path) -> Value {
    json!({
        "mcpServers": {
            server_name: {
                "command": command,
                "args": ["serve", "--skills-dir", skills_dir.display().to_string()],
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn service_for(dir: &Path) -> SkillportService {
        SkillportService {
            server_config: ServerConfig::new(dir),
        }
    }

    #[test]
    fn test_list_and_read() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("go-testing")).unwrap();
        fs::write(dir.path().join("go-testing/SKILL.md"), "# Go Testing\n").unwrap();
        let service = service_for(dir.path());

        assert_eq!(service.list(), vec!["go_testing\tGo Testing"]);
        assert_eq!(
            service.resources(),
            vec!["skill://go-testing/SKILL.md\tGo Testing"]
        );
        assert_eq!(
            service.read("skill://go-testing/SKILL.md").unwrap(),
            "# Go Testing\n"
        );
        assert!(service.read("skill://../x").is_err());
    }

    #[test]
    fn test_client_config_snippet() {
        let snippet = client_config_snippet(
            "skills",
            "/usr/local/bin/skillport",
            Path::new("/srv/skills"),
        );
        assert_eq!(
            snippet,
            json!({
                "mcpServers": {
                    "skills": {
                        "command": "/usr/local/bin/skillport",
                        "args": ["serve", "--skills-dir", "/srv/skills"]
                    }
                }
            })
        );
    }
}
