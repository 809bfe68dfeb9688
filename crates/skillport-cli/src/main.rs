mod cli;
mod config;
mod service;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use service::SkillportService;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration, then let flags win
    let mut config = Config::load()?;
    if let Some(dir) = cli.skills_dir {
        config.skills.dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    skillport_logging::init_logging(&config.logging.level)?;

    let service = SkillportService::new(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => service.serve().await?,
        Commands::List => {
            for line in service.list() {
                println!("{line}");
            }
        }
        Commands::Resources => {
            for line in service.resources() {
                println!("{line}");
            }
        }
        Commands::Read { uri } => print!("{}", service.read(&uri)?),
        Commands::Run {
            skill,
            script,
            args,
        } => {
            let output = service.run_script(&skill, &script, &args).await?;
            if !output.stdout.is_empty() {
                println!("{}", output.stdout);
            }
            if !output.stderr.is_empty() {
                eprintln!("{}", output.stderr);
            }
            return Ok(ExitCode::from(u8::try_from(output.exit_code).unwrap_or(1)));
        }
        #[cfg(feature = "remote")]
        Commands::Fetch { url, name } => {
            let path = service.fetch(&url, name.as_deref()).await?;
            println!("{}", path.display());
        }
        Commands::ClientConfig { name } => {
            println!("{}", serde_json::to_string_pretty(&service.client_config(&name))?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
