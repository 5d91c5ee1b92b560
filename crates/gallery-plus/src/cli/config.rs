//! The `gallery-plus config` command.

use clap::{Args, Subcommand};
use gallery_plus_core::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,

    /// Show config file path
    Path,

    /// Write a config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);
            tracing::debug!("Library root resolves to {:?}", config.library_root());
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            init_at(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn init_at(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        init_at(&path, false).unwrap();
        let written = Config::load_from(&path).unwrap();
        assert_eq!(written.listing.default_limit, Config::default().listing.default_limit);

        assert!(init_at(&path, false).is_err());
        init_at(&path, true).unwrap();
    }
}
