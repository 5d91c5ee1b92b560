//! Gallery Plus CLI - media listing, thumbnails and metadata from the terminal.
//!
//! Hosts the Gallery Plus core the way an app shell would: every command
//! prints the same JSON a host would receive.
//!
//! # Usage
//!
//! ```bash
//! # Check library access
//! gallery-plus permissions
//!
//! # Newest 20 images with their dominant color
//! gallery-plus list --type image --limit 20 --base-color
//!
//! # One item with a readable path
//! gallery-plus get "2024/IMG_0042.jpg" --details --path
//!
//! # Pick files or a folder instead of using the library
//! gallery-plus --pick list --jsonl
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Gallery Plus - media gallery access from the command line.
#[derive(Parser, Debug)]
#[command(name = "gallery-plus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Media library directory (defaults to `library.root` from config)
    #[arg(long, global = true, env = "GALLERY_PLUS_LIBRARY")]
    library: Option<PathBuf>,

    /// Pick files or a folder interactively instead of using the library
    #[arg(long, global = true)]
    pick: bool,

    /// Write one JSON object per line
    #[arg(long, global = true)]
    jsonl: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Report (or request) access to the media source
    Permissions(cli::permissions::PermissionsArgs),

    /// List a page of media
    List(cli::list::ListArgs),

    /// Resolve a single item by id
    Get(cli::get::GetArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match gallery_plus_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `gallery-plus config path`."
            );
            gallery_plus_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Gallery Plus v{}", gallery_plus_core::VERSION);

    let host = cli::HostOptions {
        library: cli.library,
        pick: cli.pick,
        jsonl: cli.jsonl,
        pretty: cli.pretty,
    };

    match cli.command {
        Commands::Permissions(args) => cli::permissions::execute(args, config, &host).await,
        Commands::List(args) => cli::list::execute(args, config, &host).await,
        Commands::Get(args) => cli::get::execute(args, config, &host).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gallery-plus",
            "list",
            "--type",
            "image",
            "--limit",
            "2",
            "--pick",
            "--jsonl",
        ])
        .unwrap();
        assert!(cli.pick);
        assert!(cli.jsonl);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_get_requires_id() {
        assert!(Cli::try_parse_from(["gallery-plus", "get"]).is_err());
        let cli = Cli::try_parse_from(["gallery-plus", "get", "a/b.jpg", "--path"]).unwrap();
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.id, "a/b.jpg");
                assert!(args.path);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
