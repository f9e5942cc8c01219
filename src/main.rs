//! cuesync - keep VirtualDJ cue points safe across moves, rescans and machines.
//!
//! VirtualDJ stores every song's cue points, tags and analysis in a
//! `database.xml` catalog keyed by file path. Moving a folder or rebuilding
//! the catalog loses that work. cuesync keeps a memo of every song it has
//! seen, rewrites catalog paths after files move and can reconcile the
//! catalog with a copy shared through a git repository.

use clap::{ArgAction, CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use cuesync::config::Config;
use std::error::Error;
use std::io;

mod cli;

#[derive(Parser)]
#[command(name = "cuesync")]
#[command(about = "Reconcile VirtualDJ catalogs with a memo and a shared copy")]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize cuesync configuration
    Init,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Sync the catalog with the memo, the music folder and a shared copy
    Sync {
        /// Music folder to rescan (defaults to current directory)
        #[arg(default_value = ".")]
        root: String,
        /// Git working copy holding the shared catalog
        #[arg(short, long)]
        shared: Option<String>,
        /// Catalog file (defaults to VirtualDJ's location for the folder)
        #[arg(short, long)]
        catalog: Option<String>,
        /// Memo file (defaults to memo.json in the config directory)
        #[arg(short, long)]
        memo: Option<String>,
    },
    /// Collapse songs that share a file name and size into one
    Cleandb {
        /// Music folder whose songs are checked (defaults to current directory)
        #[arg(default_value = ".")]
        root: String,
        /// Catalog file (defaults to VirtualDJ's location for the folder)
        #[arg(short, long)]
        catalog: Option<String>,
        /// Show what would be removed without writing the catalog
        #[arg(long)]
        dry_run: bool,
        /// Write the cleaned catalog without asking
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new([
            "catalog_path",
            "memo_path",
            "extensions",
            "shared_remote",
            "shared_branch",
            "shared_file",
            "log_file",
        ]))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_file = Config::load()
        .ok()
        .and_then(|config| config.resolve_log_file());
    cuesync::logging::init(cli.verbose, log_file.as_deref())?;

    match cli.command {
        Commands::Init => {
            cli::init::handle_init()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        Commands::Sync {
            root,
            shared,
            catalog,
            memo,
        } => {
            cli::sync::handle_sync(
                &root,
                shared.as_deref(),
                catalog.as_deref(),
                memo.as_deref(),
            )?;
        }
        Commands::Cleandb {
            root,
            catalog,
            dry_run,
            yes,
        } => {
            cli::cleandb::handle_cleandb(&root, catalog.as_deref(), dry_run, yes)?;
        }
    }

    Ok(())
}
