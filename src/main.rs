// Entrypoint for the gist-manager CLI.
// - Parses arguments, loads configuration and sets up logging.
// - Builds an API client and a terminal host, then runs one command or
//   the interactive menu.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gist_manager::api::ApiClient;
use gist_manager::auth::{SessionTokenProvider, TokenSource};
use gist_manager::commands::{Command, GistCommands, Outcome};
use gist_manager::config::Config;
use gist_manager::ui::{main_menu, LineRange, TerminalHost};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gist-manager")]
#[command(author, version, about = "List, open, create, update and delete GitHub Gists")]
struct Cli {
    /// Configuration file (default: ~/.config/gist-manager/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// File to treat as the active editor (used by create and update)
    #[arg(long, value_name = "PATH", global = true)]
    file: Option<PathBuf>,

    /// Line range of --file to use as the selection, e.g. 10:24
    #[arg(long, value_name = "START:END", requires = "file", global = true)]
    lines: Option<LineRange>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a Gist and open one of its files
    List,
    /// Create a Gist from --file, a selection or typed content
    Create,
    /// Update a Gist file from the active document
    Update,
    /// Delete a Gist
    Delete,
    /// Interactive menu (default)
    Menu,
    /// Store a GitHub personal access token
    Login,
    /// Remove the stored token
    Logout,
    /// Show where the token comes from
    Status,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(Outcome::Failed) => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so they never mix with prompts on stdout.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "gist_manager=debug"
    } else {
        "gist_manager=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<Outcome> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().context("Failed to load configuration")?,
    };
    debug!(base_url = %config.api.base_url, "configuration loaded");

    let tokens = SessionTokenProvider::from_env(true);
    let command = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Login => {
            if tokens.login()?.is_none() {
                println!("Login cancelled.");
                return Ok(Outcome::Cancelled);
            }
            println!("Token stored in {}", tokens.token_path().display());
            return Ok(Outcome::Succeeded);
        }
        Commands::Logout => {
            if tokens.logout()? {
                println!("Removed stored token.");
            } else {
                println!("No stored token found.");
            }
            return Ok(Outcome::Succeeded);
        }
        Commands::Status => {
            match tokens.source() {
                TokenSource::Environment(var) => println!("Using token from ${var}"),
                TokenSource::Stored(path) => println!("Using token stored in {}", path.display()),
                TokenSource::Missing => println!("No token found. Run 'gist-manager login'."),
            }
            println!("API: {}", config.api.base_url);
            return Ok(Outcome::Succeeded);
        }
        Commands::List => Some(Command::ListAndOpen),
        Commands::Create => Some(Command::Create),
        Commands::Update => Some(Command::Update),
        Commands::Delete => Some(Command::Delete),
        Commands::Menu => None,
    };

    let api = ApiClient::new(&config.api, tokens).context("Failed to build HTTP client")?;
    // Prompt for a token now; a prompt under the spinner would be garbled.
    if api.tokens().ensure_session()?.is_none() {
        return Ok(Outcome::Cancelled);
    }
    let mut host = TerminalHost::new(&config);
    if let Some(path) = cli.file {
        host.open_file(path, cli.lines);
    }
    let mut commands = GistCommands::new(api, host);

    match command {
        Some(command) => Ok(commands.run(command)),
        None => {
            main_menu(&mut commands)?;
            Ok(Outcome::Succeeded)
        }
    }
}
