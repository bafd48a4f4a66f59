//! pamvault CLI - Okta PAM team vault secrets
//!
//! This is the main entry point for the pamvault command-line interface.

mod cli;
mod commands;
mod env;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if let Some(path) = env::load(cli.env_file.as_deref())? {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Demo(args) => commands::demo::run(args).await,
        Commands::Jwks(args) => commands::jwks::run(args).await,
        Commands::Create(args) => commands::secret::create(args).await,
        Commands::Update(args) => commands::secret::update(args).await,
        Commands::Reveal(args) => commands::secret::reveal(args).await,
        Commands::Folder(args) => commands::folder::run(args).await,
        Commands::Migrate(args) => commands::migrate::run(args).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
