//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// pamvault - store and reveal secrets in an Okta PAM team vault
#[derive(Parser, Debug)]
#[command(name = "pamvault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in, store a sample secret and reveal it again
    Demo(DemoArgs),

    /// Show the vault's encryption key
    Jwks(JwksArgs),

    /// Create a secret
    Create(CreateArgs),

    /// Replace the contents of a secret
    Update(UpdateArgs),

    /// Reveal a secret's plaintext
    Reveal(RevealArgs),

    /// Create a secret folder
    Folder(FolderArgs),

    /// Copy HashiCorp Vault KV v2 engines into the vault
    Migrate(MigrateArgs),
}

pub const SAMPLE_PAYLOAD: &str = r#"{"foo":"bar","baz":"bop"}"#;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// JSON payload to store
    #[arg(long, default_value = SAMPLE_PAYLOAD)]
    pub payload: String,
}

#[derive(Args, Debug)]
pub struct JwksArgs {
    /// Output the key as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// JSON payload to store
    #[arg(long)]
    pub payload: String,

    /// Secret name (random 10 characters if omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Parent folder id (defaults to OKTAPAM_PARENT_SECRET_FOLDER_ID)
    #[arg(long)]
    pub folder: Option<String>,

    /// Secret description (defaults to OKTAPAM_SECRET_DESCRIPTION)
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Id of the secret to update
    pub secret_id: String,

    /// JSON payload to store
    #[arg(long)]
    pub payload: String,

    /// Secret name
    #[arg(long)]
    pub name: String,

    /// Parent folder id (defaults to OKTAPAM_PARENT_SECRET_FOLDER_ID)
    #[arg(long)]
    pub folder: Option<String>,

    /// Secret description (defaults to OKTAPAM_SECRET_DESCRIPTION)
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct RevealArgs {
    /// Id of the secret to reveal
    pub secret_id: String,

    /// Print the plaintext exactly as stored
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct FolderArgs {
    /// Folder name
    pub name: String,

    /// Parent folder id (defaults to OKTAPAM_PARENT_SECRET_FOLDER_ID)
    #[arg(long)]
    pub parent: Option<String>,

    /// Folder description (defaults to OKTAPAM_SECRET_DESCRIPTION)
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// KV v2 engine mount to migrate (repeatable)
    #[arg(long = "engine", required = true)]
    pub engines: Vec<String>,

    /// Description for created folders and secrets
    #[arg(long)]
    pub description: Option<String>,

    /// List what would be migrated without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
