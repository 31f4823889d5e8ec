//! Command-line arguments

use clap::{ArgAction, Parser, Subcommand};
use persist_core::Accessibility;
use std::path::PathBuf;

/// persist - inspect and edit persist-kit stores
#[derive(Parser, Debug)]
#[command(name = "persist")]
#[command(version)]
#[command(about = "Inspect and edit persist-kit secure and preferences stores")]
pub struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "PERSIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Preferences store
    #[command(subcommand)]
    Prefs(PrefsCommand),

    /// Secure store (OS keychain)
    #[command(subcommand)]
    Secret(SecretCommand),
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Print a preference as JSON
    Get { key: String },

    /// Set a preference; `value` is parsed as JSON, otherwise stored as a string
    Set { key: String, value: String },

    /// Remove a preference
    Remove { key: String },

    /// List all preference keys
    List,
}

#[derive(Subcommand, Debug)]
pub enum SecretCommand {
    /// Print a secret
    Get {
        key: String,
        #[arg(long)]
        accessibility: Option<Accessibility>,
    },

    /// Store a secret; prompts with hidden input when `value` is omitted
    Set {
        key: String,
        value: Option<String>,
        #[arg(long)]
        accessibility: Option<Accessibility>,
    },

    /// Remove a secret
    Remove {
        key: String,
        #[arg(long)]
        accessibility: Option<Accessibility>,
    },

    /// Print the raw stored bytes as hex
    Dump {
        key: String,
        #[arg(long)]
        accessibility: Option<Accessibility>,
    },
}
