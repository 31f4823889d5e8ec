//! persist - inspect and edit persist-kit stores
//!
//! Preferences live in a JSON file under the platform data directory; secrets
//! live in the OS keychain under the configured service name.

use clap::Parser;
use std::io;
use std::sync::Arc;
use tracing::{debug, Level};

use persist_cli::{run_prefs, run_secret, Args, Command};
use persist_core::{FilePreferenceStore, KeychainStore, PersistConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let config_path = match args.config {
        Some(path) => path,
        None => PersistConfig::default_path()?,
    };
    let config = PersistConfig::load_or_default(&config_path)
        .map_err(|e| format!("Failed to load config {}: {}", config_path.display(), e))?;
    debug!("Using config {}", config_path.display());

    let mut stdout = io::stdout().lock();

    match args.command {
        Command::Prefs(command) => {
            let store = FilePreferenceStore::from_config(&config)
                .map_err(|e| format!("Failed to open preferences: {}", e))?;
            debug!("Preferences file {}", store.path().display());
            run_prefs(Arc::new(store), command, &mut stdout)?;
        }
        Command::Secret(command) => {
            let store = KeychainStore::from_config(&config);
            run_secret(Arc::new(store), command, &mut stdout)?;
        }
    }

    Ok(())
}
