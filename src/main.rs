//! CLI entry point: resolves and prints the backup locations for one user.

use anyhow::Result;
use autobackup_locator::{paths, BackupLocator, FileSettingsStore, SystemEnvironment};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file
    #[arg(short, long, value_name = "FILE", default_value = "autobackup.toml")]
    settings: PathBuf,

    /// User the backup tree belongs to (defaults to the current user)
    #[arg(short, long)]
    username: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let username = args
        .username
        .or_else(|| std::env::var("USERNAME").ok())
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "unknown".to_string());

    let store = FileSettingsStore::new(&args.settings);
    let mut locator = BackupLocator::new(username, store, SystemEnvironment);
    locator.on_information(|message| eprintln!("warning: {message}"));

    let resolved = locator.resolve_backup_paths()?;
    println!("user root:       {}", resolved.user_root.display());
    println!("user and server: {}", resolved.user_and_server.display());

    match paths::last_backup_folder(&resolved.user_and_server)? {
        Some(latest) => println!("latest backup:   {}", latest.display()),
        None => println!("latest backup:   (none found)"),
    }

    Ok(())
}
