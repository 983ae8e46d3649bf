use anyhow::Context;
use clap::Parser;
use eeprom_sync::{
    execute_reconciliation, prepare_reconciliation, read_config, Credentials, GithubSource,
    SyncConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// EEPROM Sync - keep a directory of firmware images in sync with a pinned
/// snapshot of the rpi-eeprom repository
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A user:password string for HTTP basic authentication
    /// (see https://github.com/settings/tokens). Defaults to
    /// GITHUB_USER:GITHUB_AUTH_TOKEN when GITHUB_AUTH_TOKEN is set.
    #[arg(long)]
    github_user_pass: Option<String>,

    /// JSON file overriding repository, path, reference, extension or timeout
    #[arg(long, env = "EEPROM_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the firmware images
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Show what would be fetched and removed without touching the directory
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => read_config(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => SyncConfig::default(),
    };

    let credentials = Credentials::resolve(args.github_user_pass.as_deref())?;
    let source = GithubSource::new(&config, credentials)?;

    info!(
        url = %source.contents_url(),
        dir = %args.dir.display(),
        "Syncing EEPROM files"
    );

    if args.dry_run {
        let plan = prepare_reconciliation(&source, &args.dir, &config).await?;
        for name in &plan.current {
            info!(file = %name, "Up to date");
        }
        for entry in &plan.needs_fetch {
            info!(file = %entry.name, size = entry.size, "Would fetch");
        }
        for orphan in &plan.orphaned {
            info!(file = %orphan.name, "Would remove");
        }
        return Ok(());
    }

    execute_reconciliation(Arc::new(source), &args.dir, &config).await?;

    Ok(())
}
