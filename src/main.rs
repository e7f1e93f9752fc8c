use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use trailhead::app::{App, AppEvent};
use trailhead::config::Config;
use trailhead::page::Page;
use trailhead::preferences::PreferenceStore;
use trailhead::storage::{Database, DatabaseError};
use trailhead::ui;

/// Get the config directory path (~/.config/trailhead/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("trailhead"))
}

#[derive(Parser, Debug)]
#[command(name = "trailhead", version, about = "Browse hiking trails in the terminal")]
struct Args {
    /// Page to open at startup
    #[arg(long, value_enum)]
    page: Option<Page>,

    /// Trail data location: an http(s) URL or a file path
    #[arg(long, value_name = "URL|PATH")]
    data: Option<String>,

    /// Preference database path
    #[arg(long, value_name = "PATH")]
    prefs: Option<PathBuf>,

    /// Clear saved filters, favorites and checklist state, then exit
    #[arg(long)]
    reset_prefs: bool,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not garble the alternate screen when redirected.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        tracing::info!(path = %config_dir.display(), "Created config directory");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(data) = args.data {
        config.data_location = Some(data);
    }
    if let Some(page) = args.page {
        config.default_page = page;
    }

    let prefs_path = args.prefs.unwrap_or_else(|| config_dir.join("prefs.db"));
    let prefs_path_str = prefs_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in preferences path"))?;
    let db = match Database::open(prefs_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of trailhead appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open preferences: {}", e));
        }
    };
    let mut prefs = PreferenceStore::load(db)
        .await
        .context("Failed to read preferences")?;

    if args.reset_prefs {
        prefs.reset().await.context("Failed to reset preferences")?;
        println!("Preferences reset.");
        return Ok(());
    }

    let start_page = config.default_page;
    let mut app = App::new(&config, prefs).context("Failed to create application")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    app.show_page(start_page, &event_tx);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
