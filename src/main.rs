use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use log::{info, warn};
use mac_oui::Oui;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};

use topomap::db;
use topomap::reconcile::{reconcile, Summary};
use topomap::snapshot::Snapshot;
use topomap_migration::{Migrator, MigratorTrait};

#[derive(Clone, Debug, Parser, Serialize, Deserialize)]
struct Config {
    /// Directory watched for device snapshots written by the poller
    #[arg(short, long)]
    spool: Option<String>,

    /// Path and name of database
    #[arg(short, long)]
    database: Option<String>,

    /// Reverse-DNS lookups for learned IP addresses
    #[arg(long)]
    dns: Option<bool>,

    /// Directory where a copy of each snapshot is kept before processing
    #[arg(short, long)]
    archive: Option<String>,

    /// Slack channel notified when never-seen MAC addresses appear
    #[arg(long)]
    slack_channel: Option<String>,

    /// Slack webhook URL for notifications
    #[arg(long)]
    slack_webhook: Option<String>,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start with the toml configuration file.
    let config: Config = Figment::from(Toml::file("topomap.toml"))
        // Override with anything set in environment variables.
        .merge(Env::prefixed("TOPOMAP_"))
        // Override with anything set via flags.
        .merge(Serialized::defaults(Config::parse()))
        .extract()?;

    let level = match config.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    // A spool directory must be configured (typically in `topomap.toml` or
    // TOPOMAP_SPOOL.)
    let spool = match config.spool.as_deref() {
        Some(dir) => PathBuf::from(dir),
        None => {
            eprintln!("\nNo spool directory configured.");
            println!("Usage: topomap --spool <DIRECTORY>\n");
            std::process::exit(1);
        }
    };

    let default_db_name = "topomap.db".to_string();
    let database_name = config.database.as_ref().unwrap_or(&default_db_name);
    let database_url = format!("sqlite://{}?mode=rwc", database_name);

    let db = db::connect(&database_url)
        .await
        .context("failed to open database")?;
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;
    db::ensure_unknown_oui(&db)
        .await
        .context("failed to seed the sentinel vendor row")?;

    // Load the bundled vendor database for MAC prefix lookups.
    let oui_db = match Oui::default() {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("Oui error: {}", e);
            std::process::exit(1)
        }
    };

    info!("watching spool directory {}", spool.display());
    loop {
        if let Err(e) = process_spool(&db, oui_db.clone(), &config, &spool).await {
            warn!("spool pass failed: {}", e);
        }
        tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
    }
}

/// One pass over the spool directory: parse every pending snapshot, archive
/// it if configured, and reconcile each device concurrently.
async fn process_spool(
    db: &DatabaseConnection,
    oui_db: Arc<Oui>,
    config: &Config,
    spool: &Path,
) -> Result<()> {
    let mut handles = Vec::new();
    for entry in fs::read_dir(spool).context("failed to read spool directory")? {
        let path = entry?.path();
        if path.extension().map(|ext| ext == "json") != Some(true) {
            continue;
        }
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("unreadable snapshot {}: {}", path.display(), e);
                continue;
            }
        };
        let snapshot: Snapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("unparseable snapshot {}: {}", path.display(), e);
                let _ = fs::rename(&path, path.with_extension("bad"));
                continue;
            }
        };
        if let Some(archive) = config.archive.as_deref() {
            archive_snapshot(archive, &snapshot, &raw);
        }
        if let Err(e) = fs::remove_file(&path) {
            warn!("failed to remove {}: {}", path.display(), e);
            continue;
        }

        let task_db = db.clone();
        let task_oui = oui_db.clone();
        let dns = config.dns.unwrap_or(true);
        handles.push(tokio::spawn(async move {
            reconcile(&task_db, Some(task_oui.as_ref()), &snapshot, dns).await
        }));
    }

    for handle in handles {
        match handle.await {
            Ok(Ok(summary)) => {
                info!(
                    "reconciled host {}: {} interfaces, {} vlans, {} macs ({} new), {} bindings",
                    summary.hostname,
                    summary.interfaces,
                    summary.vlans,
                    summary.macs,
                    summary.new_macs.len(),
                    summary.mac_ips
                );
                if !summary.new_macs.is_empty() {
                    notify_new_macs(config, &summary).await;
                }
            }
            Ok(Err(e)) => warn!("reconcile failed: {}", e),
            Err(e) => warn!("reconcile task panicked: {}", e),
        }
    }
    Ok(())
}

/// Keeps a copy of the raw snapshot for diagnosis; failures only log.
fn archive_snapshot(dir: &str, snapshot: &Snapshot, raw: &str) {
    let name = format!(
        "{}-{}.json",
        snapshot.hostname,
        chrono::Utc::now().format("%Y%m%d%H%M%S")
    );
    let path = Path::new(dir).join(name);
    if let Err(e) = fs::write(&path, raw) {
        warn!("failed to archive snapshot to {}: {}", path.display(), e);
    }
}

// Send a simple message to Slack.
#[derive(Debug, Serialize)]
struct SlackMessage {
    channel: String,
    text: String,
}

/// Best-effort Slack note listing MACs first seen this cycle.
async fn notify_new_macs(config: &Config, summary: &Summary) {
    let (channel, webhook) = match (config.slack_channel.as_ref(), config.slack_webhook.as_ref())
    {
        (Some(channel), Some(webhook)) => (channel, webhook),
        _ => return,
    };
    let mut text = vec![format!("New devices behind {}:", summary.hostname)];
    for mac in &summary.new_macs {
        text.push(format!(" - MAC: {}", mac));
    }
    let message = SlackMessage {
        channel: channel.to_string(),
        text: text.join("\n"),
    };
    let client = reqwest::Client::new();
    if let Err(e) = client.post(webhook).json(&message).send().await {
        warn!("slack notification failed: {}", e);
    }
}
