use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use burnerlist::config::Config;
use burnerlist::engine::{HttpFetcher, Reconciler};
use burnerlist::init::setup_logging;
use burnerlist::scheduler;
use burnerlist::storage::{FileStore, resolve_output_path};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args().nth(1).unwrap_or("config.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).await?
    } else {
        Config::default()
    };

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting burnerlist...");

    if !std::path::Path::new(&config_path).exists() {
        info!("Config file not found, using defaults.");
    }

    // 3. Build Fetcher & Store
    let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout())?);
    let output_path = resolve_output_path(&config.output_file)?;
    info!("Writing domain list to {}", output_path.display());
    let store = Arc::new(FileStore::new(output_path));

    // 4. Build Reconciler
    let interval = config.refresh_interval();
    let reconciler = Reconciler::new(config, fetcher, store);

    // 5. Spawn Scheduler
    let cancel = CancellationToken::new();
    let loop_cancel = cancel.child_token();
    let mut handle =
        tokio::spawn(async move { scheduler::run(&reconciler, interval, loop_cancel).await });

    // 6. Graceful Shutdown
    tokio::select! {
        result = &mut handle => {
            // The loop only returns early on a storage failure.
            return result?;
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received.");
        }
    }

    // Let an in-flight cycle finish its write before exiting.
    cancel.cancel();
    handle.await??;
    Ok(())
}
