use crate::engine::Reconciler;
use anyhow::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs refresh cycles forever at a fixed interval until cancelled.
///
/// The first cycle runs immediately. Cancellation is observed between
/// cycles, so an in-flight cycle always completes its write before the
/// loop exits. Storage errors from a cycle propagate and end the loop.
pub async fn run(
    reconciler: &Reconciler,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            // Always prefer an already-requested stop over starting a cycle.
            biased;
            _ = cancel.cancelled() => {
                info!("Monitoring stopped.");
                return Ok(());
            }
            // The first tick completes immediately
            _ = ticker.tick() => {}
        }

        reconciler.run_cycle().await?;
        info!("Next check in {} seconds.", interval.as_secs());
    }
}
