use super::fetch::fetch_many;
use super::normalize::DomainSet;
use super::traits::{ListStore, SourceFetcher};
use crate::config::Config;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Removes allowlisted domains and returns the filtered set with the
/// removal count. An empty allowlist is a no-op, never "block everything".
pub fn apply_allowlist(candidates: &DomainSet, allow: &DomainSet) -> (DomainSet, usize) {
    if candidates.is_empty() || allow.is_empty() {
        return (candidates.clone(), 0);
    }
    let filtered: DomainSet = candidates.difference(allow).cloned().collect();
    let removed = candidates.len() - filtered.len();
    (filtered, removed)
}

/// Runs one fetch-normalize-merge-persist pass against the configured
/// sources and the persisted output file.
pub struct Reconciler {
    config: Config,
    fetcher: Arc<dyn SourceFetcher>,
    store: Arc<dyn ListStore>,
}

impl Reconciler {
    pub fn new(config: Config, fetcher: Arc<dyn SourceFetcher>, store: Arc<dyn ListStore>) -> Self {
        Self {
            config,
            fetcher,
            store,
        }
    }

    /// One refresh cycle. Returns the number of newly added domains.
    ///
    /// Source and allowlist failures degrade gracefully; storage failures
    /// are the only fatal condition and propagate to the caller.
    pub async fn run_cycle(&self) -> Result<usize> {
        let persisted = self.store.load().await?;

        let allowlist = match self.config.allowlist_url() {
            Some(url) => {
                let set = self.fetcher.fetch(url).await;
                if set.is_empty() {
                    warn!("Allowlist retrieval returned no entries; verification skipped.");
                }
                set
            }
            None => DomainSet::default(),
        };

        let (sanitized_existing, removed_existing) = apply_allowlist(&persisted, &allowlist);
        if removed_existing > 0 {
            info!(
                "Removed {} allowlisted domains from existing output.",
                removed_existing
            );
        }

        let fetched = fetch_many(
            self.fetcher.as_ref(),
            &self.config.get_sources_sorted(),
            self.config.fetch.concurrent_downloads,
        )
        .await;
        let (filtered_fetched, skipped) = apply_allowlist(&fetched, &allowlist);
        if skipped > 0 {
            info!(
                "Skipped {} domains because they are explicitly allowlisted.",
                skipped
            );
        }

        // A total outage must never wipe good data with an empty result.
        if filtered_fetched.is_empty() && removed_existing == 0 {
            info!("No domains fetched; output file unchanged.");
            return Ok(0);
        }

        let added = filtered_fetched.difference(&sanitized_existing).count();

        let mut merged = sanitized_existing;
        merged.extend(filtered_fetched);

        if merged != persisted {
            self.store.store(&merged).await?;
            if added > 0 {
                info!("Added {} new disposable domains.", added);
            } else if removed_existing > 0 {
                info!("Output refreshed after removing allowlisted domains.");
            }
        } else {
            info!("No new domains detected.");
        }

        Ok(added)
    }
}
