use super::normalize::{DomainSet, normalize};
use super::traits::SourceFetcher;
use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use reqwest::Client;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::io::StreamReader;
use tracing::{info, warn};

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("burnerlist/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> DomainSet {
        let mut domains = DomainSet::default();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status());
        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("Unable to load {}: {}", url, e);
                return domains;
            }
        };

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(std::io::Error::other));
        let reader = StreamReader::new(stream);
        // Split on raw newlines and decode each line lossily so a stray
        // non-UTF-8 byte drops characters, not the whole source.
        let mut lines = BufReader::new(reader).split(b'\n');

        loop {
            match lines.next_segment().await {
                Ok(Some(line)) => {
                    if let Some(domain) = normalize(&String::from_utf8_lossy(&line)) {
                        domains.insert(domain);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    // Keep whatever was parsed before the stream broke.
                    warn!("Unable to load {}: {}", url, e);
                    break;
                }
            }
        }

        domains
    }
}

/// Unions every configured source into one set. Individual source failures
/// contribute nothing; they never abort the run.
pub async fn fetch_many(
    fetcher: &dyn SourceFetcher,
    sources: &[(String, String)],
    concurrent_downloads: usize,
) -> DomainSet {
    let tasks: Vec<_> = sources
        .iter()
        .map(|(name, url)| async move {
            info!("Fetching source '{}' from {}", name, url);
            let set = fetcher.fetch(url).await;
            info!("Collected {} domains from '{}'", set.len(), name);
            set
        })
        .collect();

    let results: Vec<DomainSet> = stream::iter(tasks)
        .buffer_unordered(concurrent_downloads.max(1))
        .collect()
        .await;

    let mut merged = DomainSet::default();
    for set in results {
        merged.extend(set);
    }
    merged
}
