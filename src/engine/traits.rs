use super::normalize::DomainSet;
use anyhow::Result;

/// Retrieval of one remote list.
#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetches a URL and returns every normalized domain it yields.
    /// Failures degrade to an empty (or partial) set, never an error.
    async fn fetch(&self, url: &str) -> DomainSet;
}

/// Persistence of the merged list.
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
    /// Loads the persisted set; a missing file is an empty set.
    async fn load(&self) -> Result<DomainSet>;
    /// Replaces the persisted set wholesale.
    async fn store(&self, domains: &DomainSet) -> Result<()>;
}
