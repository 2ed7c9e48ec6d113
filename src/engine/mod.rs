mod fetch;
mod normalize;
mod reconcile;
mod traits;

pub use fetch::{HttpFetcher, fetch_many};
pub use normalize::{DomainSet, normalize};
pub use reconcile::{Reconciler, apply_allowlist};
pub use traits::{ListStore, SourceFetcher};
