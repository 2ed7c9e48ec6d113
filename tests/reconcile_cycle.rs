use burnerlist::config::Config;
use burnerlist::engine::{DomainSet, Reconciler, SourceFetcher, normalize};
use burnerlist::storage::FileStore;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

// --- Mocks ---

const SOURCE_URL: &str = "mock://source";
const ALLOW_URL: &str = "mock://allowlist";

/// Serves canned raw lines per URL; unknown URLs behave like a failed
/// fetch and yield an empty set.
struct MockFetcher {
    responses: HashMap<String, Vec<&'static str>>,
}

impl MockFetcher {
    fn new(responses: &[(&str, &[&'static str])]) -> Arc<Self> {
        Arc::new(Self {
            responses: responses
                .iter()
                .map(|(url, lines)| (url.to_string(), lines.to_vec()))
                .collect(),
        })
    }
}

#[async_trait::async_trait]
impl SourceFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> DomainSet {
        match self.responses.get(url) {
            Some(lines) => lines.iter().filter_map(|line| normalize(line)).collect(),
            None => DomainSet::default(),
        }
    }
}

fn test_config(allowlist: bool) -> Config {
    let mut config = Config::default();
    config.sources = HashMap::from([("mock".to_string(), SOURCE_URL.to_string())]);
    config.allowlist_url = allowlist.then(|| ALLOW_URL.to_string());
    config
}

fn reconciler(dir: &TempDir, config: Config, fetcher: Arc<MockFetcher>) -> Reconciler {
    let store = Arc::new(FileStore::new(dir.path().join("output.txt")));
    Reconciler::new(config, fetcher, store)
}

fn read_output(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("output.txt")).unwrap()
}

// --- Tests ---

#[tokio::test]
async fn test_first_cycle_populates_file() {
    let dir = TempDir::new().unwrap();
    let fetcher = MockFetcher::new(&[(SOURCE_URL, &["b.com", "a.com", "user@c.com"])]);
    let reconciler = reconciler(&dir, test_config(false), fetcher);

    let added = reconciler.run_cycle().await.unwrap();

    assert_eq!(added, 3);
    assert_eq!(read_output(&dir), "a.com\nb.com\nc.com\n");
}

#[tokio::test]
async fn test_second_identical_cycle_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let fetcher = MockFetcher::new(&[(SOURCE_URL, &["a.com", "b.com"])]);
    let reconciler = reconciler(&dir, test_config(false), fetcher);

    assert_eq!(reconciler.run_cycle().await.unwrap(), 2);
    let first = read_output(&dir);

    assert_eq!(reconciler.run_cycle().await.unwrap(), 0);
    assert_eq!(read_output(&dir), first);
}

#[tokio::test]
async fn test_failed_allowlist_degrades_to_plain_merge() {
    // Persisted {a.com, b.com}, allowlist unreachable, fetched {b.com, c.com}:
    // merge keeps everything and reports one addition.
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("output.txt"), "a.com\nb.com\n").unwrap();

    let fetcher = MockFetcher::new(&[(SOURCE_URL, &["b.com", "c.com"])]);
    let reconciler = reconciler(&dir, test_config(true), fetcher);

    let added = reconciler.run_cycle().await.unwrap();

    assert_eq!(added, 1);
    assert_eq!(read_output(&dir), "a.com\nb.com\nc.com\n");
}

#[tokio::test]
async fn test_allowlist_removal_rewrites_even_on_total_outage() {
    // Persisted {a.com}, allowlist {a.com}, all sources down: the removal
    // alone forces a rewrite, leaving an empty file.
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("output.txt"), "a.com\n").unwrap();

    let fetcher = MockFetcher::new(&[(ALLOW_URL, &["a.com"])]);
    let reconciler = reconciler(&dir, test_config(true), fetcher);

    let added = reconciler.run_cycle().await.unwrap();

    assert_eq!(added, 0);
    assert_eq!(read_output(&dir), "");
}

#[tokio::test]
async fn test_total_outage_preserves_existing_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("output.txt"), "a.com\nb.com\n").unwrap();

    let fetcher = MockFetcher::new(&[]);
    let reconciler = reconciler(&dir, test_config(true), fetcher);

    let added = reconciler.run_cycle().await.unwrap();

    assert_eq!(added, 0);
    assert_eq!(read_output(&dir), "a.com\nb.com\n");
}

#[tokio::test]
async fn test_allowlist_filters_fetched_and_existing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("output.txt"), "old-allowed.com\nkeep.com\n").unwrap();

    let fetcher = MockFetcher::new(&[
        (SOURCE_URL, &["new-allowed.com", "fresh.com"]),
        (ALLOW_URL, &["old-allowed.com", "new-allowed.com"]),
    ]);
    let reconciler = reconciler(&dir, test_config(true), fetcher);

    let added = reconciler.run_cycle().await.unwrap();

    assert_eq!(added, 1);
    assert_eq!(read_output(&dir), "fresh.com\nkeep.com\n");
}

#[tokio::test]
async fn test_raw_source_lines_are_normalized_before_merge() {
    let dir = TempDir::new().unwrap();
    let fetcher = MockFetcher::new(&[(
        SOURCE_URL,
        &[
            "# comment",
            "## FREE@MAIL.example.CO.UK  ",
            "User@Tempmail.NET",
            "sub.deep.burner.org",
            "   ",
        ],
    )]);
    let reconciler = reconciler(&dir, test_config(false), fetcher);

    let added = reconciler.run_cycle().await.unwrap();

    assert_eq!(added, 3);
    assert_eq!(read_output(&dir), "burner.org\nco.uk\ntempmail.net\n");
}

#[tokio::test]
async fn test_legacy_file_self_heals() {
    // Entries persisted by an older run get re-normalized on load, and the
    // resulting set difference triggers a rewrite.
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("output.txt"), "Mixed.Case.Example.COM\n").unwrap();

    let fetcher = MockFetcher::new(&[(SOURCE_URL, &["other.net"])]);
    let reconciler = reconciler(&dir, test_config(false), fetcher);

    reconciler.run_cycle().await.unwrap();

    assert_eq!(read_output(&dir), "example.com\nother.net\n");
}
