use crate::engine::{DomainSet, ListStore, normalize};
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resolves a relative output filename to a path next to the executable,
/// so the program can run from any working directory.
pub fn resolve_output_path(filename: &str) -> Result<PathBuf> {
    let path = Path::new(filename);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let exe = std::env::current_exe().context("Failed to locate the current executable")?;
    match exe.parent() {
        Some(dir) => Ok(dir.join(filename)),
        None => Ok(path.to_path_buf()),
    }
}

/// Flat-file store: one lowercase domain per line, sorted, trailing newline
/// per line, replaced wholesale on every write.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ListStore for FileStore {
    async fn load(&self) -> Result<DomainSet> {
        match fs::read_to_string(&self.path).await {
            // Every stored line goes back through the normalizer, so a
            // legacy or hand-edited file self-heals on the next cycle.
            Ok(contents) => Ok(contents.lines().filter_map(normalize).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DomainSet::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    async fn store(&self, domains: &DomainSet) -> Result<()> {
        let mut sorted: Vec<&str> = domains.iter().map(|d| d.as_ref()).collect();
        sorted.sort_unstable();

        let mut contents = String::with_capacity(sorted.iter().map(|d| d.len() + 1).sum());
        for domain in sorted {
            contents.push_str(domain);
            contents.push('\n');
        }

        // Single full-buffer write; completes before returning, so a reader
        // never observes an appended or half-written file.
        fs::write(&self.path, contents)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
