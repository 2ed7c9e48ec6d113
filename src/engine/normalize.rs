use rustc_hash::FxHashSet;

/// Deduplicated set of canonical domains.
pub type DomainSet = FxHashSet<Box<str>>;

/// Normalizes one raw list entry into a canonical lowercase domain.
///
/// Sources mix plain domain lists, comment-annotated lists and full email
/// addresses; everything is reduced to at most the last two dot-separated
/// labels. The two-label truncation is a deliberate approximation of a
/// registrable domain, not a public-suffix lookup, and consumers depend on
/// the exact rule (`mail.example.co.uk` becomes `co.uk`).
pub fn normalize(raw: &str) -> Option<Box<str>> {
    let mut entry = raw.trim().to_string();
    if entry.is_empty() {
        return None;
    }

    // Some sources prefix annotated entries with "## "; drop the marker
    // wherever it appears.
    if entry.contains("## ") {
        entry = entry.replace("## ", "");
    }
    if entry.starts_with('#') {
        return None;
    }
    if let Some(idx) = entry.find('#') {
        entry.truncate(idx);
        entry = entry.trim().to_string();
        if entry.is_empty() {
            return None;
        }
    }

    // Email address: keep the host part after the first '@'.
    if let Some(idx) = entry.find('@') {
        entry = entry[idx + 1..].to_string();
    }

    // Drop empty segments from stray leading/trailing/double dots.
    let labels: Vec<&str> = entry.split('.').filter(|s| !s.is_empty()).collect();
    if labels.is_empty() {
        return None;
    }

    let tail = if labels.len() > 2 {
        &labels[labels.len() - 2..]
    } else {
        &labels[..]
    };

    Some(tail.join(".").to_lowercase().into_boxed_str())
}
