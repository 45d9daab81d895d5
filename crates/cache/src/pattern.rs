//! Glob-style key pattern matching for cache invalidation.
//!
//! Supports `*` as a wildcard matching any (possibly empty) run of
//! characters, anywhere in the pattern. This mirrors the key patterns a
//! Redis `KEYS`/`SCAN`-based backend would accept, so the in-memory
//! store and a future remote store agree on invalidation semantics.

/// Whether `key` matches the glob `pattern`.
///
/// A pattern without `*` must equal the key exactly. Literal runs
/// between wildcards must appear in order and without overlap.
pub fn matches(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let first = parts[0];
    let last = parts[parts.len() - 1];

    if !key.starts_with(first) {
        return false;
    }
    let mut pos = first.len();

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match key[pos..].find(part) {
            Some(idx) => pos += idx + part.len(),
            None => return false,
        }
    }

    if last.is_empty() {
        return true;
    }

    // The suffix must fit after everything already consumed.
    key.len() >= pos + last.len() && key.ends_with(last)
}
