//! Completion candidates drawn from the search history

/// Maximum number of suggestions to return
pub const MAX_SUGGESTIONS: usize = 5;

/// History entries that complete the in-progress `query`.
///
/// Matching is a case-insensitive substring test; entries equal to the query
/// (ignoring case) are skipped since they would complete to themselves. The
/// history order is kept and at most [`MAX_SUGGESTIONS`] entries are returned.
pub fn suggestions_for<S: AsRef<str>>(query: &str, history: &[S]) -> Vec<String> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    history
        .iter()
        .map(|entry| entry.as_ref())
        .filter(|entry: &&str| {
            let candidate = entry.to_lowercase();
            candidate.contains(&needle) && candidate != needle
        })
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}
