//! Quote merge and dedup rules.
//!
//! Both rules compare quotes by `text` only. Category is ignored, so
//! two quotes with the same text but different categories count as one.
//!
//! Known limitations of the remote merge: there are no timestamps or
//! versions, so a local quote that happens to share its text with an
//! unrelated remote item is silently replaced by the remote one, and two
//! local quotes with identical text but different categories are never
//! reconciled with each other.

use std::collections::HashSet;

use super::quote::Quote;

/// Combine remote and local quotes, remote winning on equal text.
///
/// The result is the remote list in its original order, followed by
/// every local quote whose text matches no remote text, in local order.
/// Local duplicates are kept as-is; only the remote list decides what
/// gets dropped. Applying the merge again with the same remote list is a
/// no-op.
pub fn merge(remote: &[Quote], local: &[Quote]) -> Vec<Quote> {
    let remote_texts: HashSet<&str> = remote.iter().map(|q| q.text.as_str()).collect();

    let mut merged = Vec::with_capacity(remote.len() + local.len());
    merged.extend_from_slice(remote);
    merged.extend(
        local
            .iter()
            .filter(|q| !remote_texts.contains(q.text.as_str()))
            .cloned(),
    );
    merged
}

/// Append `incoming` quotes whose text is not already present.
///
/// Dedup also applies within `incoming`: the first occurrence of a text
/// wins. Returns the number of quotes appended.
pub fn append_new(existing: &mut Vec<Quote>, incoming: impl IntoIterator<Item = Quote>) -> usize {
    let mut known: HashSet<String> = existing.iter().map(|q| q.text.clone()).collect();
    let before = existing.len();

    for quote in incoming {
        if known.insert(quote.text.clone()) {
            existing.push(quote);
        }
    }

    existing.len() - before
}
