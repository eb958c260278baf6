//! Lexicon feature extraction.
//!
//! Turns a tokenized sentence into the lexicon hits and integer ids that feed
//! the tagger's lexicon embedding lookup. Pooling the looked-up vectors (mean
//! for the static feature, attention for the dynamic one) happens in the
//! tensor framework, not here.

use serde::Serialize;

use crate::error::Result;
use crate::lexicon::{Lexicon, UNKNOWN_ID};

/// One lexicon hit inside a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexiconMatch {
    /// First token index of the hit.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
    /// The matched entry joined with the lexicon joiner.
    pub text: String,
    /// Lexicon id of the entry.
    pub id: u32,
    /// Source label of the entry.
    pub source: String,
}

/// All lexicon hits of a sentence.
///
/// Start offsets are visited left to right; at each offset the anchored
/// matches come longest first.
///
/// # Errors
/// [`LexitagError::EntryNotRegistered`](crate::LexitagError::EntryNotRegistered)
/// if the trie reports an entry the label map does not know.
///
/// # Examples
/// ```
/// use lexitag_core::lexicon::{sentence_matches, Lexicon};
///
/// let mut lexicon = Lexicon::default();
/// lexicon.insert(&["上", "海"], "LOC");
/// lexicon.insert(&["海", "市"], "LOC");
///
/// let hits = sentence_matches(&lexicon, &["上", "海", "市"]).unwrap();
/// let spans: Vec<_> = hits.iter().map(|m| (m.start, m.end)).collect();
/// assert_eq!(spans, vec![(0, 2), (1, 3)]);
/// ```
pub fn sentence_matches<S: AsRef<str>>(
    lexicon: &Lexicon,
    tokens: &[S],
) -> Result<Vec<LexiconMatch>> {
    let mut matches = Vec::new();
    for start in 0..tokens.len() {
        let rest = &tokens[start..];
        for len in lexicon.matched_prefix_lengths(rest) {
            let entry = &rest[..len];
            let source = lexicon.search_type(entry)?.to_string();
            matches.push(LexiconMatch {
                start,
                end: start + len,
                text: lexicon.key(entry),
                id: lexicon.search_id(entry),
                source,
            });
        }
    }
    Ok(matches)
}

/// Lexicon ids of every hit in the sentence, in [`sentence_matches`] order.
///
/// A sentence without hits yields a single [`UNKNOWN_ID`] so the pooled
/// feature always has at least one row.
pub fn lexicon_ids<S: AsRef<str>>(lexicon: &Lexicon, tokens: &[S]) -> Result<Vec<u32>> {
    let ids: Vec<u32> = sentence_matches(lexicon, tokens)?
        .into_iter()
        .map(|m| m.id)
        .collect();
    if ids.is_empty() {
        Ok(vec![UNKNOWN_ID])
    } else {
        Ok(ids)
    }
}

/// Right-pad every row with `pad` to the length of the longest row.
pub fn pad_batch(rows: &[Vec<u32>], pad: u32) -> Vec<Vec<u32>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            let mut padded = row.clone();
            padded.resize(width, pad);
            padded
        })
        .collect()
}
