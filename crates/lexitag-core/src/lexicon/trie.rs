//! # Token Trie
//!
//! Prefix tree over token sequences (characters or words). Each edge is
//! labeled by one token and each node records whether the path from the root
//! spells a complete entry.

use std::collections::HashMap;

/// Shortest entry length reported by [`Trie::enumerate_match`].
pub const MIN_MATCH_LEN: usize = 2;

/// A node in the trie.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    /// Children keyed by token.
    children: HashMap<String, TrieNode>,
    /// Whether the path to this node is a complete entry.
    is_entry: bool,
}

impl TrieNode {
    fn new() -> Self {
        Self::default()
    }

    /// Whether the path from the root to this node is a complete entry.
    pub fn is_entry(&self) -> bool {
        self.is_entry
    }

    /// Child reached by `token`, if any.
    pub fn child(&self, token: &str) -> Option<&TrieNode> {
        self.children.get(token)
    }

    fn child_or_insert(&mut self, token: &str) -> &mut TrieNode {
        self.children
            .entry(token.to_string())
            .or_insert_with(TrieNode::new)
    }

    fn count(&self) -> usize {
        1 + self.children.values().map(TrieNode::count).sum::<usize>()
    }
}

/// Prefix tree over token sequences.
#[derive(Debug, Clone, Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token sequence as a complete entry.
    ///
    /// Inserting the same sequence twice is a no-op. The empty sequence marks
    /// the root itself as an entry.
    pub fn insert<S: AsRef<str>>(&mut self, tokens: &[S]) {
        let mut current = &mut self.root;
        for token in tokens {
            current = current.child_or_insert(token.as_ref());
        }
        current.is_entry = true;
    }

    /// Returns true iff `tokens` is a complete entry (not merely a prefix).
    pub fn search<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.walk(tokens).is_some_and(TrieNode::is_entry)
    }

    /// Returns true iff `tokens` is a prefix of at least one entry.
    pub fn starts_with<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.walk(tokens).is_some()
    }

    /// Enumerate the entries anchored at the start of `tokens`.
    ///
    /// Tests the full sequence, then repeatedly drops the last token, down to
    /// [`MIN_MATCH_LEN`] tokens. Matches come out longest first, each joined
    /// with `joiner`. A single-token entry is never reported.
    ///
    /// # Examples
    /// ```
    /// use lexitag_core::lexicon::Trie;
    ///
    /// let mut trie = Trie::new();
    /// trie.insert(&["上海", "市"]);
    /// trie.insert(&["上海", "市", "政府"]);
    ///
    /// let matches = trie.enumerate_match(&["上海", "市", "政府", "工作"], "");
    /// assert_eq!(matches, vec!["上海市政府", "上海市"]);
    /// ```
    pub fn enumerate_match<S: AsRef<str>>(&self, tokens: &[S], joiner: &str) -> Vec<String> {
        self.matched_prefix_lengths(tokens)
            .into_iter()
            .map(|len| join_tokens(&tokens[..len], joiner))
            .collect()
    }

    /// Token lengths of the anchored matches, in [`Trie::enumerate_match`] order.
    pub fn matched_prefix_lengths<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<usize> {
        // Walk once from the root and remember where entries end, instead of
        // re-searching every shrinking prefix.
        let mut ends = Vec::new();
        let mut current = &self.root;
        for (idx, token) in tokens.iter().enumerate() {
            match current.child(token.as_ref()) {
                Some(next) => current = next,
                None => break,
            }
            let len = idx + 1;
            if len >= MIN_MATCH_LEN && current.is_entry {
                ends.push(len);
            }
        }
        ends.reverse();
        ends
    }

    /// Whether nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty() && !self.root.is_entry
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    fn walk<S: AsRef<str>>(&self, tokens: &[S]) -> Option<&TrieNode> {
        let mut current = &self.root;
        for token in tokens {
            current = current.child(token.as_ref())?;
        }
        Some(current)
    }
}

/// Join tokens with `joiner` into a lookup key.
pub(crate) fn join_tokens<S: AsRef<str>>(tokens: &[S], joiner: &str) -> String {
    let mut out = String::new();
    for (idx, token) in tokens.iter().enumerate() {
        if idx > 0 {
            out.push_str(joiner);
        }
        out.push_str(token.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie_with(entries: &[&[&str]]) -> Trie {
        let mut trie = Trie::new();
        for entry in entries {
            trie.insert(entry);
        }
        trie
    }

    #[test]
    fn test_insert_then_search() {
        let trie = trie_with(&[&["new", "york"], &["new", "york", "city"]]);

        assert!(trie.search(&["new", "york"]));
        assert!(trie.search(&["new", "york", "city"]));
        assert!(!trie.search(&["new"]));
        assert!(!trie.search(&["york"]));
        assert!(!trie.search(&["new", "york", "times"]));
    }

    #[test]
    fn test_search_survives_unrelated_insert() {
        let mut trie = trie_with(&[&["北", "京"]]);
        trie.insert(&["南", "京", "市"]);
        trie.insert(&["北", "海"]);

        assert!(trie.search(&["北", "京"]));
        assert!(trie.search(&["北", "海"]));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut trie = trie_with(&[&["a", "b"]]);
        let nodes = trie.node_count();
        trie.insert(&["a", "b"]);

        assert_eq!(trie.node_count(), nodes);
        assert!(trie.search(&["a", "b"]));
    }

    #[test]
    fn test_shared_prefix_reuses_nodes() {
        let trie = trie_with(&[&["a", "b", "c"], &["a", "b", "d"]]);
        // root, a, b, c, d
        assert_eq!(trie.node_count(), 5);
    }

    #[test]
    fn test_starts_with() {
        let trie = trie_with(&[&["上", "海", "市"]]);

        assert!(trie.starts_with(&["上"]));
        assert!(trie.starts_with(&["上", "海"]));
        assert!(trie.starts_with(&["上", "海", "市"]));
        assert!(!trie.starts_with(&["海"]));
        assert!(trie.starts_with::<&str>(&[]));
    }

    #[test]
    fn test_enumerate_match_longest_first() {
        let trie = trie_with(&[&["上海", "市"], &["上海", "市", "政府"]]);

        let matches = trie.enumerate_match(&["上海", "市", "政府", "工作"], "");
        assert_eq!(matches, vec!["上海市政府", "上海市"]);
    }

    #[test]
    fn test_enumerate_match_uses_joiner() {
        let trie = trie_with(&[&["new", "york"]]);

        let matches = trie.enumerate_match(&["new", "york", "state"], "_");
        assert_eq!(matches, vec!["new_york"]);
    }

    #[test]
    fn test_enumerate_match_skips_single_token_entries() {
        let mut trie = trie_with(&[&["Beijing"]]);
        assert!(trie.enumerate_match(&["Beijing", "University"], "").is_empty());
        assert!(trie.enumerate_match(&["Beijing"], "").is_empty());

        trie.insert(&["Beijing", "University"]);
        assert_eq!(
            trie.enumerate_match(&["Beijing", "University"], " "),
            vec!["Beijing University"]
        );
    }

    #[test]
    fn test_enumerate_match_is_anchored() {
        let trie = trie_with(&[&["海", "市"]]);
        // "海市" occurs at offset 1, not at the start.
        assert!(trie.enumerate_match(&["上", "海", "市"], "").is_empty());
        assert_eq!(trie.enumerate_match(&["海", "市"], ""), vec!["海市"]);
    }

    #[test]
    fn test_matched_prefix_lengths() {
        let trie = trie_with(&[&["a", "b"], &["a", "b", "c", "d"], &["a"]]);

        assert_eq!(
            trie.matched_prefix_lengths(&["a", "b", "c", "d", "e"]),
            vec![4, 2]
        );
        assert!(trie.matched_prefix_lengths::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_empty_sequence_marks_root() {
        let mut trie = Trie::new();
        assert!(trie.is_empty());
        assert!(!trie.search::<&str>(&[]));

        trie.insert::<&str>(&[]);
        assert!(!trie.is_empty());
        assert!(trie.search::<&str>(&[]));
        // The root entry never surfaces as a match.
        assert!(trie.enumerate_match(&["x", "y"], "").is_empty());
    }

    #[test]
    fn test_owned_tokens() {
        let tokens: Vec<String> = vec!["東".into(), "京".into()];
        let mut trie = Trie::new();
        trie.insert(&tokens);
        assert!(trie.search(&tokens));
        assert!(trie.search(&["東", "京"]));
    }
}
