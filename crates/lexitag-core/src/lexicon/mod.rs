//! # Lexicon
//!
//! Dictionary of entity entries backed by a [`Trie`], with a source label and
//! a stable integer id per entry. The ids key the lexicon embedding table of
//! the tagger; id [`UNKNOWN_ID`] is reserved for sequences with no entry.
//!
//! A lexicon is filled once (see [`loader`]) and then shared read-only:
//! every query takes `&self`, so concurrent readers need no locking.

pub mod features;
pub mod loader;
pub mod trie;

use std::collections::HashMap;

use tracing::warn;

use crate::error::{LexitagError, Result};

pub use features::{lexicon_ids, pad_batch, sentence_matches, LexiconMatch};
pub use loader::{load_dictionary, load_from_reader, reload_dictionary, LoadStats};
pub use trie::{Trie, TrieNode, MIN_MATCH_LEN};

use trie::join_tokens;

/// Identifier returned for sequences that are not registered.
pub const UNKNOWN_ID: u32 = 0;

/// Display name of the unknown sentinel.
pub const UNKNOWN_TOKEN: &str = "<UNK>";

/// Configuration for a [`Lexicon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconConfig {
    /// Lower-case every token before insertion and lookup.
    pub lowercase: bool,
    /// String placed between tokens when forming lookup keys and matches.
    pub joiner: String,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            joiner: String::new(),
        }
    }
}

impl LexiconConfig {
    /// Create a lexicon configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable case folding.
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Set the token joiner.
    pub fn with_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.joiner = joiner.into();
        self
    }
}

/// Entity dictionary with trie matching, source labels and dense ids.
#[derive(Debug, Clone)]
pub struct Lexicon {
    config: LexiconConfig,
    trie: Trie,
    ent2type: HashMap<String, String>,
    ent2id: HashMap<String, u32>,
    next_id: u32,
    unknown_seeded: bool,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(LexiconConfig::default())
    }
}

impl Lexicon {
    /// Create an empty lexicon with the unknown sentinel seeded.
    pub fn new(config: LexiconConfig) -> Self {
        Self {
            config,
            trie: Trie::new(),
            ent2type: HashMap::new(),
            ent2id: HashMap::new(),
            next_id: UNKNOWN_ID + 1,
            unknown_seeded: true,
        }
    }

    /// The configuration this lexicon was built with.
    pub fn config(&self) -> &LexiconConfig {
        &self.config
    }

    /// Register an entry under `source`.
    ///
    /// The first insertion of an entry wins: re-inserting keeps the original
    /// label and id. Returns `true` if the entry was new.
    ///
    /// # Examples
    /// ```
    /// use lexitag_core::lexicon::Lexicon;
    ///
    /// let mut lexicon = Lexicon::default();
    /// assert!(lexicon.insert(&["New", "York"], "LOC"));
    /// assert!(!lexicon.insert(&["new", "york"], "ORG"));
    ///
    /// assert_eq!(lexicon.search_id(&["NEW", "YORK"]), 1);
    /// assert_eq!(lexicon.search_type(&["New", "York"]).unwrap(), "LOC");
    /// ```
    pub fn insert<S: AsRef<str>>(&mut self, tokens: &[S], source: &str) -> bool {
        let folded = self.fold(tokens);
        self.trie.insert(&folded);

        let key = join_tokens(&folded, &self.config.joiner);
        let mut is_new = false;
        if !self.ent2type.contains_key(&key) {
            self.ent2type.insert(key.clone(), source.to_string());
            is_new = true;
        }
        if !self.ent2id.contains_key(&key) {
            self.ent2id.insert(key, self.next_id);
            self.next_id += 1;
            is_new = true;
        }
        is_new
    }

    /// Whether `tokens` is a registered entry.
    pub fn search<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.trie.search(&self.fold(tokens))
    }

    /// Whether `tokens` is a prefix of some registered entry.
    pub fn starts_with<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.trie.starts_with(&self.fold(tokens))
    }

    /// Id of the entry spelled by `tokens`, or [`UNKNOWN_ID`] if absent.
    pub fn search_id<S: AsRef<str>>(&self, tokens: &[S]) -> u32 {
        let key = self.key(tokens);
        match self.ent2id.get(&key) {
            Some(&id) => id,
            None => {
                if !self.unknown_seeded {
                    warn!(entry = %key, "lexicon miss after clean() without reseed_unknown()");
                }
                UNKNOWN_ID
            }
        }
    }

    /// Source label of the entry spelled by `tokens`.
    ///
    /// # Errors
    /// [`LexitagError::EntryNotRegistered`] if the entry was never inserted.
    pub fn search_type<S: AsRef<str>>(&self, tokens: &[S]) -> Result<&str> {
        let key = self.key(tokens);
        match self.ent2type.get(&key) {
            Some(label) => Ok(label.as_str()),
            None => Err(LexitagError::EntryNotRegistered { entry: key }),
        }
    }

    /// Entries anchored at the start of `tokens`, longest first, joined with
    /// the configured joiner. See [`Trie::enumerate_match`].
    pub fn enumerate_match_list<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        self.trie
            .enumerate_match(&self.fold(tokens), &self.config.joiner)
    }

    /// Token lengths of the anchored matches, in
    /// [`Lexicon::enumerate_match_list`] order.
    pub fn matched_prefix_lengths<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<usize> {
        self.trie.matched_prefix_lengths(&self.fold(tokens))
    }

    /// Number of distinct registered entries.
    pub fn size(&self) -> usize {
        self.ent2type.len()
    }

    /// Whether no entry is registered.
    pub fn is_empty(&self) -> bool {
        self.ent2type.is_empty()
    }

    /// Highest id handed out plus one.
    ///
    /// This is the minimum row count of the lexicon embedding table. Row
    /// [`UNKNOWN_ID`] is always counted, seeded or not, since entry ids
    /// start above it.
    pub fn id_count(&self) -> usize {
        self.next_id as usize
    }

    /// Whether the unknown sentinel is registered.
    pub fn has_unknown_sentinel(&self) -> bool {
        self.unknown_seeded
    }

    /// Drop every entry and start over with an empty trie.
    ///
    /// The unknown sentinel is not restored; call
    /// [`Lexicon::reseed_unknown`] before serving `search_id` traffic again.
    /// Ids restart at 1.
    pub fn clean(&mut self) {
        self.trie = Trie::new();
        self.ent2type.clear();
        self.ent2id.clear();
        self.next_id = UNKNOWN_ID + 1;
        self.unknown_seeded = false;
    }

    /// Re-register the unknown sentinel after [`Lexicon::clean`].
    pub fn reseed_unknown(&mut self) {
        self.unknown_seeded = true;
    }

    /// Registered entries as `(key, label, id)`, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u32)> {
        let mut entries: Vec<_> = self
            .ent2id
            .iter()
            .filter_map(|(key, &id)| {
                self.ent2type
                    .get(key)
                    .map(|label| (key.as_str(), label.as_str(), id))
            })
            .collect();
        entries.sort_by_key(|&(_, _, id)| id);
        entries.into_iter()
    }

    /// Folded, joined lookup key for `tokens`.
    pub fn key<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        join_tokens(&self.fold(tokens), &self.config.joiner)
    }

    fn fold<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| {
                if self.config.lowercase {
                    t.as_ref().to_lowercase()
                } else {
                    t.as_ref().to_string()
                }
            })
            .collect()
    }
}
