//! # lexitag Core
//!
//! Lexicon matching for lexicon-augmented BiLSTM-CRF named-entity taggers.
//! Provides the token trie, the entity lexicon with stable embedding ids,
//! dictionary loading, per-sentence lexicon features, and the tag-scheme and
//! chunk-level evaluation utilities used around the tagger.
//!
//! ## Quick Start
//!
//! ```rust
//! use lexitag_core::{Lexicon, LexiconConfig};
//!
//! let mut lexicon = Lexicon::new(LexiconConfig::new().with_lowercase(false));
//! lexicon.insert(&["上海", "市"], "LOC");
//! lexicon.insert(&["上海", "市", "政府"], "ORG");
//!
//! let matches = lexicon.enumerate_match_list(&["上海", "市", "政府", "工作"]);
//! assert_eq!(matches, vec!["上海市政府", "上海市"]);
//! assert_eq!(lexicon.search_type(&["上海", "市", "政府"]).unwrap(), "ORG");
//! ```
pub mod config;
pub mod error;
pub mod eval;
pub mod lexicon;
pub mod tokenizer;

// Re-export primary API
pub use config::{ensure_dirs, ModelConfig, Optimizer, DEFAULT_NUM_LEXICON, LEXICON_DIM};
pub use error::{LexitagError, Result};
pub use eval::{
    bio_to_bioes, bioes_to_bio, chunks, prediction_lines, write_predictions, Chunk, Evaluation,
    Report, Scores, Tag, TagPrefix, TagScheme,
};
pub use lexicon::{
    lexicon_ids, load_dictionary, load_from_reader, pad_batch, reload_dictionary,
    sentence_matches, Lexicon, LexiconConfig, LexiconMatch, LoadStats, Trie, UNKNOWN_ID,
    UNKNOWN_TOKEN,
};
pub use tokenizer::{Token, Tokenizer};
