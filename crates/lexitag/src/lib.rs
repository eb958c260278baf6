//! # lexitag
//!
//! Trie-backed lexicon matching for lexicon-augmented NER taggers.
//! This crate re-exports the public API of [`lexitag_core`].
pub use lexitag_core::*;
