//! Dictionary file loading.
//!
//! One entry per line, `entity<TAB>source`. Blank lines and lines starting
//! with `#` are ignored. Entities are split with the shared [`Tokenizer`] so
//! dictionary keys line up with sentence tokens.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::tokenizer::Tokenizer;

/// Counters reported after loading a dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read, including comments and blanks.
    pub lines: usize,
    /// Entries that were new to the lexicon.
    pub inserted: usize,
    /// Entries already present (first insertion kept).
    pub duplicates: usize,
    /// Malformed lines that were ignored.
    pub skipped: usize,
}

/// Load a dictionary file into `lexicon`.
pub fn load_dictionary<P: AsRef<Path>>(lexicon: &mut Lexicon, path: P) -> Result<LoadStats> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let tokenizer = Tokenizer::new()?;

    let stats = load_from_reader(lexicon, BufReader::new(file), &tokenizer)?;
    info!(
        path = %path.display(),
        inserted = stats.inserted,
        duplicates = stats.duplicates,
        skipped = stats.skipped,
        "loaded dictionary"
    );
    Ok(stats)
}

/// Discard the current entries of `lexicon` and load `path` in their place.
///
/// The unknown sentinel is re-seeded so `search_id` keeps returning 0 on
/// misses.
pub fn reload_dictionary<P: AsRef<Path>>(lexicon: &mut Lexicon, path: P) -> Result<LoadStats> {
    lexicon.clean();
    lexicon.reseed_unknown();
    load_dictionary(lexicon, path)
}

/// Load dictionary lines from any buffered reader.
pub fn load_from_reader<R: BufRead>(
    lexicon: &mut Lexicon,
    reader: R,
    tokenizer: &Tokenizer,
) -> Result<LoadStats> {
    let mut stats = LoadStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        stats.lines += 1;

        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let Some((entity, source)) = line.split_once('\t') else {
            warn!(line = idx + 1, content = line, "dictionary line has no tab, skipping");
            stats.skipped += 1;
            continue;
        };

        let tokens = tokenizer.tokenize_texts(entity);
        if tokens.is_empty() {
            warn!(line = idx + 1, "dictionary line has an empty entity, skipping");
            stats.skipped += 1;
            continue;
        }

        if lexicon.insert(&tokens, source.trim()) {
            stats.inserted += 1;
        } else {
            stats.duplicates += 1;
        }

        if stats.lines % 100_000 == 0 {
            debug!(lines = stats.lines, entries = lexicon.size(), "loading dictionary");
        }
    }

    Ok(stats)
}
