use thiserror::Error;

/// Errors that can occur during lexitag core operations.
#[derive(Debug, Error)]
pub enum LexitagError {
    /// A type lookup was made for an entry that was never inserted.
    #[error("entry not registered in lexicon: {entry:?}")]
    EntryNotRegistered {
        /// The folded, joined lookup key that missed.
        entry: String,
    },

    /// Reading or writing a dictionary, config or prediction file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// A model config failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The configured optimizer name is not one the tagger supports.
    #[error("unsupported optimizer: {0:?} (expected sgd, adam or adgrad)")]
    UnsupportedOptimizer(String),

    /// A tag string does not follow the `PREFIX-LABEL` / `O` shape.
    #[error("invalid tag: {0:?}")]
    InvalidTag(String),

    /// Gold and predicted sequences disagree in length.
    #[error("sequence length mismatch: gold has {gold} tags, prediction has {pred}")]
    LengthMismatch { gold: usize, pred: usize },

    /// A sentence has a different number of tokens than tags.
    #[error("token count mismatch: {tokens} tokens, {tags} tags")]
    TokenCountMismatch { tokens: usize, tags: usize },

    /// A line in a prediction file is not `token gold pred`.
    #[error("malformed prediction line {line}: {content:?}")]
    InvalidPredictionLine { line: usize, content: String },
}

/// Result type alias for lexitag operations.
pub type Result<T> = std::result::Result<T, LexitagError>;
