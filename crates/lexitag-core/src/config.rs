//! # Tagger Configuration
//!
//! Flat option set of the BiLSTM-CRF tagger, persisted as JSON next to the
//! checkpoints. The training framework consumes it; this crate owns loading,
//! validation and the lexicon sizing check.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{LexitagError, Result};
use crate::eval::TagScheme;
use crate::lexicon::Lexicon;

/// Rows of the lexicon embedding table when not overridden.
pub const DEFAULT_NUM_LEXICON: usize = 1_292_608;

/// Width of a lexicon embedding vector.
pub const LEXICON_DIM: usize = 300;

/// Gradient optimizer used by the training framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Optimizer {
    Sgd,
    Adam,
    Adgrad,
}

impl Optimizer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Optimizer::Sgd => "sgd",
            Optimizer::Adam => "adam",
            Optimizer::Adgrad => "adgrad",
        }
    }
}

impl FromStr for Optimizer {
    type Err = LexitagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sgd" => Ok(Optimizer::Sgd),
            "adam" => Ok(Optimizer::Adam),
            "adgrad" => Ok(Optimizer::Adgrad),
            other => Err(LexitagError::UnsupportedOptimizer(other.to_string())),
        }
    }
}

impl TryFrom<String> for Optimizer {
    type Error = LexitagError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Optimizer> for String {
    fn from(value: Optimizer) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Optimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub num_words: usize,
    pub num_tags: usize,
    pub word_dim: usize,
    pub seg_dim: usize,
    pub lstm_dim: usize,
    pub batch_size: usize,
    pub optimizer: Optimizer,
    pub emb_file: PathBuf,
    /// Gradient clipping bound.
    pub clip: f32,
    /// Keep probability, i.e. `1 - dropout`.
    pub dropout_keep: f32,
    pub lr: f32,
    pub tag_schema: TagScheme,
    /// Initialise word embeddings from `emb_file`.
    pub pre_emb: bool,
    /// Rows of the lexicon embedding table.
    #[serde(default = "default_num_lexicon")]
    pub num_lexicon: usize,
    /// Enable the lexicon features.
    #[serde(default)]
    pub lexicon: bool,
    /// Initialise lexicon embeddings from pretrained vectors.
    #[serde(default)]
    pub pre_lexicon: bool,
    #[serde(default)]
    pub lexicon_file: Option<PathBuf>,
    pub map_file: PathBuf,
}

fn default_num_lexicon() -> usize {
    DEFAULT_NUM_LEXICON
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_words: 0,
            num_tags: 0,
            word_dim: 100,
            seg_dim: 20,
            lstm_dim: 100,
            batch_size: 20,
            optimizer: Optimizer::Adam,
            emb_file: PathBuf::from("wiki_100.utf8"),
            clip: 5.0,
            dropout_keep: 0.5,
            lr: 0.001,
            tag_schema: TagScheme::Bioes,
            pre_emb: true,
            num_lexicon: DEFAULT_NUM_LEXICON,
            lexicon: false,
            pre_lexicon: false,
            lexicon_file: None,
            map_file: PathBuf::from("maps.json"),
        }
    }
}

impl ModelConfig {
    /// Create a configuration for the given vocabulary and tag set sizes.
    pub fn new(num_words: usize, num_tags: usize) -> Self {
        Self {
            num_words,
            num_tags,
            ..Self::default()
        }
    }

    /// Set the optimizer by name.
    pub fn with_optimizer(mut self, name: &str) -> Result<Self> {
        self.optimizer = name.parse()?;
        Ok(self)
    }

    /// Set the dropout rate; stored as its keep probability.
    pub fn with_dropout(mut self, dropout: f32) -> Self {
        self.dropout_keep = 1.0 - dropout;
        self
    }

    /// Enable lexicon features backed by `path`.
    pub fn with_lexicon(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon = true;
        self.lexicon_file = Some(path.into());
        self
    }

    /// Load pretrained lexicon vectors.
    pub fn with_pre_lexicon(mut self, enabled: bool) -> Self {
        self.pre_lexicon = enabled;
        self
    }

    /// Set the lexicon embedding table size.
    pub fn with_num_lexicon(mut self, num_lexicon: usize) -> Self {
        self.num_lexicon = num_lexicon;
        self
    }

    /// Set the tagging scheme.
    pub fn with_tag_schema(mut self, scheme: TagScheme) -> Self {
        self.tag_schema = scheme;
        self
    }

    /// Check the option set for contradictions.
    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("num_words", self.num_words),
            ("num_tags", self.num_tags),
            ("word_dim", self.word_dim),
            ("lstm_dim", self.lstm_dim),
            ("batch_size", self.batch_size),
        ];
        for (name, value) in dims {
            if value == 0 {
                return Err(LexitagError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        if !(self.dropout_keep > 0.0 && self.dropout_keep <= 1.0) {
            return Err(LexitagError::InvalidConfig(format!(
                "dropout_keep must be in (0, 1], got {}",
                self.dropout_keep
            )));
        }
        if !(self.lr > 0.0) || !(self.clip > 0.0) {
            return Err(LexitagError::InvalidConfig(
                "lr and clip must be positive".into(),
            ));
        }
        if self.lexicon {
            if self.lexicon_file.is_none() {
                return Err(LexitagError::InvalidConfig(
                    "lexicon features enabled without lexicon_file".into(),
                ));
            }
            if self.num_lexicon == 0 {
                return Err(LexitagError::InvalidConfig(
                    "num_lexicon must be positive".into(),
                ));
            }
        } else if self.pre_lexicon {
            return Err(LexitagError::InvalidConfig(
                "pre_lexicon requires lexicon features".into(),
            ));
        }
        Ok(())
    }

    /// Fail if the lexicon needs more embedding rows than configured.
    pub fn check_lexicon_capacity(&self, lexicon: &Lexicon) -> Result<()> {
        let needed = lexicon.id_count();
        if needed > self.num_lexicon {
            return Err(LexitagError::InvalidConfig(format!(
                "lexicon has {needed} ids but num_lexicon is {}",
                self.num_lexicon
            )));
        }
        Ok(())
    }

    /// Write the config as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read and validate a JSON config.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Options as `(name, value)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let path = |p: &Path| p.display().to_string();
        vec![
            ("num_words", self.num_words.to_string()),
            ("num_tags", self.num_tags.to_string()),
            ("word_dim", self.word_dim.to_string()),
            ("seg_dim", self.seg_dim.to_string()),
            ("lstm_dim", self.lstm_dim.to_string()),
            ("batch_size", self.batch_size.to_string()),
            ("optimizer", self.optimizer.to_string()),
            ("emb_file", path(&self.emb_file)),
            ("clip", self.clip.to_string()),
            ("dropout_keep", self.dropout_keep.to_string()),
            ("lr", self.lr.to_string()),
            ("tag_schema", format!("{:?}", self.tag_schema).to_lowercase()),
            ("pre_emb", self.pre_emb.to_string()),
            ("num_lexicon", self.num_lexicon.to_string()),
            ("lexicon", self.lexicon.to_string()),
            ("pre_lexicon", self.pre_lexicon.to_string()),
            (
                "lexicon_file",
                self.lexicon_file.as_deref().map(path).unwrap_or_default(),
            ),
            ("map_file", path(&self.map_file)),
        ]
    }

    /// Log every option, one line each.
    pub fn log_summary(&self) {
        for (key, value) in self.entries() {
            info!("{:<15}\t{}", key, value);
        }
    }
}

/// Create each directory (and parents) if missing.
pub fn ensure_dirs<P: AsRef<Path>>(dirs: &[P]) -> Result<()> {
    for dir in dirs {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconConfig;

    fn valid() -> ModelConfig {
        ModelConfig::new(5000, 13)
    }

    #[test]
    fn test_default_config_is_valid_once_sized() {
        assert!(ModelConfig::default().validate().is_err());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_optimizer_parse() {
        assert_eq!("sgd".parse::<Optimizer>().unwrap(), Optimizer::Sgd);
        assert_eq!("adgrad".parse::<Optimizer>().unwrap(), Optimizer::Adgrad);

        let err = "rmsprop".parse::<Optimizer>().unwrap_err();
        assert!(matches!(err, LexitagError::UnsupportedOptimizer(name) if name == "rmsprop"));
    }

    #[test]
    fn test_with_optimizer_rejects_unknown() {
        assert!(valid().with_optimizer("adam").is_ok());
        assert!(valid().with_optimizer("Adam").is_err());
    }

    #[test]
    fn test_unknown_optimizer_in_json_is_rejected() {
        let mut value = serde_json::to_value(valid()).unwrap();
        value["optimizer"] = serde_json::json!("momentum");
        let err = serde_json::from_value::<ModelConfig>(value).unwrap_err();
        assert!(err.to_string().contains("unsupported optimizer"));
    }

    #[test]
    fn test_dropout_is_stored_as_keep() {
        let config = valid().with_dropout(0.3);
        assert!((config.dropout_keep - 0.7).abs() < 1e-6);
        assert!(valid().with_dropout(1.0).validate().is_err());
    }

    #[test]
    fn test_lexicon_options_validation() {
        let mut config = valid();
        config.lexicon = true;
        assert!(config.validate().is_err());

        let config = valid().with_lexicon("dict.txt").with_pre_lexicon(true);
        assert!(config.validate().is_ok());

        let config = valid().with_pre_lexicon(true);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_check_lexicon_capacity() {
        let mut lexicon = Lexicon::new(LexiconConfig::default());
        lexicon.insert(&["a", "b"], "X");
        lexicon.insert(&["c", "d"], "Y");

        let config = valid().with_num_lexicon(3);
        assert!(config.check_lexicon_capacity(&lexicon).is_ok());

        let config = valid().with_num_lexicon(2);
        assert!(config.check_lexicon_capacity(&lexicon).is_err());
    }

    #[test]
    fn test_capacity_after_clean_counts_reserved_row() {
        let mut lexicon = Lexicon::new(LexiconConfig::default());
        lexicon.insert(&["a", "b"], "X");
        lexicon.clean();
        lexicon.insert(&["c", "d"], "Y");

        let config = valid().with_num_lexicon(1);
        assert!(config.check_lexicon_capacity(&lexicon).is_err());

        let config = valid().with_num_lexicon(2);
        assert!(config.check_lexicon_capacity(&lexicon).is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config_file");
        let config = valid()
            .with_lexicon("词典.txt")
            .with_tag_schema(TagScheme::Bio);

        config.save(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("词典.txt"));
        assert!(content.contains("\"optimizer\": \"adam\""));

        let loaded = ModelConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_fills_lexicon_defaults() {
        let mut value = serde_json::to_value(valid()).unwrap();
        let map = value.as_object_mut().unwrap();
        for key in ["num_lexicon", "lexicon", "pre_lexicon", "lexicon_file"] {
            map.remove(key);
        }
        let config: ModelConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.num_lexicon, DEFAULT_NUM_LEXICON);
        assert!(!config.lexicon);
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        ModelConfig::default().save(&path).unwrap();
        assert!(matches!(
            ModelConfig::load(&path),
            Err(LexitagError::InvalidConfig(_))
        ));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ModelConfig::load(&path), Err(LexitagError::Json(_))));
    }

    #[test]
    fn test_entries_order() {
        let entries = valid().entries();
        assert_eq!(entries.len(), 18);
        assert_eq!(entries[0], ("num_words", "5000".to_string()));
        assert_eq!(entries[6], ("optimizer", "adam".to_string()));
        assert_eq!(entries[11], ("tag_schema", "bioes".to_string()));
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let result = dir.path().join("result");
        let ckpt = dir.path().join("ckpt").join("nested");
        ensure_dirs(&[&result, &ckpt]).unwrap();
        assert!(result.is_dir());
        assert!(ckpt.is_dir());
    }
}
