//! # Chunk-level NER Evaluation
//!
//! conlleval-compatible scoring: a predicted entity counts only when its
//! label and both boundaries match a gold entity exactly.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{LexitagError, Result};
use crate::eval::tags::{chunks, Chunk};

/// File name written by [`write_predictions`].
pub const PREDICTION_FILE: &str = "ner_predict.utf8";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counts {
    gold: usize,
    guessed: usize,
    correct: usize,
}

/// Precision, recall and F1 in percent, plus chunk counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Gold chunks.
    pub gold: usize,
    /// Predicted chunks.
    pub guessed: usize,
    /// Exactly matching chunks.
    pub correct: usize,
}

impl From<Counts> for Scores {
    fn from(c: Counts) -> Self {
        let precision = percent(c.correct, c.guessed);
        let recall = percent(c.correct, c.gold);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
            gold: c.gold,
            guessed: c.guessed,
            correct: c.correct,
        }
    }
}

fn percent(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        100.0 * num as f64 / den as f64
    }
}

/// Evaluation summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Tokens processed.
    pub tokens: usize,
    /// Token-level tag accuracy in percent.
    pub accuracy: f64,
    pub overall: Scores,
    /// Per entity label, sorted by label.
    pub per_type: BTreeMap<String, Scores>,
}

impl Report {
    /// Render the report in the conlleval text layout.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "processed {} tokens with {} phrases; found: {} phrases; correct: {}.",
                self.tokens, self.overall.gold, self.overall.guessed, self.overall.correct
            ),
            format!(
                "accuracy: {:6.2}%; precision: {:6.2}%; recall: {:6.2}%; FB1: {:6.2}",
                self.accuracy, self.overall.precision, self.overall.recall, self.overall.f1
            ),
        ];
        for (label, s) in &self.per_type {
            lines.push(format!(
                "{:>17}: precision: {:6.2}%; recall: {:6.2}%; FB1: {:6.2}  {}",
                label, s.precision, s.recall, s.f1, s.guessed
            ));
        }
        lines
    }
}

/// Accumulates gold and predicted tag sequences.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    tokens: usize,
    correct_tags: usize,
    overall: Counts,
    per_type: BTreeMap<String, Counts>,
}

impl Evaluation {
    /// Create an empty evaluation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sentence worth of gold and predicted tags.
    pub fn add_sentence<S: AsRef<str>, T: AsRef<str>>(&mut self, gold: &[S], pred: &[T]) -> Result<()> {
        if gold.len() != pred.len() {
            return Err(LexitagError::LengthMismatch {
                gold: gold.len(),
                pred: pred.len(),
            });
        }

        let gold_chunks = chunks(gold)?;
        let pred_chunks = chunks(pred)?;

        self.tokens += gold.len();
        self.correct_tags += gold
            .iter()
            .zip(pred)
            .filter(|(g, p)| g.as_ref() == p.as_ref())
            .count();

        let gold_set: HashSet<&Chunk> = gold_chunks.iter().collect();
        for chunk in &gold_chunks {
            self.overall.gold += 1;
            self.per_type.entry(chunk.label.clone()).or_default().gold += 1;
        }
        for chunk in &pred_chunks {
            let counts = self.per_type.entry(chunk.label.clone()).or_default();
            counts.guessed += 1;
            self.overall.guessed += 1;
            if gold_set.contains(chunk) {
                counts.correct += 1;
                self.overall.correct += 1;
            }
        }

        Ok(())
    }

    /// Build an evaluation from `token gold pred` lines.
    ///
    /// A blank line ends a sentence. Only the last two whitespace-separated
    /// fields are read, so tokens may contain spaces.
    pub fn from_prediction_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut eval = Self::new();
        let mut gold = Vec::new();
        let mut pred = Vec::new();

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() {
                if !gold.is_empty() {
                    eval.add_sentence(&gold, &pred)?;
                    gold.clear();
                    pred.clear();
                }
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                return Err(LexitagError::InvalidPredictionLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            }
            gold.push(fields[fields.len() - 2].to_string());
            pred.push(fields[fields.len() - 1].to_string());
        }

        if !gold.is_empty() {
            eval.add_sentence(&gold, &pred)?;
        }

        Ok(eval)
    }

    /// Compute the scores accumulated so far.
    pub fn report(&self) -> Report {
        Report {
            tokens: self.tokens,
            accuracy: percent(self.correct_tags, self.tokens),
            overall: self.overall.into(),
            per_type: self
                .per_type
                .iter()
                .map(|(label, counts)| (label.clone(), (*counts).into()))
                .collect(),
        }
    }
}

/// Zip tokens with gold and predicted tags into `token gold pred` lines.
pub fn prediction_lines<A, B, C>(tokens: &[A], gold: &[B], pred: &[C]) -> Result<Vec<String>>
where
    A: AsRef<str>,
    B: AsRef<str>,
    C: AsRef<str>,
{
    if tokens.len() != gold.len() {
        return Err(LexitagError::TokenCountMismatch {
            tokens: tokens.len(),
            tags: gold.len(),
        });
    }
    if gold.len() != pred.len() {
        return Err(LexitagError::LengthMismatch {
            gold: gold.len(),
            pred: pred.len(),
        });
    }
    Ok(tokens
        .iter()
        .zip(gold)
        .zip(pred)
        .map(|((t, g), p)| format!("{} {} {}", t.as_ref(), g.as_ref(), p.as_ref()))
        .collect())
}

/// Write prediction blocks to `dir/ner_predict.utf8`, one blank line after
/// each sentence. Returns the written path.
pub fn write_predictions<P: AsRef<Path>>(results: &[Vec<String>], dir: P) -> Result<PathBuf> {
    let path = dir.as_ref().join(PREDICTION_FILE);
    let mut out = String::new();
    for sentence in results {
        for line in sentence {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    fs::write(&path, out)?;
    Ok(path)
}
