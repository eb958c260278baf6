//! # Tag Schemes for Named Entity Recognition
//!
//! Parsing and conversion between the BIO and BIOES tagging schemes, and
//! extraction of entity chunks from tag sequences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LexitagError, Result};

/// Position of a token inside an entity chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagPrefix {
    /// First token of a chunk.
    Begin,
    /// Token inside a chunk.
    Inside,
    /// Last token of a multi-token chunk (BIOES only).
    End,
    /// Single-token chunk (BIOES only).
    Single,
    /// Outside any chunk.
    Outside,
}

impl TagPrefix {
    fn letter(self) -> char {
        match self {
            TagPrefix::Begin => 'B',
            TagPrefix::Inside => 'I',
            TagPrefix::End => 'E',
            TagPrefix::Single => 'S',
            TagPrefix::Outside => 'O',
        }
    }
}

/// A single tag such as `B-LOC` or `O`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub prefix: TagPrefix,
    /// Entity label; `None` only for [`TagPrefix::Outside`].
    pub label: Option<String>,
}

impl Tag {
    /// The outside tag `O`.
    pub fn outside() -> Self {
        Self {
            prefix: TagPrefix::Outside,
            label: None,
        }
    }

    /// A tag with a label.
    pub fn new(prefix: TagPrefix, label: impl Into<String>) -> Self {
        Self {
            prefix,
            label: Some(label.into()),
        }
    }

    fn with_prefix(&self, prefix: TagPrefix) -> Self {
        Self {
            prefix,
            label: self.label.clone(),
        }
    }
}

impl FromStr for Tag {
    type Err = LexitagError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "O" {
            return Ok(Tag::outside());
        }
        let (prefix, label) = s
            .split_once('-')
            .ok_or_else(|| LexitagError::InvalidTag(s.to_string()))?;
        let prefix = match prefix {
            "B" => TagPrefix::Begin,
            "I" => TagPrefix::Inside,
            "E" => TagPrefix::End,
            "S" => TagPrefix::Single,
            _ => return Err(LexitagError::InvalidTag(s.to_string())),
        };
        if label.is_empty() {
            return Err(LexitagError::InvalidTag(s.to_string()));
        }
        Ok(Tag::new(prefix, label))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}-{}", self.prefix.letter(), label),
            None => write!(f, "O"),
        }
    }
}

/// Tagging scheme of a model's output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagScheme {
    #[serde(alias = "iob")]
    Bio,
    #[serde(alias = "iobes")]
    Bioes,
}

fn parse_all<S: AsRef<str>>(tags: &[S]) -> Result<Vec<Tag>> {
    tags.iter().map(|t| t.as_ref().parse()).collect()
}

/// Convert BIOES tags to BIO: `E-X` becomes `I-X` and `S-X` becomes `B-X`.
pub fn bioes_to_bio<S: AsRef<str>>(tags: &[S]) -> Result<Vec<String>> {
    Ok(parse_all(tags)?
        .into_iter()
        .map(|tag| match tag.prefix {
            TagPrefix::End => tag.with_prefix(TagPrefix::Inside),
            TagPrefix::Single => tag.with_prefix(TagPrefix::Begin),
            _ => tag,
        })
        .map(|tag| tag.to_string())
        .collect())
}

/// Convert BIO tags to BIOES.
///
/// A `B-X` not followed by `I-X` becomes `S-X`; an `I-X` not followed by
/// `I-X` becomes `E-X`.
pub fn bio_to_bioes<S: AsRef<str>>(tags: &[S]) -> Result<Vec<String>> {
    let parsed = parse_all(tags)?;
    let mut out = Vec::with_capacity(parsed.len());

    for (idx, tag) in parsed.iter().enumerate() {
        let continues = parsed.get(idx + 1).is_some_and(|next| {
            next.prefix == TagPrefix::Inside && next.label == tag.label
        });
        let converted = match tag.prefix {
            TagPrefix::Begin if !continues => tag.with_prefix(TagPrefix::Single),
            TagPrefix::Inside if !continues => tag.with_prefix(TagPrefix::End),
            TagPrefix::Begin | TagPrefix::Inside | TagPrefix::Outside => tag.clone(),
            TagPrefix::End | TagPrefix::Single => {
                return Err(LexitagError::InvalidTag(tag.to_string()));
            }
        };
        out.push(converted.to_string());
    }

    Ok(out)
}

/// An entity span: tokens `start..end` labeled `label`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Extract entity chunks from a BIO or BIOES tag sequence.
///
/// Follows conlleval boundaries: an `I-X` that does not continue an `X`
/// chunk starts a new one.
pub fn chunks<S: AsRef<str>>(tags: &[S]) -> Result<Vec<Chunk>> {
    let parsed = parse_all(tags)?;
    let mut out = Vec::new();
    let mut open: Option<(String, usize)> = None;

    for (idx, tag) in parsed.iter().enumerate() {
        let starts_new = match (&open, tag.prefix, &tag.label) {
            (_, TagPrefix::Outside, _) => false,
            (_, TagPrefix::Begin | TagPrefix::Single, _) => true,
            (Some((label, _)), TagPrefix::Inside | TagPrefix::End, Some(current)) => {
                label != current
            }
            (None, TagPrefix::Inside | TagPrefix::End, _) => true,
            (Some(_), _, None) => true,
        };

        if tag.prefix == TagPrefix::Outside || starts_new {
            if let Some((label, start)) = open.take() {
                out.push(Chunk { label, start, end: idx });
            }
        }
        if starts_new {
            if let Some(label) = &tag.label {
                open = Some((label.clone(), idx));
            }
        }
        if matches!(tag.prefix, TagPrefix::End | TagPrefix::Single) {
            if let Some((label, start)) = open.take() {
                out.push(Chunk {
                    label,
                    start,
                    end: idx + 1,
                });
            }
        }
    }

    if let Some((label, start)) = open {
        out.push(Chunk {
            label,
            start,
            end: parsed.len(),
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_parse_and_display() {
        for s in ["B-LOC", "I-ORG", "E-PER", "S-GPE", "O", "B-B-X"] {
            let tag: Tag = s.parse().unwrap();
            assert_eq!(tag.to_string(), s);
        }
        assert_eq!("B-LOC".parse::<Tag>().unwrap(), Tag::new(TagPrefix::Begin, "LOC"));
    }

    #[test]
    fn test_invalid_tags() {
        for s in ["", "LOC", "X-LOC", "B-", "o"] {
            assert!(s.parse::<Tag>().is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn test_tag_scheme_serde() {
        let scheme: TagScheme = serde_json::from_str("\"iobes\"").unwrap();
        assert_eq!(scheme, TagScheme::Bioes);
        let scheme: TagScheme = serde_json::from_str("\"bio\"").unwrap();
        assert_eq!(scheme, TagScheme::Bio);
        assert_eq!(serde_json::to_string(&TagScheme::Bioes).unwrap(), "\"bioes\"");
    }

    #[test]
    fn test_bioes_to_bio() {
        let tags = ["S-LOC", "O", "B-ORG", "I-ORG", "E-ORG"];
        assert_eq!(
            bioes_to_bio(&tags).unwrap(),
            vec!["B-LOC", "O", "B-ORG", "I-ORG", "I-ORG"]
        );
    }

    #[test]
    fn test_bio_to_bioes() {
        let tags = ["B-LOC", "O", "B-ORG", "I-ORG", "I-ORG", "B-PER", "B-PER", "I-PER"];
        assert_eq!(
            bio_to_bioes(&tags).unwrap(),
            vec!["S-LOC", "O", "B-ORG", "I-ORG", "E-ORG", "S-PER", "B-PER", "E-PER"]
        );
        assert!(bio_to_bioes(&["S-LOC"]).is_err());
    }

    #[test]
    fn test_chunks_bio() {
        let tags = ["B-LOC", "I-LOC", "O", "B-ORG", "B-ORG", "I-ORG"];
        assert_eq!(
            chunks(&tags).unwrap(),
            vec![
                Chunk { label: "LOC".into(), start: 0, end: 2 },
                Chunk { label: "ORG".into(), start: 3, end: 4 },
                Chunk { label: "ORG".into(), start: 4, end: 6 },
            ]
        );
    }

    #[test]
    fn test_chunks_bioes() {
        let tags = ["S-LOC", "B-ORG", "I-ORG", "E-ORG", "O"];
        assert_eq!(
            chunks(&tags).unwrap(),
            vec![
                Chunk { label: "LOC".into(), start: 0, end: 1 },
                Chunk { label: "ORG".into(), start: 1, end: 4 },
            ]
        );
    }

    #[test]
    fn test_chunks_dangling_inside_starts_chunk() {
        let tags = ["O", "I-LOC", "I-LOC", "I-PER"];
        assert_eq!(
            chunks(&tags).unwrap(),
            vec![
                Chunk { label: "LOC".into(), start: 1, end: 3 },
                Chunk { label: "PER".into(), start: 3, end: 4 },
            ]
        );
    }
}
