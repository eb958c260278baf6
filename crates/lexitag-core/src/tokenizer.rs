//! # Tokenizer for Lexicon Matching
//!
//! Splits sentences and dictionary entries into the token sequences the
//! lexicon is keyed on. CJK characters become one token each (the tagger is
//! character based for Chinese), runs of other letters and digits become one
//! word token, and any remaining non-whitespace character stands alone.

use regex::Regex;

use crate::error::Result;

/// A token extracted from a sentence with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text content
    pub text: String,
    /// Start byte position in the original string
    pub start: usize,
    /// End byte position in the original string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

const TOKEN_PATTERN: &str = r"[\p{Han}\p{Hiragana}\p{Katakana}]|[[\p{L}\p{N}\p{M}]--[\p{Han}\p{Hiragana}\p{Katakana}]]+|\S";

/// Tokenizer shared by the dictionary loader and sentence matching.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(TOKEN_PATTERN)?,
        })
    }

    /// Tokenize a sentence into a sequence of tokens.
    ///
    /// Case is preserved; folding is up to the lexicon.
    ///
    /// # Examples
    /// ```
    /// use lexitag_core::tokenizer::Tokenizer;
    ///
    /// let tokenizer = Tokenizer::new().unwrap();
    /// let tokens = tokenizer.tokenize("上海市 New York");
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, vec!["上", "海", "市", "New", "York"]);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        self.pattern
            .find_iter(input)
            .enumerate()
            .map(|(index, m)| Token {
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
                index,
            })
            .collect()
    }

    /// Tokenize and keep only the token texts.
    pub fn tokenize_texts(&self, input: &str) -> Vec<String> {
        self.pattern
            .find_iter(input)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Get the original byte span covered by tokens `start_idx..end_idx`.
    pub fn get_spans(
        &self,
        tokens: &[Token],
        start_idx: usize,
        end_idx: usize,
    ) -> Option<(usize, usize)> {
        if start_idx >= tokens.len() || end_idx > tokens.len() || start_idx >= end_idx {
            return None;
        }

        let start = tokens[start_idx].start;
        let end = tokens[end_idx - 1].end;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        Tokenizer::new().unwrap().tokenize_texts(input)
    }

    #[test]
    fn test_tokenize_chinese_per_character() {
        assert_eq!(texts("上海市政府"), vec!["上", "海", "市", "政", "府"]);
    }

    #[test]
    fn test_tokenize_words_and_punctuation() {
        assert_eq!(
            texts("Beijing University, 2024!"),
            vec!["Beijing", "University", ",", "2024", "!"]
        );
    }

    #[test]
    fn test_tokenize_mixed_script() {
        assert_eq!(texts("在Apple工作"), vec!["在", "Apple", "工", "作"]);
    }

    #[test]
    fn test_tokenize_positions() {
        let tokenizer = Tokenizer::new().unwrap();
        let tokens = tokenizer.tokenize("去 上海");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "上");
        assert_eq!(tokens[1].start, 4);
        assert_eq!(tokens[1].end, 7);
        assert_eq!(tokens[2].index, 2);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(texts("").is_empty());
        assert!(texts("   \t ").is_empty());
    }

    #[test]
    fn test_get_spans() {
        let tokenizer = Tokenizer::new().unwrap();
        let input = "我在上海市工作";
        let tokens = tokenizer.tokenize(input);

        let (start, end) = tokenizer.get_spans(&tokens, 2, 5).unwrap();
        assert_eq!(&input[start..end], "上海市");
        assert!(tokenizer.get_spans(&tokens, 3, 3).is_none());
        assert!(tokenizer.get_spans(&tokens, 0, 99).is_none());
    }
}
