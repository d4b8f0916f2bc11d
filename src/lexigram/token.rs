//! Token types and the ordered token table
//!
//! A `TokenTable` is the lexical half of a language definition: an ordered
//! list of named patterns plus the subset of ids flagged as ignored. Order is
//! load-bearing: the tokenizer tries definitions in registration order and
//! the first one that matches wins, with no longest-match disambiguation.
//! Ignored definitions still consume input and advance line counts; they just
//! never appear in the output stream.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;

use crate::lexigram::diagnostics::RuleDefinitionError;

/// Identifier of a token definition, unique within one table.
///
/// Ids are handed out sequentially at registration time. The reserved
/// [`TokenId::SYNTHETIC`] value never identifies a real definition; it tags
/// the placeholder token synthesized when a diagnostic has to point past the
/// end of the stream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Sentinel id for tokens synthesized at end of stream.
    pub const SYNTHETIC: TokenId = TokenId(u32::MAX);
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == TokenId::SYNTHETIC {
            write!(f, "synthetic")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// One lexical unit produced by the tokenizer.
///
/// Immutable once produced. `line` is the line the token started on (the
/// pre-match line: a token whose value spans newlines is still reported at
/// its first line). `source` is the label the tokenizer was given, so that
/// diagnostics can name the originating input.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub value: String,
    pub line: usize,
    pub source: String,
}

impl Token {
    /// Placeholder token used when a diagnostic points past the last real
    /// token. Carries the location it was derived from and an empty value.
    pub fn synthetic(line: usize, source: &str) -> Token {
        Token {
            id: TokenId::SYNTHETIC,
            value: String::new(),
            line,
            source: source.to_string(),
        }
    }
}

/// A single named pattern in the table.
///
/// The pattern is compiled anchored, so it can only ever match a prefix of
/// the remaining input.
#[derive(Debug, Clone)]
pub struct TokenDef {
    id: TokenId,
    name: String,
    pattern_text: String,
    pattern: Regex,
}

impl TokenDef {
    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pattern as registered, without the anchoring wrapper.
    pub fn pattern_text(&self) -> &str {
        &self.pattern_text
    }

    /// Length of the prefix of `rest` this definition matches, if any.
    ///
    /// Zero-width matches are treated as no match: a definition that cannot
    /// consume input cannot win a position.
    pub(crate) fn match_len(&self, rest: &str) -> Option<usize> {
        match self.pattern.find(rest) {
            Some(m) if !m.as_str().is_empty() => Some(m.end()),
            _ => None,
        }
    }
}

/// Ordered collection of token definitions plus the ignored subset.
#[derive(Debug, Default)]
pub struct TokenTable {
    defs: Vec<TokenDef>,
    ignored: HashSet<TokenId>,
}

impl TokenTable {
    pub fn new() -> TokenTable {
        TokenTable::default()
    }

    /// Append a definition. Position in the table is priority: earlier
    /// definitions win over later ones at every offset.
    pub fn define(&mut self, name: &str, pattern: &str) -> Result<TokenId, RuleDefinitionError> {
        self.insert(name, pattern, false)
    }

    /// Append a definition whose matches are consumed but never emitted.
    pub fn define_ignored(
        &mut self,
        name: &str,
        pattern: &str,
    ) -> Result<TokenId, RuleDefinitionError> {
        self.insert(name, pattern, true)
    }

    fn insert(
        &mut self,
        name: &str,
        pattern: &str,
        ignored: bool,
    ) -> Result<TokenId, RuleDefinitionError> {
        let anchored = format!(r"\A(?:{})", pattern);
        let compiled = Regex::new(&anchored).map_err(|e| RuleDefinitionError::InvalidPattern {
            name: name.to_string(),
            error: e.to_string(),
        })?;

        let id = TokenId(self.defs.len() as u32);
        self.defs.push(TokenDef {
            id,
            name: name.to_string(),
            pattern_text: pattern.to_string(),
            pattern: compiled,
        });
        if ignored {
            self.ignored.insert(id);
        }
        Ok(id)
    }

    /// All definitions in registration order.
    pub fn defs(&self) -> &[TokenDef] {
        &self.defs
    }

    pub fn is_ignored(&self, id: TokenId) -> bool {
        self.ignored.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Human-readable name for an id.
    ///
    /// Presentation only: returns the registered name when the id resolves,
    /// the fixed label `end-of-input` for the synthetic sentinel, and the
    /// numeric id rendered as text otherwise.
    pub fn name_of(&self, id: TokenId) -> String {
        if id == TokenId::SYNTHETIC {
            return "end-of-input".to_string();
        }
        match self.defs.get(id.0 as usize) {
            Some(def) => def.name.clone(),
            None => id.0.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_assigns_sequential_ids() {
        let mut table = TokenTable::new();
        let a = table.define("A", "a").unwrap();
        let b = table.define("B", "b").unwrap();
        assert_eq!(a, TokenId(0));
        assert_eq!(b, TokenId(1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_define_rejects_invalid_pattern() {
        let mut table = TokenTable::new();
        let err = table.define("BROKEN", "(unclosed").unwrap_err();
        assert!(matches!(
            err,
            RuleDefinitionError::InvalidPattern { ref name, .. } if name == "BROKEN"
        ));
    }

    #[test]
    fn test_ignored_subset() {
        let mut table = TokenTable::new();
        let ws = table.define_ignored("WHITESPACE", r"[ \t]+").unwrap();
        let word = table.define("WORD", "[a-z]+").unwrap();
        assert!(table.is_ignored(ws));
        assert!(!table.is_ignored(word));
    }

    #[test]
    fn test_name_of_resolves_or_echoes() {
        let mut table = TokenTable::new();
        let word = table.define("WORD", "[a-z]+").unwrap();
        assert_eq!(table.name_of(word), "WORD");
        assert_eq!(table.name_of(TokenId(42)), "42");
        assert_eq!(table.name_of(TokenId::SYNTHETIC), "end-of-input");
    }

    #[test]
    fn test_match_len_skips_zero_width() {
        let mut table = TokenTable::new();
        table.define("MAYBE", "a*").unwrap();
        // "a*" matches the empty prefix of "bbb"; that must not count.
        assert_eq!(table.defs()[0].match_len("bbb"), None);
        assert_eq!(table.defs()[0].match_len("aab"), Some(2));
    }

    #[test]
    fn test_match_is_anchored() {
        let mut table = TokenTable::new();
        table.define("WORD", "[a-z]+").unwrap();
        // A word later in the input must not match at the current offset.
        assert_eq!(table.defs()[0].match_len("123abc"), None);
    }
}
