//! Table-driven tokenizer
//!
//! The tokenizer walks the input from left to right. At every offset it tries
//! each definition in table order and takes the first one that matches a
//! non-empty prefix. Priority is registration order, not match length. A
//! matched ignored definition consumes input and advances the line counter
//! without emitting a token. An offset where nothing matches fails the whole
//! call; no partial stream is returned.

use crate::lexigram::diagnostics::TokenizeError;
use crate::lexigram::token::{Token, TokenTable};

/// Tokenizer over one table, with per-call location settings.
///
/// `start_line` seeds the line counter (useful when the text is an excerpt of
/// a larger document) and `source_label` is stamped on every produced token
/// so diagnostics can name the input.
pub struct Tokenizer<'t> {
    table: &'t TokenTable,
    start_line: usize,
    source_label: String,
}

impl<'t> Tokenizer<'t> {
    pub fn new(table: &'t TokenTable) -> Tokenizer<'t> {
        Tokenizer {
            table,
            start_line: 1,
            source_label: String::new(),
        }
    }

    pub fn start_line(mut self, line: usize) -> Tokenizer<'t> {
        self.start_line = line;
        self
    }

    pub fn source_label(mut self, label: &str) -> Tokenizer<'t> {
        self.source_label = label.to_string();
        self
    }

    /// Produce the ordered token stream for `text`.
    ///
    /// Empty input yields an empty stream. Tokens carry the line they start
    /// on; the counter advances by the newlines inside each match, whether or
    /// not the match is emitted.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        let mut offset = 0;
        let mut line = self.start_line;

        while offset < text.len() {
            let rest = &text[offset..];
            let hit = self
                .table
                .defs()
                .iter()
                .find_map(|def| def.match_len(rest).map(|len| (def, len)));

            let (def, len) = match hit {
                Some(hit) => hit,
                None => return Err(TokenizeError::no_match(rest, text, line, &self.source_label)),
            };

            let value = &rest[..len];
            if !self.table.is_ignored(def.id()) {
                tokens.push(Token {
                    id: def.id(),
                    value: value.to_string(),
                    line,
                    source: self.source_label.clone(),
                });
            }
            line += value.matches('\n').count();
            offset += len;
        }

        Ok(tokens)
    }
}
