//! High-level language façade
//!
//! A [`Language`] bundles a token table and a grammar and sequences the full
//! pass: tokenize, analyze, and, only when the stream is valid, dispatch
//! the registered token events. Both halves stay reachable individually for
//! callers that want to stop between stages.

use std::fmt;

use crate::lexigram::analysis::{dispatch, Analyzer, DEFAULT_DEPTH_LIMIT};
use crate::lexigram::diagnostics::{AnalysisError, ErrorRecord, TokenizeError};
use crate::lexigram::grammar::Grammar;
use crate::lexigram::lexing::Tokenizer;
use crate::lexigram::token::{Token, TokenId, TokenTable};

/// Failure of a full pass: either stage's error, unchanged.
#[derive(Debug, Clone)]
pub enum LanguageError {
    Tokenize(TokenizeError),
    Analysis(AnalysisError),
}

impl LanguageError {
    /// The diagnostic record shared by both failure shapes.
    pub fn record(&self) -> &ErrorRecord {
        match self {
            LanguageError::Tokenize(err) => err.record(),
            LanguageError::Analysis(err) => err.record(),
        }
    }
}

impl fmt::Display for LanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageError::Tokenize(err) => write!(f, "tokenize error: {}", err),
            LanguageError::Analysis(err) => write!(f, "analysis error: {}", err),
        }
    }
}

impl std::error::Error for LanguageError {}

impl From<TokenizeError> for LanguageError {
    fn from(err: TokenizeError) -> Self {
        LanguageError::Tokenize(err)
    }
}

impl From<AnalysisError> for LanguageError {
    fn from(err: AnalysisError) -> Self {
        LanguageError::Analysis(err)
    }
}

/// A complete language definition: token table plus grammar.
///
/// Built once and immutable during use, except for event registration which
/// happens between construction and the first run.
pub struct Language {
    table: TokenTable,
    grammar: Grammar,
    depth_limit: usize,
}

impl std::fmt::Debug for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Language")
            .field("table", &self.table)
            .field("depth_limit", &self.depth_limit)
            .finish_non_exhaustive()
    }
}

impl Language {
    pub fn new(table: TokenTable, grammar: Grammar) -> Language {
        Language {
            table,
            grammar,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }

    pub fn with_depth_limit(mut self, limit: usize) -> Language {
        self.depth_limit = limit;
        self
    }

    pub fn table(&self) -> &TokenTable {
        &self.table
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Register an event callback; see [`Grammar::on_token`].
    pub fn on_token<F>(&mut self, id: TokenId, callback: F)
    where
        F: Fn(&Token) + 'static,
    {
        self.grammar.on_token(id, callback);
    }

    /// Tokenize with default location settings.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        self.tokenizer().tokenize(text)
    }

    /// A tokenizer over this language's table, for callers that need to set
    /// a start line or source label.
    pub fn tokenizer(&self) -> Tokenizer<'_> {
        Tokenizer::new(&self.table)
    }

    /// Analyze an already-produced stream.
    pub fn analyze(&self, tokens: &[Token]) -> Result<(), AnalysisError> {
        Analyzer::new(&self.grammar)
            .with_depth_limit(self.depth_limit)
            .analyze(tokens)
    }

    /// Full pass: tokenize, analyze, dispatch events, return the stream.
    ///
    /// Events fire only when analysis succeeded; a failure at either stage
    /// returns that stage's error with no partial result.
    pub fn run(&self, text: &str) -> Result<Vec<Token>, LanguageError> {
        let tokens = self.tokenize(text)?;
        self.analyze(&tokens)?;
        dispatch(&self.grammar, &tokens);
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexigram::grammar::RuleNode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn digits_language() -> Language {
        let mut table = TokenTable::new();
        let digit = table.define("DIGIT", "[0-9]").unwrap();

        let mut grammar = Grammar::new();
        grammar
            .register_initial(
                "number",
                RuleNode::Concatenation(vec![
                    RuleNode::Terminal(digit),
                    RuleNode::Repeat(vec![RuleNode::Terminal(digit)]),
                ]),
            )
            .unwrap();

        Language::new(table, grammar)
    }

    #[test]
    fn test_run_returns_full_stream() {
        let language = digits_language();
        let tokens = language.run("123").unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_events_fire_only_on_success() {
        let mut language = digits_language();
        let count = Rc::new(RefCell::new(0));
        {
            let count = Rc::clone(&count);
            language.on_token(TokenId(0), move |_| *count.borrow_mut() += 1);
        }

        language.run("x").unwrap_err(); // tokenize failure
        assert_eq!(*count.borrow(), 0);

        language.run("12").unwrap();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_stage_errors_surface_unchanged() {
        let language = digits_language();

        let err = language.run("abc").unwrap_err();
        assert!(matches!(err, LanguageError::Tokenize(_)));

        let err = language.run("").unwrap_err();
        assert!(matches!(
            err,
            LanguageError::Analysis(AnalysisError::PrematureEnd(_))
        ));
    }
}
