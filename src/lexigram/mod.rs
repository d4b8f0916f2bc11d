//! Main module for lexigram library functionality
//!
//! The crate splits along the data flow: `token` and `lexing` turn text into
//! token streams, `grammar` holds the validated rule registry, `analysis`
//! decides whether a stream satisfies the registry, and `pipeline` sequences
//! the three. `loader` reads serialized language definitions and `diagnostics`
//! carries the record shape shared by every failing stage.

pub mod analysis;
pub mod diagnostics;
pub mod grammar;
pub mod lexing;
pub mod loader;
pub mod pipeline;
pub mod token;

pub use analysis::Analyzer;
pub use diagnostics::{AnalysisError, ErrorRecord, RuleDefinitionError, TokenizeError};
pub use grammar::{Grammar, RuleNode};
pub use lexing::Tokenizer;
pub use pipeline::{Language, LanguageError};
pub use token::{Token, TokenId, TokenTable};
