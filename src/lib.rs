//! # lexigram
//!
//! A table-driven lexing and grammar-validation toolkit.
//!
//! Callers register named token patterns in an ordered table and grammar rules
//! built from four composition operators (concatenation, alternation, option,
//! repeat) over token references. The toolkit turns raw text into a token
//! stream, decides whether that stream satisfies the grammar, and reports
//! precise diagnostics when it does not. No language grammar is built in; this
//! crate is the substrate for custom mini-language validators.

pub mod lexigram;
