//! Post-success event dispatch
//!
//! Callbacks registered on token ids fire only once a stream has been
//! confirmed valid: the dispatcher walks the original stream in order and
//! invokes each id's callbacks in registration order. A failing analysis
//! fires nothing, and tokens touched inside abandoned backtracking branches
//! are never observed: dispatch reads the stream, not the match trace.

use crate::lexigram::grammar::Grammar;
use crate::lexigram::token::Token;

/// Fire all registered callbacks over a validated stream.
///
/// Callers are expected to have analyzed `tokens` successfully first; the
/// façade enforces this ordering.
pub fn dispatch(grammar: &Grammar, tokens: &[Token]) {
    for token in tokens {
        for callback in grammar.callbacks_for(token.id) {
            callback(token);
        }
    }
}
