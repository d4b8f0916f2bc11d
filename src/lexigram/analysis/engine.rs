//! Recursive backtracking matcher over token streams
//!
//! The analyzer walks a rule tree against a token stream with three pieces of
//! shared state: the cursor `pos`, the `expected` set of terminal ids tried
//! unsuccessfully at the current position (cleared whenever a terminal
//! matches, so it always describes the furthest failure point), and a sticky
//! hard-error slot. A hard error is raised when a concatenation fails after
//! partial progress: at that point some prefix committed to this branch, and
//! silently backtracking out of it would hide the real failure. Once the slot
//! is set every enclosing alternative aborts without further backtracking,
//! with one exception: an option suppresses a hard error raised purely by its
//! own failed attempt, because the absence of an optional branch is never an
//! error.
//!
//! Child selection everywhere is first-match-wins in written order; see the
//! grammar module docs.

use std::collections::HashSet;

use crate::lexigram::diagnostics::{AnalysisError, Component, ErrorRecord, Payload};
use crate::lexigram::grammar::{Grammar, RuleNode};
use crate::lexigram::token::{Token, TokenId};

/// Default recursion limit. Each nested rule node costs one level, so this
/// bounds grammar nesting and rule-reference chains, not stream length.
pub const DEFAULT_DEPTH_LIMIT: usize = 128;

/// Shared mutable state for one analysis pass.
struct MatchState<'t> {
    tokens: &'t [Token],
    pos: usize,
    expected: Vec<TokenId>,
    error: Option<AnalysisError>,
    depth: usize,
}

impl<'t> MatchState<'t> {
    /// The token a diagnostic at the current cursor should point at: the
    /// token under the cursor, or past the end a synthetic sentinel token
    /// derived from the previous token's location. The flag reports whether
    /// the stream had ended.
    fn failure_token(&self) -> (Token, bool) {
        if self.pos < self.tokens.len() {
            (self.tokens[self.pos].clone(), false)
        } else {
            let token = match self.tokens.last() {
                Some(prev) => Token::synthetic(prev.line, &prev.source),
                None => Token::synthetic(1, ""),
            };
            (token, true)
        }
    }

    /// The expected set as reported: de-duplicated, first occurrence first.
    fn expected_dedup(&self) -> Vec<TokenId> {
        let mut seen = HashSet::new();
        self.expected
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    fn record(&self, context: &'static str, token: Token, payload: Payload) -> ErrorRecord {
        ErrorRecord {
            component: Component::Analyzer,
            context,
            line: token.line,
            token: Some(token),
            payload,
        }
    }
}

/// Grammar analyzer: decides whether a token stream satisfies a grammar.
pub struct Analyzer<'g> {
    grammar: &'g Grammar,
    depth_limit: usize,
}

impl<'g> Analyzer<'g> {
    pub fn new(grammar: &'g Grammar) -> Analyzer<'g> {
        Analyzer {
            grammar,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }

    /// Override the recursion limit. Runaway recursion (including left
    /// recursion through rule references) is reported as an error instead of
    /// exhausting the call stack.
    pub fn with_depth_limit(mut self, limit: usize) -> Analyzer<'g> {
        self.depth_limit = limit;
        self
    }

    /// Analyze one stream.
    ///
    /// The stream is valid iff the entry rule matched, no hard error was
    /// raised, and every token was consumed. The entry rule is the
    /// designated initial rule if one exists, otherwise an implicit
    /// alternation over every registered rule in registration order.
    pub fn analyze(&self, tokens: &[Token]) -> Result<(), AnalysisError> {
        let mut st = MatchState {
            tokens,
            pos: 0,
            expected: Vec::new(),
            error: None,
            depth: 0,
        };

        let matched = match self.grammar.initial() {
            Some(name) => {
                let node = RuleNode::Rule(name.to_string());
                self.match_node(&node, &mut st)
            }
            None => {
                let mut matched = false;
                for (_, node) in self.grammar.rules() {
                    if self.match_node(node, &mut st) {
                        matched = true;
                        break;
                    }
                    if st.error.is_some() {
                        break;
                    }
                }
                if !matched && st.error.is_none() {
                    st.pos = 0;
                }
                matched
            }
        };

        if let Some(error) = st.error.take() {
            return Err(error);
        }
        if matched && st.pos == tokens.len() {
            return Ok(());
        }

        let payload = Payload::Expected(st.expected_dedup());
        let (token, at_end) = st.failure_token();
        if matched {
            // The grammar was satisfied but tokens remain: report from the
            // first unconsumed token with whatever expected set is left.
            let record = st.record("trailing-input", token, payload);
            Err(AnalysisError::TrailingInput(record))
        } else if at_end {
            let record = st.record("stream-end", token, payload);
            Err(AnalysisError::PrematureEnd(record))
        } else {
            let record = st.record("no-match", token, payload);
            Err(AnalysisError::Mismatch(record))
        }
    }

    /// Evaluate one node. Returns whether it matched; hard failures
    /// additionally set the sticky error in `st`.
    fn match_node(&self, node: &RuleNode, st: &mut MatchState) -> bool {
        if st.depth >= self.depth_limit {
            let (token, _) = st.failure_token();
            let payload = Payload::Message(format!(
                "recursion depth limit of {} exceeded",
                self.depth_limit
            ));
            let record = st.record("depth-guard", token, payload);
            st.error = Some(AnalysisError::DepthLimit(record));
            return false;
        }
        st.depth += 1;
        let matched = self.match_node_inner(node, st);
        st.depth -= 1;
        matched
    }

    fn match_node_inner(&self, node: &RuleNode, st: &mut MatchState) -> bool {
        match node {
            RuleNode::Rule(name) => match self.grammar.resolve(name) {
                Some(resolved) => self.match_node(resolved, st),
                None => {
                    let (token, _) = st.failure_token();
                    let payload =
                        Payload::Message(format!("reference to undefined rule `{}`", name));
                    let record = st.record("rule-lookup", token, payload);
                    st.error = Some(AnalysisError::UndefinedRule(record));
                    false
                }
            },

            RuleNode::Terminal(id) => {
                if st.pos < st.tokens.len() && st.tokens[st.pos].id == *id {
                    st.pos += 1;
                    st.expected.clear();
                    true
                } else {
                    st.expected.push(*id);
                    false
                }
            }

            RuleNode::Concatenation(children) => {
                let start = st.pos;
                for child in children {
                    if self.match_node(child, st) {
                        continue;
                    }
                    if st.error.is_none() {
                        if st.pos > start {
                            // Partial progress: this branch committed, so the
                            // failure is promoted to a hard error instead of
                            // silently backtracking.
                            self.promote(st);
                        } else {
                            st.pos = start;
                        }
                    }
                    return false;
                }
                true
            }

            RuleNode::Alternation(children) => {
                let entry = st.pos;
                if self.match_first(children, st) {
                    true
                } else {
                    if st.error.is_none() {
                        st.pos = entry;
                    }
                    false
                }
            }

            RuleNode::Option(children) => {
                let entry = st.pos;
                if self.match_first(children, st) {
                    true
                } else {
                    // The absence of an optional branch is never an error: a
                    // hard error raised purely by this attempt is suppressed.
                    st.error = None;
                    st.pos = entry;
                    true
                }
            }

            RuleNode::Repeat(children) => loop {
                let entry = st.pos;
                if self.match_first(children, st) {
                    if st.pos == entry {
                        // A zero-width iteration cannot make progress;
                        // repeating it again would never terminate.
                        return true;
                    }
                } else {
                    if st.error.is_some() {
                        return false;
                    }
                    st.pos = entry;
                    return true;
                }
            },
        }
    }

    /// Shared inner loop of alternation, option and repeat: try children in
    /// order and take the first that matches. A hard error during any try
    /// fails the whole loop immediately.
    fn match_first(&self, children: &[RuleNode], st: &mut MatchState) -> bool {
        for child in children {
            if self.match_node(child, st) {
                return true;
            }
            if st.error.is_some() {
                return false;
            }
        }
        false
    }

    /// Build the hard error for a concatenation that failed after progress.
    fn promote(&self, st: &mut MatchState) {
        let payload = Payload::Expected(st.expected_dedup());
        let (token, at_end) = st.failure_token();
        let record = st.record("sequence", token, payload);
        st.error = Some(if at_end {
            AnalysisError::PrematureEnd(record)
        } else {
            AnalysisError::Mismatch(record)
        });
    }
}
