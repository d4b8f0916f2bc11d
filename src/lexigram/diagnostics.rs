//! Shared diagnostic records and error types
//!
//! Every failing stage, tokenizer or analyzer, reports through the same
//! [`ErrorRecord`] shape, so callers can handle diagnostics uniformly. The
//! record travels inside the returned error value; there is no shared
//! last-error slot and no partial result accompanies a failure.
//!
//! Setup-time validation failures (bad patterns, duplicate rules, wrong
//! operator arity) use [`RuleDefinitionError`] and are never raised during
//! analysis.

use std::fmt;

use crate::lexigram::token::{Token, TokenId, TokenTable};

/// Which component produced a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Component {
    Tokenizer,
    Analyzer,
}

/// What a failing component has to say about the failure point.
///
/// Analyzer failures carry the set of terminal ids that would have been
/// accepted; tokenizer failures (and analyzer-internal conditions such as a
/// dangling rule reference or the depth guard) carry a free-text message.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Payload {
    Expected(Vec<TokenId>),
    Message(String),
}

/// The diagnostic record shared by tokenizer and analyzer failures.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorRecord {
    /// Component that failed.
    pub component: Component,
    /// Internal phase of that component, for log correlation.
    pub context: &'static str,
    /// Line the failure is reported at.
    pub line: usize,
    /// Offending token, if the failure points at one. A record pointing past
    /// the end of the stream carries a [`TokenId::SYNTHETIC`] token derived
    /// from the previous token's location.
    pub token: Option<Token>,
    /// Expected-set or free-text detail.
    pub payload: Payload,
}

impl ErrorRecord {
    /// Render the payload through a table's name lookup.
    pub fn payload_text(&self, table: &TokenTable) -> String {
        match &self.payload {
            Payload::Expected(ids) => {
                let names: Vec<String> = ids.iter().map(|id| table.name_of(*id)).collect();
                names.join(", ")
            }
            Payload::Message(msg) => msg.clone(),
        }
    }
}

fn fmt_expected(ids: &[TokenId]) -> String {
    let rendered: Vec<String> = ids.iter().map(|id| format!("#{}", id)).collect();
    rendered.join(", ")
}

/// Tokenization failure. No partial token list is ever returned.
#[derive(Debug, Clone)]
pub enum TokenizeError {
    /// No token definition matches the remaining input at some offset.
    NoMatch {
        record: ErrorRecord,
        /// The input from the offending offset onward.
        remainder: String,
        /// The full original input, for context rendering.
        input: String,
    },
}

impl TokenizeError {
    pub(crate) fn no_match(rest: &str, input: &str, line: usize, source: &str) -> TokenizeError {
        let shown: String = rest.chars().take(24).collect();
        TokenizeError::NoMatch {
            record: ErrorRecord {
                component: Component::Tokenizer,
                context: "scan",
                line,
                token: None,
                payload: Payload::Message(format!("no token definition matches `{}`", shown)),
            },
            remainder: rest.to_string(),
            input: input.to_string(),
        }
    }

    pub fn record(&self) -> &ErrorRecord {
        match self {
            TokenizeError::NoMatch { record, .. } => record,
        }
    }
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::NoMatch { record, .. } => match &record.payload {
                Payload::Message(msg) => write!(f, "line {}: {}", record.line, msg),
                Payload::Expected(ids) => {
                    write!(f, "line {}: expected {}", record.line, fmt_expected(ids))
                }
            },
        }
    }
}

impl std::error::Error for TokenizeError {}

/// The token stream does not satisfy the grammar.
///
/// Each variant carries the shared record; the variants distinguish the
/// failure shape a caller may want to branch on.
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// A token was found where the grammar required something else.
    Mismatch(ErrorRecord),
    /// The stream ended while the grammar still required tokens.
    PrematureEnd(ErrorRecord),
    /// The grammar was satisfied but tokens remain unconsumed.
    TrailingInput(ErrorRecord),
    /// A rule body references a name that is not in the registry.
    UndefinedRule(ErrorRecord),
    /// The configured recursion depth was exhausted before a decision.
    DepthLimit(ErrorRecord),
}

impl AnalysisError {
    pub fn record(&self) -> &ErrorRecord {
        match self {
            AnalysisError::Mismatch(r)
            | AnalysisError::PrematureEnd(r)
            | AnalysisError::TrailingInput(r)
            | AnalysisError::UndefinedRule(r)
            | AnalysisError::DepthLimit(r) => r,
        }
    }

    /// Human-oriented one-line description with token names resolved.
    pub fn describe(&self, table: &TokenTable) -> String {
        let record = self.record();
        let detail = record.payload_text(table);
        match self {
            AnalysisError::Mismatch(r) => {
                let found = r
                    .token
                    .as_ref()
                    .map(|t| table.name_of(t.id))
                    .unwrap_or_default();
                format!(
                    "line {}: found {}, expected one of: {}",
                    r.line, found, detail
                )
            }
            AnalysisError::PrematureEnd(r) => {
                format!("line {}: input ended, expected one of: {}", r.line, detail)
            }
            AnalysisError::TrailingInput(r) => {
                let found = r
                    .token
                    .as_ref()
                    .map(|t| t.value.clone())
                    .unwrap_or_default();
                format!("line {}: unconsumed input starting at `{}`", r.line, found)
            }
            AnalysisError::UndefinedRule(r) => format!("line {}: {}", r.line, detail),
            AnalysisError::DepthLimit(r) => format!("line {}: {}", r.line, detail),
        }
    }
}

// Display has no table to resolve names through, so expected sets render as
// numeric ids. `describe` is the named form.
impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record();
        match (self, &record.payload) {
            (AnalysisError::TrailingInput(_), _) => {
                write!(f, "line {}: unconsumed input", record.line)
            }
            (_, Payload::Expected(ids)) => write!(
                f,
                "line {}: expected one of: {}",
                record.line,
                fmt_expected(ids)
            ),
            (_, Payload::Message(msg)) => write!(f, "line {}: {}", record.line, msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Setup-time grammar construction failure. Never raised during analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDefinitionError {
    /// The rule id is already registered.
    DuplicateRule(String),
    /// A second rule was marked initial.
    DuplicateInitial { existing: String, rejected: String },
    /// An operator key outside the four composition operators.
    InvalidOperator(String),
    /// `option` must carry exactly one operand.
    InvalidOptionArity { rule: String, found: usize },
    /// A token pattern failed to compile.
    InvalidPattern { name: String, error: String },
}

impl fmt::Display for RuleDefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleDefinitionError::DuplicateRule(name) => {
                write!(f, "rule `{}` is already registered", name)
            }
            RuleDefinitionError::DuplicateInitial { existing, rejected } => write!(
                f,
                "rule `{}` cannot be initial: `{}` already is",
                rejected, existing
            ),
            RuleDefinitionError::InvalidOperator(op) => {
                write!(f, "unknown grammar operator `{}`", op)
            }
            RuleDefinitionError::InvalidOptionArity { rule, found } => write!(
                f,
                "option in rule `{}` takes exactly one operand, found {}",
                rule, found
            ),
            RuleDefinitionError::InvalidPattern { name, error } => {
                write!(f, "pattern for token `{}` does not compile: {}", name, error)
            }
        }
    }
}

impl std::error::Error for RuleDefinitionError {}

/// Format source code context around a failing line.
///
/// Shows 2 lines before the line, the line itself with a >> marker, and 2
/// lines after, all numbered. `line` is 1-indexed, matching token line
/// numbers.
pub fn format_source_context(source: &str, line: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = line.saturating_sub(1); // 0-indexed

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for line_num in start_line..end_line {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!(
            "{} {:3} | {}\n",
            marker,
            line_num + 1,
            lines[line_num]
        ));
    }
    context
}
