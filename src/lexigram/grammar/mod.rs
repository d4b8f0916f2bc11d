//! Rule trees and the grammar registry
//!
//! A grammar is an ordered registry of named rule trees plus an optional
//! distinguished initial rule and the per-token event callbacks. It is built
//! once and is immutable during analysis.
//!
//! Child selection in `Alternation`, `Option` and `Repeat` is
//! first-match-wins, never longest-match: children are tried in the order
//! they were written and the first that matches is taken. A grammar whose
//! meaning depends on which of two overlapping children is listed first is
//! depending on that order as semantics; this is the contract, not an
//! accident of the implementation. Likewise rules themselves keep
//! registration order, which is the trial order of the implicit top-level
//! alternation used when no initial rule is designated.

use std::collections::HashMap;

use crate::lexigram::diagnostics::RuleDefinitionError;
use crate::lexigram::token::{Token, TokenId};

pub mod render;

/// Callback fired for one token after its stream has been validated.
pub type TokenCallback = Box<dyn Fn(&Token)>;

/// One node of a rule tree.
///
/// `Rule` references are resolved by name through the registry at match
/// time, not by embedded pointers, so rules may reference themselves and
/// each other freely. Recursion is bounded only by the analyzer's depth
/// guard.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleNode {
    /// A single terminal token.
    Terminal(TokenId),
    /// A by-name reference to another rule in the registry.
    Rule(String),
    /// Every child in order (AND).
    Concatenation(Vec<RuleNode>),
    /// First matching child (ordered OR).
    Alternation(Vec<RuleNode>),
    /// Zero or one. The operand list must hold exactly one node; any other
    /// arity is rejected at registration.
    Option(Vec<RuleNode>),
    /// Zero or more iterations of the first-matching child.
    Repeat(Vec<RuleNode>),
}

/// Ordered rule registry with optional initial rule and event callbacks.
pub struct Grammar {
    rules: Vec<(String, RuleNode)>,
    index: HashMap<String, usize>,
    initial: Option<String>,
    events: HashMap<TokenId, Vec<TokenCallback>>,
}

impl Grammar {
    pub fn new() -> Grammar {
        Grammar {
            rules: Vec::new(),
            index: HashMap::new(),
            initial: None,
            events: HashMap::new(),
        }
    }

    /// Register a rule under a fresh name.
    ///
    /// The tree is validated recursively; re-registering a name is rejected.
    pub fn register(&mut self, name: &str, node: RuleNode) -> Result<(), RuleDefinitionError> {
        if self.index.contains_key(name) {
            return Err(RuleDefinitionError::DuplicateRule(name.to_string()));
        }
        validate(name, &node)?;

        self.index.insert(name.to_string(), self.rules.len());
        self.rules.push((name.to_string(), node));
        Ok(())
    }

    /// Register a rule and mark it as the analysis entry point.
    ///
    /// At most one rule may be initial; a second registration is rejected.
    pub fn register_initial(
        &mut self,
        name: &str,
        node: RuleNode,
    ) -> Result<(), RuleDefinitionError> {
        if let Some(existing) = &self.initial {
            return Err(RuleDefinitionError::DuplicateInitial {
                existing: existing.clone(),
                rejected: name.to_string(),
            });
        }
        self.register(name, node)?;
        self.initial = Some(name.to_string());
        Ok(())
    }

    /// Append a callback to a token id's list. Multiple registrations are
    /// legal and fire in registration order.
    pub fn on_token<F>(&mut self, id: TokenId, callback: F)
    where
        F: Fn(&Token) + 'static,
    {
        self.events.entry(id).or_default().push(Box::new(callback));
    }

    /// Resolve a rule name to its tree.
    pub fn resolve(&self, name: &str) -> Option<&RuleNode> {
        self.index.get(name).map(|i| &self.rules[*i].1)
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The designated initial rule, if any.
    pub fn initial(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    /// All rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &RuleNode)> {
        self.rules.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Callbacks registered for an id, in registration order.
    pub(crate) fn callbacks_for(&self, id: TokenId) -> &[TokenCallback] {
        self.events.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for Grammar {
    fn default() -> Grammar {
        Grammar::new()
    }
}

/// Recursive tree validation: only the option arity can go wrong through the
/// typed API; operator identity and list-shaped operands are guaranteed by
/// the enum itself.
fn validate(rule: &str, node: &RuleNode) -> Result<(), RuleDefinitionError> {
    match node {
        RuleNode::Terminal(_) | RuleNode::Rule(_) => Ok(()),
        RuleNode::Option(children) => {
            if children.len() != 1 {
                return Err(RuleDefinitionError::InvalidOptionArity {
                    rule: rule.to_string(),
                    found: children.len(),
                });
            }
            validate(rule, &children[0])
        }
        RuleNode::Concatenation(children)
        | RuleNode::Alternation(children)
        | RuleNode::Repeat(children) => {
            for child in children {
                validate(rule, child)?;
            }
            Ok(())
        }
    }
}
