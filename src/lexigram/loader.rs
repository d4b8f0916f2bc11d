//! Language-definition loader
//!
//! Reads a complete language definition (token table, rules, optional
//! initial rule) from JSON or YAML and builds a validated [`Language`].
//! Rules are written as operator-keyed trees:
//!
//! ```yaml
//! tokens:
//!   - { name: DIGIT, pattern: "[0-9]" }
//!   - { name: WHITESPACE, pattern: "\\s+", ignored: true }
//! rules:
//!   - name: number
//!     node:
//!       concatenation:
//!         - DIGIT
//!         - repeat: [DIGIT]
//! initial: number
//! ```
//!
//! A bare string operand names a token if one is registered under that name,
//! otherwise it is a rule reference (tokens shadow rules on a name clash).
//! Unknown operator keys are rejected as definition errors, not syntax
//! errors. Event callbacks have no serialized form; they are registered on
//! the built language programmatically.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::lexigram::diagnostics::RuleDefinitionError;
use crate::lexigram::grammar::{Grammar, RuleNode};
use crate::lexigram::pipeline::Language;
use crate::lexigram::token::{TokenId, TokenTable};

/// Serialized form of a complete language definition.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LanguageSpec {
    pub tokens: Vec<TokenSpec>,
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub initial: Option<String>,
}

/// One token definition. Order in the list is matching priority.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenSpec {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub ignored: bool,
}

/// One named rule.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub node: NodeSpec,
}

/// One node of a serialized rule tree: either a bare name or a single-entry
/// map from operator key to operand list.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Name(String),
    Operator(BTreeMap<String, Vec<NodeSpec>>),
}

/// Loader failure: unreadable text, an invalid definition, or an initial
/// rule that names nothing.
#[derive(Debug, Clone)]
pub enum LoaderError {
    Syntax(String),
    Definition(RuleDefinitionError),
    UnknownInitial(String),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::Syntax(msg) => write!(f, "definition does not parse: {}", msg),
            LoaderError::Definition(err) => write!(f, "invalid definition: {}", err),
            LoaderError::UnknownInitial(name) => {
                write!(f, "initial rule `{}` is not defined", name)
            }
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<RuleDefinitionError> for LoaderError {
    fn from(err: RuleDefinitionError) -> Self {
        LoaderError::Definition(err)
    }
}

/// Load a language from JSON text.
pub fn from_json(text: &str) -> Result<Language, LoaderError> {
    let spec: LanguageSpec =
        serde_json::from_str(text).map_err(|e| LoaderError::Syntax(e.to_string()))?;
    build_language(&spec)
}

/// Load a language from YAML text.
pub fn from_yaml(text: &str) -> Result<Language, LoaderError> {
    let spec: LanguageSpec =
        serde_yaml::from_str(text).map_err(|e| LoaderError::Syntax(e.to_string()))?;
    build_language(&spec)
}

/// Build a validated language from a parsed spec.
pub fn build_language(spec: &LanguageSpec) -> Result<Language, LoaderError> {
    let mut table = TokenTable::new();
    let mut token_ids: HashMap<String, TokenId> = HashMap::new();
    for token in &spec.tokens {
        let id = if token.ignored {
            table.define_ignored(&token.name, &token.pattern)?
        } else {
            table.define(&token.name, &token.pattern)?
        };
        token_ids.insert(token.name.clone(), id);
    }

    let mut grammar = Grammar::new();
    for rule in &spec.rules {
        let node = build_node(&rule.node, &token_ids)?;
        if spec.initial.as_deref() == Some(rule.name.as_str()) {
            grammar.register_initial(&rule.name, node)?;
        } else {
            grammar.register(&rule.name, node)?;
        }
    }

    if let Some(initial) = &spec.initial {
        if !grammar.has_rule(initial) {
            return Err(LoaderError::UnknownInitial(initial.clone()));
        }
    }

    Ok(Language::new(table, grammar))
}

fn build_node(
    spec: &NodeSpec,
    token_ids: &HashMap<String, TokenId>,
) -> Result<RuleNode, RuleDefinitionError> {
    match spec {
        NodeSpec::Name(name) => Ok(match token_ids.get(name) {
            Some(id) => RuleNode::Terminal(*id),
            None => RuleNode::Rule(name.clone()),
        }),
        NodeSpec::Operator(map) => {
            if map.len() != 1 {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                return Err(RuleDefinitionError::InvalidOperator(keys.join("+")));
            }
            let (operator, operands) = map.iter().next().expect("map has one entry");
            let children = operands
                .iter()
                .map(|child| build_node(child, token_ids))
                .collect::<Result<Vec<RuleNode>, RuleDefinitionError>>()?;

            match operator.as_str() {
                "concatenation" => Ok(RuleNode::Concatenation(children)),
                "alternation" => Ok(RuleNode::Alternation(children)),
                "option" => Ok(RuleNode::Option(children)),
                "repeat" => Ok(RuleNode::Repeat(children)),
                other => Err(RuleDefinitionError::InvalidOperator(other.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBER_YAML: &str = r#"
tokens:
  - { name: DIGIT, pattern: "[0-9]" }
  - { name: WHITESPACE, pattern: "[ \\t]+", ignored: true }
rules:
  - name: number
    node:
      concatenation:
        - DIGIT
        - repeat: [DIGIT]
initial: number
"#;

    #[test]
    fn test_yaml_round_trip_through_analysis() {
        let language = from_yaml(NUMBER_YAML).unwrap();
        assert!(language.run("123").is_ok());
        assert!(language.run("  42").is_ok());
        assert!(language.run("12a").is_err());
    }

    #[test]
    fn test_json_definition() {
        let json = r#"{
            "tokens": [{ "name": "WORD", "pattern": "[a-z]+" }],
            "rules": [{ "name": "word", "node": "WORD" }]
        }"#;
        let language = from_json(json).unwrap();
        assert!(language.run("hello").is_ok());
    }

    #[test]
    fn test_unknown_operator_is_definition_error() {
        let yaml = r#"
tokens:
  - { name: A, pattern: "a" }
rules:
  - name: start
    node:
      permutation: [A]
"#;
        let err = from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Definition(RuleDefinitionError::InvalidOperator(ref op)) if op == "permutation"
        ));
    }

    #[test]
    fn test_option_arity_checked_at_registration() {
        let yaml = r#"
tokens:
  - { name: A, pattern: "a" }
  - { name: B, pattern: "b" }
rules:
  - name: start
    node:
      option: [A, B]
"#;
        let err = from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Definition(RuleDefinitionError::InvalidOptionArity { found: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_initial_rejected() {
        let yaml = r#"
tokens:
  - { name: A, pattern: "a" }
rules:
  - name: start
    node: A
initial: missing
"#;
        let err = from_yaml(yaml).unwrap_err();
        assert!(matches!(err, LoaderError::UnknownInitial(ref name) if name == "missing"));
    }

    #[test]
    fn test_bare_name_prefers_token_over_rule() {
        // A rule and a token share the name `word`; the reference must bind
        // to the token.
        let yaml = r#"
tokens:
  - { name: word, pattern: "[a-z]+" }
rules:
  - name: word
    node: word
initial: word
"#;
        let language = from_yaml(yaml).unwrap();
        assert!(language.run("abc").is_ok());
    }
}
