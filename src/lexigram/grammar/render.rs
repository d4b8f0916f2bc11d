//! Textual grammar rendering
//!
//! Renders a registry to an EBNF-like listing, one rule per line in
//! registration order: `name = <expansion> ;`. Bracketing is fixed per
//! operator (concatenation comma-joined, alternation parenthesized and
//! pipe-joined, repeat brace-wrapped, option bracket-wrapped) and terminals
//! are shown through the table's name lookup. Purely cosmetic: the output
//! carries no parsing semantics and is not read back.

use crate::lexigram::grammar::{Grammar, RuleNode};
use crate::lexigram::token::TokenTable;

/// Render the whole registry, one line per rule.
pub fn grammar_to_string(grammar: &Grammar, table: &TokenTable) -> String {
    let mut out = String::new();
    for (name, node) in grammar.rules() {
        out.push_str(&format!("{} = {} ;\n", name, node_to_string(node, table)));
    }
    out
}

fn node_to_string(node: &RuleNode, table: &TokenTable) -> String {
    match node {
        RuleNode::Terminal(id) => table.name_of(*id),
        RuleNode::Rule(name) => name.clone(),
        RuleNode::Concatenation(children) => join(children, ", ", table),
        RuleNode::Alternation(children) => format!("( {} )", join(children, " | ", table)),
        RuleNode::Repeat(children) => format!("{{ {} }}", join(children, ", ", table)),
        RuleNode::Option(children) => format!("[ {} ]", join(children, ", ", table)),
    }
}

fn join(children: &[RuleNode], separator: &str, table: &TokenTable) -> String {
    let rendered: Vec<String> = children
        .iter()
        .map(|child| node_to_string(child, table))
        .collect();
    rendered.join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Grammar, TokenTable) {
        let mut table = TokenTable::new();
        let digit = table.define("DIGIT", "[0-9]").unwrap();
        let dot = table.define("DOT", r"\.").unwrap();
        let minus = table.define("MINUS", "-").unwrap();

        let mut grammar = Grammar::new();
        grammar
            .register(
                "number",
                RuleNode::Concatenation(vec![
                    RuleNode::Option(vec![RuleNode::Terminal(minus)]),
                    RuleNode::Terminal(digit),
                    RuleNode::Repeat(vec![RuleNode::Terminal(digit)]),
                    RuleNode::Option(vec![RuleNode::Rule("fraction".to_string())]),
                ]),
            )
            .unwrap();
        grammar
            .register(
                "fraction",
                RuleNode::Concatenation(vec![
                    RuleNode::Terminal(dot),
                    RuleNode::Alternation(vec![
                        RuleNode::Terminal(digit),
                        RuleNode::Rule("number".to_string()),
                    ]),
                ]),
            )
            .unwrap();
        (grammar, table)
    }

    #[test]
    fn test_render_fixed_bracketing() {
        let (grammar, table) = fixture();
        insta::assert_snapshot!(grammar_to_string(&grammar, &table), @r###"
        number = [ MINUS ], DIGIT, { DIGIT }, [ fraction ] ;
        fraction = DOT, ( DIGIT | number ) ;
        "###);
    }

    #[test]
    fn test_render_unresolvable_id_prints_unchanged() {
        let mut grammar = Grammar::new();
        grammar
            .register("lost", RuleNode::Terminal(crate::lexigram::token::TokenId(9)))
            .unwrap();
        let table = TokenTable::new();
        assert_eq!(grammar_to_string(&grammar, &table), "lost = 9 ;\n");
    }

    #[test]
    fn test_render_empty_grammar_is_empty() {
        let grammar = Grammar::new();
        let table = TokenTable::new();
        assert_eq!(grammar_to_string(&grammar, &table), "");
    }
}
