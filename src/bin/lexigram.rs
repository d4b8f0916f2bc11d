//! Command-line interface for lexigram
//! Validates input files against a language definition and inspects the
//! definition itself.
//!
//! Usage:
//!   lexigram check `<path>` --grammar `<def>`   - Tokenize and analyze a file
//!   lexigram tokens `<path>` --grammar `<def>`  - Print the token stream as JSON
//!   lexigram render --grammar `<def>`           - Print the grammar in EBNF-like form

use clap::{Arg, Command};
use std::path::Path;
use std::process;

use lexigram::lexigram::diagnostics::format_source_context;
use lexigram::lexigram::grammar::render::grammar_to_string;
use lexigram::lexigram::loader;
use lexigram::lexigram::pipeline::{Language, LanguageError};

fn main() {
    let grammar_arg = Arg::new("grammar")
        .long("grammar")
        .short('g')
        .help("Path to the language definition (.json, .yaml or .yml)")
        .required(true);

    let matches = Command::new("lexigram")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for validating text against table-driven grammars")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("check")
                .about("Tokenize and analyze an input file")
                .arg(
                    Arg::new("path")
                        .help("Path to the input file")
                        .required(true)
                        .index(1),
                )
                .arg(grammar_arg.clone()),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream for an input file as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the input file")
                        .required(true)
                        .index(1),
                )
                .arg(grammar_arg.clone()),
        )
        .subcommand(
            Command::new("render")
                .about("Print the grammar in EBNF-like textual form")
                .arg(grammar_arg),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", sub)) => {
            let language = load_language(sub.get_one::<String>("grammar").unwrap());
            let path = sub.get_one::<String>("path").unwrap();
            handle_check_command(&language, path);
        }
        Some(("tokens", sub)) => {
            let language = load_language(sub.get_one::<String>("grammar").unwrap());
            let path = sub.get_one::<String>("path").unwrap();
            handle_tokens_command(&language, path);
        }
        Some(("render", sub)) => {
            let language = load_language(sub.get_one::<String>("grammar").unwrap());
            print!("{}", grammar_to_string(language.grammar(), language.table()));
        }
        _ => unreachable!(),
    }
}

/// Load and build the language definition, or exit with a diagnostic.
fn load_language(path: &str) -> Language {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            process::exit(1);
        }
    };

    let is_yaml = matches!(
        Path::new(path).extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let loaded = if is_yaml {
        loader::from_yaml(&text)
    } else {
        loader::from_json(&text)
    };

    match loaded {
        Ok(language) => language,
        Err(e) => {
            eprintln!("Error in {}: {}", path, e);
            process::exit(1);
        }
    }
}

/// Handle the check command: report success, or the failing stage's
/// diagnostic with a source excerpt.
fn handle_check_command(language: &Language, path: &str) {
    let text = read_input(path);
    match language.run(&text) {
        Ok(tokens) => {
            println!("{}: ok ({} tokens)", path, tokens.len());
        }
        Err(err) => {
            let description = match &err {
                LanguageError::Tokenize(e) => e.to_string(),
                LanguageError::Analysis(e) => e.describe(language.table()),
            };
            eprintln!("{}: {}", path, description);
            eprint!("{}", format_source_context(&text, err.record().line));
            process::exit(1);
        }
    }
}

/// Handle the tokens command: the stream as JSON on stdout.
fn handle_tokens_command(language: &Language, path: &str) {
    let text = read_input(path);
    match language.tokenize(&text) {
        Ok(tokens) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&tokens).expect("tokens serialize")
            );
        }
        Err(e) => {
            eprintln!("{}: {}", path, e);
            eprint!("{}", format_source_context(&text, e.record().line));
            process::exit(1);
        }
    }
}

fn read_input(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            process::exit(1);
        }
    }
}
