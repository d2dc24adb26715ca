//! # mewa-grammar
//!
//! The grammar-file lexer and parser (§4.3): directives, token
//! definitions, productions with priorities/associativity/calls, and
//! post-parse validation (start-symbol uniqueness, reachability,
//! identifier resolution, the non-state bit-width budgets of §3).
//!
//! ```
//! use mewa_grammar::parse_and_validate;
//!
//! let grammar = parse_and_validate(r#"
//!     S = N ;
//!     N = V "=" E (assign) | E (expr) ;
//!     E = V (id) | "*" E (deref) ;
//!     V = IDENT (var) ;
//! "#).unwrap();
//!
//! assert_eq!(grammar.nonterminals[grammar.start_symbol as usize], "S");
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod resolved;
pub mod validate;

pub use ast::{Associativity, Call, CallArg, CommentDef, GrammarFile, Production, RhsSymbol, TokenDef};
pub use resolved::{ResolvedGrammar, ResolvedProduction, SymbolRef};

use mewa_base::error::Result;

/// Parses and validates a grammar file in one step.
pub fn parse_and_validate(src: &str) -> Result<ResolvedGrammar> {
    validate::validate(parser::parse(src)?)
}
