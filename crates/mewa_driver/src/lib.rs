#![cfg_attr(docsrs, feature(doc_cfg))]

//! # mewa-driver
//!
//! The regex-backed scanner and table-driven shift/reduce loop that
//! turns a [`mewa_lalr::ParserTables`] and a source string into a
//! sequence of host call-backs (§1 "driver", §4.5, §6 "Driver call
//! protocol").
//!
//! This crate knows nothing about what a host's reduced values *are* —
//! [`Host`] is generic over an opaque `V` — and nothing about type
//! checking, which is `mewa-types`'s concern. It only orchestrates
//! scanning and the shift/reduce automaton, plus the packed [`AstNode`]
//! representation a host can use to retain a full parse tree rather
//! than collapsing it eagerly.
//!
//! # Example
//!
//! ```
//! use mewa_driver::{Driver, Host};
//! use mewa_driver::scanner::LexerDef;
//! use mewa_base::{Scope, Step, error::Result};
//! use mewa_grammar::parse_and_validate;
//! use mewa_lalr::{build, CallEntry};
//!
//! struct Echo;
//! impl Host<String> for Echo {
//!     fn terminal_value(&mut self, _t: u16, lexeme: &[u8], _line: u32) -> Result<String> {
//!         Ok(String::from_utf8_lossy(lexeme).into_owned())
//!     }
//!     fn call(&mut self, call: &CallEntry, args: Vec<String>, _scope: Option<Scope>, _step: Step) -> Result<String> {
//!         Ok(format!("{}({})", call.function, args.join(",")))
//!     }
//! }
//!
//! // `A` is a named token, so it carries a value; a bare keyword
//! // literal in a production's RHS would shift without one (§4.5).
//! let grammar = parse_and_validate(r#"A : "a" ; S = A (leaf) ;"#).unwrap();
//! let built = build(&grammar).unwrap();
//! let lexer = LexerDef::compile(&grammar).unwrap();
//! let driver = Driver::new(&built.tables, &lexer);
//! let mut host = Echo;
//! let result = driver.parse("a", &mut host, String::new()).unwrap();
//! assert_eq!(result, "leaf(a)");
//! ```

pub mod ast;
pub mod driver;
pub mod scanner;

pub use ast::{AstArena, AstNode, Lexeme, NodeId, NodeScope};
pub use driver::{Driver, Host};
pub use scanner::{LexerDef, ScannedToken, Scanner};
