#![cfg_attr(docsrs, feature(doc_cfg))]

//! # mewa
//!
//! A compiler-generator toolkit. From a single grammar source file (an
//! attributed EBNF with embedded semantic-action references, §4.3) this
//! crate produces a deterministic bottom-up LALR(1) parser and exposes a
//! runtime scoped type/object/reduction database a host language uses to
//! express the semantics of whatever it parses (§1).
//!
//! ## Architecture
//!
//! ```text
//! grammar source -> [mewa-grammar] -> [mewa-lalr] -> action/goto/call tables
//!                                                           |
//!   source program -> [mewa-driver::Scanner] -> token stream
//!                                                           v
//!                                           [mewa-driver::Driver] -- reductions --> host
//!                                                                                     |
//!                                                                                     v
//!                                                                      [mewa-types::TypeDatabase]
//!                                                                     (objects, types, reductions)
//! ```
//!
//! ## Crates
//!
//! - [`mewa_base`]: identifier interning, arenas, spans, scopes, the
//!   scoped-map primitives and the stable error-code space every other
//!   crate shares.
//! - [`mewa_grammar`]: the grammar-file lexer and parser, and post-parse
//!   validation.
//! - [`mewa_lalr`]: the LALR(1) table generator.
//! - [`mewa_driver`]: the regex-backed scanner and the shift/reduce
//!   driver loop.
//! - [`mewa_types`]: the scoped type/object/reduction database and its
//!   Dijkstra-style search operations.
//!
//! This crate ties them together behind [`Automaton`] (a compiled
//! grammar, §1 "a single-file grammar -> single `Automaton` value") and
//! re-exports [`Driver`]/[`Host`] and [`TypeDatabase`] so a host embeds
//! one crate rather than five. It also defines [`document::TableDocument`],
//! the serializable rendering of §6's "Emitted tables format" — the only
//! place in the workspace serde appears, since none of the core crates
//! need a wire format of their own.
//!
//! No crate in this workspace provides a command-line binary, file I/O
//! convenience wrapper, or message localisation; those remain host
//! responsibilities per §1's explicit scope boundary (§A of
//! `SPEC_FULL.md`).
//!
//! # Example
//!
//! ```
//! use mewa::{Automaton, Host};
//! use mewa_base::{Scope, Step, error::Result};
//! use mewa_lalr::CallEntry;
//!
//! enum Value { Leaf(String), Node(String, Vec<Value>) }
//!
//! struct TreeBuilder;
//! impl Host<Value> for TreeBuilder {
//!     fn terminal_value(&mut self, _t: u16, lexeme: &[u8], _line: u32) -> Result<Value> {
//!         Ok(Value::Leaf(String::from_utf8_lossy(lexeme).into_owned()))
//!     }
//!     fn call(&mut self, call: &CallEntry, args: Vec<Value>, _scope: Option<Scope>, _step: Step) -> Result<Value> {
//!         Ok(Value::Node(call.function.clone(), args))
//!     }
//! }
//!
//! let automaton = Automaton::compile(r#"S = "a" (leaf) ;"#).unwrap();
//! let mut host = TreeBuilder;
//! match automaton.parse("a", &mut host, Value::Leaf(String::new())).unwrap() {
//!     Value::Node(name, _) => assert_eq!(name, "leaf"),
//!     _ => panic!("expected a Node"),
//! }
//! ```

pub mod automaton;
pub mod document;

pub use automaton::Automaton;
pub use document::TableDocument;

pub use mewa_base::error::{ErrorCode, Location, MewaError, Result};
pub use mewa_driver::{Driver, Host};
pub use mewa_grammar::ResolvedGrammar;
pub use mewa_lalr::{CallEntry, ParserTables, Warning};
pub use mewa_types::{ConstructorId, DefineTypeOutcome, ObjectHandle, TypeDatabase, TypeHandle};
