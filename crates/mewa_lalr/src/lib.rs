//! # mewa-lalr
//!
//! The LALR(1) table generator (§4.4): nullable/FIRST computation,
//! canonical LR(1) item-set construction, LALR merge by LR(0) core,
//! conflict resolution by priority and associativity, and packed
//! action/goto/call table emission.
//!
//! ```
//! use mewa_grammar::parse_and_validate;
//! use mewa_lalr::build;
//!
//! let grammar = parse_and_validate(r#"
//!     S = N (s) ;
//!     N = V "=" E (assign) | E (expr) ;
//!     E = V (id) | "*" E (deref) ;
//!     V = IDENT (var) ;
//! "#).unwrap();
//!
//! let result = build(&grammar).unwrap();
//! assert_eq!(result.tables.state_count, 10);
//! assert!(result.warnings.is_empty());
//! ```

pub mod canonical;
pub mod grammar;
pub mod items;
pub mod lalr;
pub mod sets;
pub mod tables;

pub use grammar::{AugmentedProduction, Grammar, Symbol};
pub use lalr::{build, BuildResult};
pub use tables::{Action, CallEntry, ParserTables, Warning};
