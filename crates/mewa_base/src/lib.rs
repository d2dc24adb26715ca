#![cfg_attr(docsrs, feature(doc_cfg))]

//! # mewa-base
//!
//! Pure structural atoms shared by every other mewa crate: interning,
//! arenas, spans, scopes and the stable error-code space.
//!
//! - [`Arena`]/[`ArenaBudget`] — bump allocation for stable AST/table
//!   references, sized from a caller-supplied budget
//! - [`Ident`]/[`IdentTable`] — identifier interning for O(1) equality
//! - [`Span`] — source byte-offset tracking
//! - [`Scope`] — the half-open scope intervals everything else is
//!   indexed by
//! - [`ScopedInstance`]/[`ScopedMap`]/[`ScopedRelationMap`] — the
//!   scope-sensitive storage primitives the type database and driver
//!   build on
//! - [`MewaError`]/[`Result`] — the stable numeric error-code space
//!
//! This crate has no knowledge of grammar syntax, LALR table
//! construction or type-reduction semantics. It provides only the
//! generic, reusable infrastructure the rest of the workspace builds
//! upon.
//!
//! # Example
//!
//! ```
//! use mewa_base::{Arena, IdentTable, Span};
//!
//! let arena: Arena<&str> = Arena::new();
//! let mut idents = IdentTable::new();
//!
//! let hello = idents.get("hello");
//! let span = Span::new(0, 5);
//!
//! let allocated = arena.alloc("hello");
//! assert_eq!(*allocated, "hello");
//! assert_eq!(idents.inv(hello), "hello");
//! let _ = span;
//! ```

pub mod arena;
pub mod error;
pub mod intern;
pub mod scope;
pub mod scoped_map;
pub mod span;

pub use arena::{Arena, ArenaBudget};
pub use error::{ErrorCode, Location, MewaError, Result};
pub use intern::{Ident, IdentTable};
pub use scope::{Scope, ScopeRelation, Step};
pub use scoped_map::{RelationEntry, ScopeHierarchyError, ScopedInstance, ScopedMap, ScopedRelationMap};
pub use span::Span;
