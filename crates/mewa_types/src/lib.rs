#![cfg_attr(docsrs, feature(doc_cfg))]

//! # mewa-types
//!
//! The scoped type/object/reduction database (§1 "scoped type database",
//! §4.6): three tightly indexed maps keyed by scope — named objects, type
//! definitions with overload chains, and tagged reduction edges — plus the
//! Dijkstra-style search that resolves a name in context and derives one
//! type from another along shortest-weight reduction paths (§4.6, §4.7).
//!
//! This crate owns no notion of grammar syntax or parsing; it is the
//! runtime surface a host's semantic actions call into while the driver
//! in `mewa-driver` threads reductions up the parse stack.
//!
//! - [`TypeDatabase`] — the single owning value for one compilation
//! - [`TypeHandle`]/[`ConstructorId`]/[`ObjectHandle`] — stable integer
//!   handles, never renumbered
//! - [`DeriveResult`]/[`ResolveResult`] — outcomes of the two public
//!   search operations
//! - [`ScopeTreeNode`] — the introspection tree view shared by the three
//!   `get*Tree` accessors
//!
//! # Example
//!
//! ```
//! use mewa_base::{IdentTable, Scope};
//! use mewa_types::{ConstructorId, DefineTypeOutcome, TypeDatabase, TypeHandle};
//!
//! let mut idents = IdentTable::new();
//! let int_name = idents.get("int");
//!
//! let mut db = TypeDatabase::new();
//! let scope = Scope::new(0, 100);
//! let handle = match db
//!     .define_type(scope, TypeHandle::NONE, int_name, ConstructorId(0), &[], 0)
//!     .unwrap()
//! {
//!     DefineTypeOutcome::Created(h) => h,
//!     other => panic!("expected Created, got {other:?}"),
//! };
//!
//! assert_eq!(db.get_type(scope, TypeHandle::NONE, int_name, &[]), Some(handle));
//! ```

pub mod db;
pub mod derive;
pub mod handle;
pub mod object;
pub mod reduction;
pub mod resolve;
pub mod search;
pub mod tree;
pub mod types;

pub use db::TypeDatabase;
pub use derive::DeriveResult;
pub use handle::{ConstructorId, ObjectHandle, TypeHandle};
pub use object::ObjectTable;
pub use reduction::{Reduction, ReductionTable};
pub use resolve::ResolveResult;
pub use search::{shortest_path_search, Edge, FoundPath, PathStep, SearchOutcome};
pub use tree::{
    ObjectInstanceEntry, ReductionDefinitionEntry, ScopeTreeNode, TypeDefinitionEntry,
};
pub use types::{DefineTypeOutcome, Parameter, TypeTable};
