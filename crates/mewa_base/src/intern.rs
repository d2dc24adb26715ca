//! Identifier interning for O(1) equality comparison.
//!
//! Every name, keyword and label that flows through mewa — grammar
//! non-terminals, lexicon labels, call-table function names, scoped-map
//! keys — is interned once into a small positive integer. Comparing two
//! identifiers is then a `u32` comparison regardless of the original
//! string's length, and the original bytes can always be recovered with
//! [`IdentTable::inv`].
//!
//! ## Example
//!
//! ```
//! use mewa_base::{IdentTable, Ident};
//!
//! let mut idents = IdentTable::new();
//!
//! let a = idents.get("cat");
//! let b = idents.get("cat");
//! let c = idents.get("dog");
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(idents.inv(a), "cat");
//! ```

use rustc_hash::FxHashMap;

/// A stable handle to an interned identifier.
///
/// Identifiers are `Copy` and compare in O(1) time. Use [`IdentTable::inv`]
/// to recover the original bytes. Handles are never renumbered and remain
/// valid for the lifetime of the [`IdentTable`] that produced them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Ident(u32);

impl Ident {
    /// Returns the dense integer index backing this identifier.
    ///
    /// Useful when an identifier is used as a key into parallel `Vec`
    /// storage rather than a hash map.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Builds an identifier from a raw index without validating it against
    /// any particular table. Used internally when identifiers are recovered
    /// from packed table storage.
    pub fn from_raw(index: u32) -> Self {
        Ident(index)
    }
}

/// A byte-string interner providing O(1) equality comparison via [`Ident`]
/// handles.
///
/// Backed by an append-only arena of owned strings plus an `FxHashMap` index
/// (the same fast non-cryptographic hasher `logicaffeine-data` uses for its
/// internal maps); the arena guarantees handles are stable and `inv` runs in
/// constant time.
pub struct IdentTable {
    map: FxHashMap<String, Ident>,
    arena: Vec<String>,
}

impl IdentTable {
    /// Creates an identifier table with only the empty string pre-interned
    /// (so `Ident::from_raw(0)` is always a valid, resolvable handle).
    pub fn new() -> Self {
        let mut table = IdentTable {
            map: FxHashMap::default(),
            arena: Vec::new(),
        };
        table.arena.push(String::new());
        table.map.insert(String::new(), Ident(0));
        table
    }

    /// Returns the identifier for `name`, interning it if this is the first
    /// time it has been seen. Stable for the life of the table.
    pub fn get(&mut self, name: &str) -> Ident {
        if let Some(&id) = self.map.get(name) {
            return id;
        }
        let id = Ident(self.arena.len() as u32);
        self.arena.push(name.to_string());
        self.map.insert(name.to_string(), id);
        id
    }

    /// Looks up an already-interned identifier without creating a new
    /// entry. Returns `None` if `name` has never been interned.
    pub fn lookup(&self, name: &str) -> Option<Ident> {
        self.map.get(name).copied()
    }

    /// Resolves an identifier back to its original bytes in constant time.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this table.
    pub fn inv(&self, id: Ident) -> &str {
        &self.arena[id.index()]
    }

    /// Number of interned identifiers, including the pre-interned empty
    /// string.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// `true` if no identifier besides the empty string has been interned.
    pub fn is_empty(&self) -> bool {
        self.arena.len() <= 1
    }
}

impl Default for IdentTable {
    fn default() -> Self {
        Self::new()
    }
}
