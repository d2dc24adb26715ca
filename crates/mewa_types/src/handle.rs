//! Stable integer handles used throughout the type database (§3, §6).
//!
//! Handles are never renumbered: a [`TypeHandle`] returned by
//! `TypeDatabase::define_type` remains valid for the life of the owning
//! database. They are newtypes rather than bare `i32`/`i64` so a
//! context-type argument can never be confused with a constructor or an
//! object handle at a call site — the distinction the C++ original
//! leaves to comments, this re-implementation leaves to the type
//! checker.

use std::fmt;

/// A handle into the type-record table. `0` is the reserved sentinel for
/// "no context type" (the global namespace) — never a handle returned by
/// `define_type` (§6: "`0` is reserved for... identity").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub u32);

impl TypeHandle {
    /// The sentinel standing for "no context type" / the global
    /// namespace a root-level definition is made in.
    pub const NONE: TypeHandle = TypeHandle(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        TypeHandle((index + 1) as u32)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque handle to a host-owned constructor value (§1, §9): the core
/// never inspects what it refers to, only threads it through type
/// records and reduction edges. `0` denotes the identity constructor —
/// "no construction needed" (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstructorId(pub i64);

impl ConstructorId {
    pub const IDENTITY: ConstructorId = ConstructorId(0);
}

impl fmt::Display for ConstructorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque handle to a host-owned object instance bound by
/// `setObjectInstance` (§4.6). Caller-supplied and otherwise meaningless
/// to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub i64);

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
