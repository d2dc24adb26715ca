//! The named-object map (§3 "Named-object map"): "which handle was last
//! assigned to this name in the innermost scope containing step `s`".
//!
//! A thin wrapper over [`mewa_base::ScopedMap`] — one of the three
//! tightly-indexed maps §1 names, the only one that needs no payload
//! beyond a single opaque handle per name.

use mewa_base::{Ident, Scope, ScopedMap, Step};

use crate::handle::ObjectHandle;

/// Binds [`ObjectHandle`]s to interned names within scopes (§4.6
/// `setObjectInstance`/`getObjectInstance`).
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    map: ScopedMap<Ident, ObjectHandle>,
}

impl ObjectTable {
    pub fn new() -> Self {
        ObjectTable { map: ScopedMap::new() }
    }

    /// Binds `handle` to `name` within `scope`. Replaces a prior binding
    /// at the exact same scope (mirrors [`mewa_base::ScopedInstance::insert`]);
    /// fails if `scope` partially overlaps an existing binding for this
    /// name.
    pub fn set(
        &mut self,
        name: Ident,
        scope: Scope,
        handle: ObjectHandle,
    ) -> Result<(), mewa_base::ScopeHierarchyError> {
        self.map.insert(name, scope, handle)
    }

    /// The handle bound to `name` in the innermost scope containing
    /// `step`, or `None` if no such binding exists.
    pub fn get(&self, name: Ident, step: Step) -> Option<ObjectHandle> {
        self.map.get(&name, step).copied()
    }

    /// All `(scope, handle)` pairs ever bound to `name`, used by
    /// [`crate::tree::build_object_instance_tree`].
    pub fn scopes_for(&self, name: Ident) -> impl Iterator<Item = &(Scope, ObjectHandle)> {
        self.map.scopes_for(&name)
    }

    /// Every `(name, scope, handle)` triple across every name, used by
    /// [`crate::tree::build_object_instance_tree`].
    pub(crate) fn all_entries(&self) -> impl Iterator<Item = (&Ident, &Scope, &ObjectHandle)> {
        self.map.all_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mewa_base::IdentTable;

    #[test]
    fn scenario_e_shadowing_by_innermost_scope() {
        let mut idents = IdentTable::new();
        let x = idents.get("x");
        let mut table = ObjectTable::new();

        table.set(x, Scope::new(0, 100), ObjectHandle(1)).unwrap();
        table.set(x, Scope::new(10, 20), ObjectHandle(2)).unwrap();

        assert_eq!(table.get(x, 15), Some(ObjectHandle(2)));
        assert_eq!(table.get(x, 50), Some(ObjectHandle(1)));
        assert_eq!(table.get(x, 200), None);
    }
}
