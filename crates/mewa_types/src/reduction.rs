//! Typed reduction edges (§3 "Reduction", §4.6 `defineReduction`/
//! `getReduction`/`reductions`).
//!
//! Backed directly by [`mewa_base::ScopedRelationMap`], keyed by the
//! edge's `fromType` so the search primitives in [`crate::search`] can
//! ask "what leaves this node" without a secondary index.

use mewa_base::error::{ErrorCode, MewaError, Result};
use mewa_base::{RelationEntry, Scope, ScopedRelationMap, Step};

use crate::handle::{ConstructorId, TypeHandle};

/// One outgoing edge of the reduction graph, as returned by a query
/// (§3 "Reduction": "`(scope, fromType, toType, constructor, tag,
/// weight)`").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction {
    pub to_type: TypeHandle,
    pub constructor: ConstructorId,
    pub tag: u8,
    pub weight: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ReductionTable {
    edges: ScopedRelationMap<TypeHandle, TypeHandle, ConstructorId>,
}

impl ReductionTable {
    pub fn new() -> Self {
        ReductionTable { edges: ScopedRelationMap::new() }
    }

    /// Adds one `fromType → toType` edge, valid within `scope` (§4.6
    /// `defineReduction`). Tags must fall in `[1, 32]`, matching the
    /// bit-mask convention queries use.
    pub fn define(
        &mut self,
        scope: Scope,
        to_type: TypeHandle,
        from_type: TypeHandle,
        constructor: ConstructorId,
        tag: u8,
        weight: u32,
    ) -> Result<()> {
        if !(1..=32).contains(&tag) {
            return Err(MewaError::new(ErrorCode::InvalidBoundary, format!("tag {tag} not in [1, 32]")));
        }
        self.edges
            .insert(from_type, scope, RelationEntry { related: to_type, value: constructor, tag, weight })
            .map_err(|e| MewaError::new(ErrorCode::ScopeHierarchyError, e.to_string()))
    }

    /// The single edge `fromType → toType` visible at `step` under
    /// `tag_mask`, or `None` if no such edge exists. Raises
    /// `AmbiguousTypeReference` if more than one matching edge ties at
    /// the innermost scope (§4.6 `getReduction`, Scenario D).
    pub fn get_reduction(
        &self,
        step: Step,
        to_type: TypeHandle,
        from_type: TypeHandle,
        tag_mask: u32,
    ) -> Result<Option<Reduction>> {
        let mut hits: Vec<_> = self
            .edges
            .query(&from_type, step, tag_mask)
            .into_iter()
            .filter(|e| e.related == to_type)
            .collect();
        match hits.len() {
            0 => Ok(None),
            1 => {
                let hit = hits.remove(0);
                Ok(Some(Reduction { to_type, constructor: hit.value, tag: hit.tag, weight: hit.weight }))
            }
            _ => Err(MewaError::new(
                ErrorCode::AmbiguousTypeReference,
                format!("{} reductions {from_type} -> {to_type} tie at step {step}", hits.len()),
            )),
        }
    }

    /// Every outgoing edge from `from_type` visible at `step` under
    /// `tag_mask` (§4.6 `reductions`) — the follow-function the search
    /// primitives in [`crate::search`] drive.
    pub fn reductions(&self, step: Step, from_type: TypeHandle, tag_mask: u32) -> Vec<Reduction> {
        self.edges
            .query(&from_type, step, tag_mask)
            .into_iter()
            .map(|e| Reduction { to_type: e.related, constructor: e.value, tag: e.tag, weight: e.weight })
            .collect()
    }

    /// Every `(fromType, scope, edge)` triple recorded, used by
    /// [`crate::tree::build_reduction_definition_tree`].
    pub(crate) fn all_edges(&self) -> impl Iterator<Item = (&TypeHandle, &Scope, &RelationEntry<TypeHandle, ConstructorId>)> {
        self.edges.all_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_d_ambiguous_reduction_is_reported() {
        let int_ty = TypeHandle(1);
        let double_ty = TypeHandle(2);
        let mut table = ReductionTable::new();

        table.define(Scope::new(0, 100), double_ty, int_ty, ConstructorId(1), 1, 5).unwrap();
        table.define(Scope::new(0, 100), double_ty, int_ty, ConstructorId(2), 1, 5).unwrap();

        let err = table.get_reduction(50, double_ty, int_ty, 0xFFFF_FFFF).unwrap_err();
        assert_eq!(err.code, ErrorCode::AmbiguousTypeReference);
    }

    #[test]
    fn single_reduction_is_returned() {
        let int_ty = TypeHandle(1);
        let double_ty = TypeHandle(2);
        let mut table = ReductionTable::new();
        table.define(Scope::new(0, 100), double_ty, int_ty, ConstructorId(7), 1, 3).unwrap();

        let hit = table.get_reduction(50, double_ty, int_ty, 0xFFFF_FFFF).unwrap().unwrap();
        assert_eq!(hit.constructor, ConstructorId(7));
        assert_eq!(hit.weight, 3);
    }

    #[test]
    fn tag_mask_excludes_non_matching_edges() {
        let int_ty = TypeHandle(1);
        let double_ty = TypeHandle(2);
        let mut table = ReductionTable::new();
        table.define(Scope::new(0, 100), double_ty, int_ty, ConstructorId(1), 2, 1).unwrap();

        assert_eq!(table.get_reduction(0, double_ty, int_ty, 0b01).unwrap(), None);
        assert!(table.get_reduction(0, double_ty, int_ty, 0b10).unwrap().is_some());
    }

    #[test]
    fn invalid_tag_is_rejected() {
        let mut table = ReductionTable::new();
        let err = table
            .define(Scope::new(0, 100), TypeHandle(2), TypeHandle(1), ConstructorId(0), 0, 1)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBoundary);
    }

    #[test]
    fn diamond_edges_are_all_reachable_from_a() {
        let a = TypeHandle(1);
        let b = TypeHandle(2);
        let c = TypeHandle(3);
        let d = TypeHandle(4);
        let mut table = ReductionTable::new();
        table.define(Scope::new(0, 100), b, a, ConstructorId(0), 1, 1).unwrap();
        table.define(Scope::new(0, 100), c, a, ConstructorId(0), 1, 1).unwrap();
        table.define(Scope::new(0, 100), d, b, ConstructorId(0), 1, 1).unwrap();
        table.define(Scope::new(0, 100), d, c, ConstructorId(0), 1, 1).unwrap();

        let from_a = table.reductions(50, a, 0xFFFF_FFFF);
        assert_eq!(from_a.len(), 2);
    }
}
