//! `resolveType` (§4.6): locates the definitions of `name` reachable by
//! reductions from any of the supplied context types.
//!
//! Built on the shared [`crate::search::shortest_path_search`] primitive
//! — the target predicate is "this type's `(contextType, name)`
//! overload chain is non-empty", and the path recovered doubles as the
//! chain of implicit reductions applied before the name was found.

use smallvec::SmallVec;

use mewa_base::error::Result;
use mewa_base::{Ident, Step};

use crate::handle::{ConstructorId, TypeHandle};
use crate::reduction::ReductionTable;
use crate::search::{shortest_path_search, Edge, PathStep};
use crate::types::TypeTable;

/// The outcome of a successful `resolveType` call (§4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveResult {
    /// Index into the caller's `context_types` slice identifying which
    /// starting context type this resolution is rooted at.
    pub root_index: usize,
    pub context_type: TypeHandle,
    pub path: SmallVec<[PathStep; 16]>,
    pub items: Vec<(TypeHandle, ConstructorId)>,
    /// Set when a second, equal-weight resolution reached a different
    /// context type — the caller decides whether that's an error
    /// (§4.6: "reported to the caller").
    pub conflict_type: Option<TypeHandle>,
}

/// Searches outward from `context_types` via reductions visible at
/// `step` matching `tag_mask`, stopping at the first type whose
/// `(contextType, name)` overload chain is non-empty.
pub fn resolve_type(
    types: &TypeTable,
    reductions: &ReductionTable,
    step: Step,
    context_types: &[TypeHandle],
    name: Ident,
    tag_mask: u32,
) -> Result<Option<ResolveResult>> {
    let outcome = shortest_path_search(
        context_types,
        |ty| types.head_at_step(ty, name, step).is_some(),
        |ty| -> SmallVec<[Edge; 8]> {
            reductions.reductions(step, ty, tag_mask).into_iter().map(|r| (r.weight, r.to_type, r.constructor)).collect()
        },
    )?;

    let Some(outcome) = outcome else {
        return Ok(None);
    };

    let head = types
        .head_at_step(outcome.primary.node, name, step)
        .expect("is_target guaranteed a non-empty overload chain");
    let items = types.overload_chain(head);
    let root_index = context_types.iter().position(|&ty| ty == outcome.primary.root).unwrap_or(0);

    Ok(Some(ResolveResult {
        root_index,
        context_type: outcome.primary.node,
        path: outcome.primary.path,
        items,
        conflict_type: outcome.conflict.map(|c| c.node),
    }))
}
