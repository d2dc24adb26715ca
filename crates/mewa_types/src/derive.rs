//! `deriveType` (§4.6): the shortest-weight reduction path from one type
//! to another.
//!
//! Grounded on the same Dijkstra shape as [`crate::search`] but
//! threads one extra dimension through the stack — a length-count
//! bounded by `lengthCountMask`/`maxLengthCount` — so it is its own
//! small loop rather than a reuse of the generic primitive, which has
//! no notion of that bound.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use smallvec::SmallVec;

use mewa_base::error::{ErrorCode, MewaError, Result};
use mewa_base::Step;

use crate::handle::{ConstructorId, TypeHandle};
use crate::reduction::ReductionTable;
use crate::search::PathStep;

const MAX_EXPANSIONS: usize = 1_000_000;

/// The result of a successful `deriveType` call: the path of reductions
/// taken and their total weight, plus an optional tying competitor
/// (§8 Scenario F) the caller may treat as an error or ignore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveResult {
    pub path: SmallVec<[PathStep; 16]>,
    pub weight_sum: u32,
    pub conflict_path: Option<SmallVec<[PathStep; 16]>>,
}

struct StackEntry {
    ty: TypeHandle,
    constructor: ConstructorId,
    length_count: u32,
    prev: Option<usize>,
}

fn ancestor_contains(stack: &[StackEntry], mut cursor: Option<usize>, ty: TypeHandle) -> bool {
    while let Some(i) = cursor {
        if stack[i].ty == ty {
            return true;
        }
        cursor = stack[i].prev;
    }
    false
}

/// See [`crate::search`]'s identical helper: the root node itself is
/// never part of the returned path.
fn recover_path(stack: &[StackEntry], mut cursor: Option<usize>) -> SmallVec<[PathStep; 16]> {
    let mut steps = SmallVec::new();
    while let Some(i) = cursor {
        let entry = &stack[i];
        if entry.prev.is_none() {
            break;
        }
        steps.push(PathStep { ty: entry.ty, constructor: entry.constructor });
        cursor = entry.prev;
    }
    steps.reverse();
    steps
}

/// Finds the shortest-weight path `from_type → to_type` among
/// reductions visible at `step` matching `tag_mask`. `from_type ==
/// to_type` always succeeds with weight 0 and an empty path (§8
/// invariant 4), before any edges are even considered.
///
/// `length_count_mask` selects which edge tags count toward
/// `max_length_count`; a partial path whose count would exceed the
/// bound is pruned rather than explored further.
pub fn derive_type(
    reductions: &ReductionTable,
    step: Step,
    from_type: TypeHandle,
    to_type: TypeHandle,
    tag_mask: u32,
    length_count_mask: u32,
    max_length_count: u32,
) -> Result<DeriveResult> {
    let mut stack: Vec<StackEntry> = vec![StackEntry {
        ty: from_type,
        constructor: ConstructorId::IDENTITY,
        length_count: 0,
        prev: None,
    }];
    let mut heap: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::new();
    heap.push(Reverse((0, 0, 0)));
    let mut seq: u64 = 1;

    let mut accepted: Option<(usize, u32)> = None;
    let mut expansions = 0usize;

    while let Some(Reverse((weight, _, idx))) = heap.pop() {
        expansions += 1;
        if expansions > MAX_EXPANSIONS {
            return Err(MewaError::bare(ErrorCode::LogicError));
        }

        let ty = stack[idx].ty;

        if let Some((accepted_idx, accepted_weight)) = accepted {
            if weight > accepted_weight {
                break;
            }
            if ty == to_type && idx != accepted_idx {
                return Ok(DeriveResult {
                    path: recover_path(&stack, Some(accepted_idx)),
                    weight_sum: accepted_weight,
                    conflict_path: Some(recover_path(&stack, Some(idx))),
                });
            }
            continue;
        }

        if ty == to_type {
            accepted = Some((idx, weight));
            continue;
        }

        for edge in reductions.reductions(step, ty, tag_mask) {
            if ancestor_contains(&stack, Some(idx), edge.to_type) {
                continue;
            }
            let counts = length_count_mask & (1u32 << edge.tag.saturating_sub(1)) != 0;
            let length_count = stack[idx].length_count + u32::from(counts);
            if length_count > max_length_count {
                continue;
            }
            stack.push(StackEntry { ty: edge.to_type, constructor: edge.constructor, length_count, prev: Some(idx) });
            let next_idx = stack.len() - 1;
            heap.push(Reverse((weight + edge.weight, seq, next_idx)));
            seq += 1;
        }
    }

    match accepted {
        Some((idx, weight)) => Ok(DeriveResult { path: recover_path(&stack, Some(idx)), weight_sum: weight, conflict_path: None }),
        None => Err(MewaError::new(ErrorCode::UnresolvableType, format!("{from_type} -> {to_type}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mewa_base::Scope;

    #[test]
    fn invariant_4_identity_is_zero_weight_empty_path() {
        let a = TypeHandle(1);
        let reductions = ReductionTable::new();
        let result = derive_type(&reductions, 0, a, a, 0xFFFF_FFFF, 0xFFFF_FFFF, u32::MAX).unwrap();
        assert!(result.path.is_empty());
        assert_eq!(result.weight_sum, 0);
    }

    #[test]
    fn unresolvable_type_has_no_path() {
        let a = TypeHandle(1);
        let b = TypeHandle(2);
        let reductions = ReductionTable::new();
        let err = derive_type(&reductions, 0, a, b, 0xFFFF_FFFF, 0xFFFF_FFFF, u32::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnresolvableType);
    }

    #[test]
    fn scenario_f_diamond_produces_conflict_path() {
        let a = TypeHandle(1);
        let b = TypeHandle(2);
        let c = TypeHandle(3);
        let d = TypeHandle(4);
        let mut reductions = ReductionTable::new();
        let scope = Scope::new(0, 100);
        reductions.define(scope, b, a, ConstructorId(0), 1, 1).unwrap();
        reductions.define(scope, c, a, ConstructorId(0), 1, 1).unwrap();
        reductions.define(scope, d, b, ConstructorId(0), 1, 1).unwrap();
        reductions.define(scope, d, c, ConstructorId(0), 1, 1).unwrap();

        let result = derive_type(&reductions, 50, a, d, 0xFFFF_FFFF, 0xFFFF_FFFF, u32::MAX).unwrap();
        assert_eq!(result.weight_sum, 2);
        let conflict = result.conflict_path.expect("diamond should report a conflicting path");
        assert_eq!(conflict.len(), 2);
    }

    #[test]
    fn max_length_count_prunes_long_paths() {
        let a = TypeHandle(1);
        let b = TypeHandle(2);
        let c = TypeHandle(3);
        let mut reductions = ReductionTable::new();
        let scope = Scope::new(0, 100);
        reductions.define(scope, b, a, ConstructorId(0), 1, 1).unwrap();
        reductions.define(scope, c, b, ConstructorId(0), 1, 1).unwrap();

        let err = derive_type(&reductions, 50, a, c, 0xFFFF_FFFF, 0xFFFF_FFFF, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnresolvableType);

        let ok = derive_type(&reductions, 50, a, c, 0xFFFF_FFFF, 0xFFFF_FFFF, 2).unwrap();
        assert_eq!(ok.path.len(), 2);
    }
}
