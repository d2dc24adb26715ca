//! The standalone shortest-path primitive (§4.7 `shortestPathSearch`)
//! shared by `deriveType` and `resolveType`.
//!
//! Dijkstra over a directed graph the caller never materialises: nodes
//! are [`TypeHandle`]s, edges come from a caller-supplied `follow`
//! closure queried lazily per node. A `prev`-linked stack of visited
//! entries stands in for the usual owned-graph backtrace (§9: "prefer
//! an arena + indices design over a linked-node-with-owning-pointers
//! design") and doubles as cycle prevention: before relaxing an edge we
//! walk the current path's ancestors and refuse to revisit a type
//! already on it.
//!
//! Weights are non-negative integers (§3: "the search assumes the
//! triangle inequality holds"), so tie detection is exact equality, not
//! the floating-point epsilon the original source used (§9 Open
//! Question 1).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use smallvec::SmallVec;

use mewa_base::error::{ErrorCode, MewaError, Result};

use crate::handle::{ConstructorId, TypeHandle};

/// One step of a recovered path: the type arrived at and the
/// constructor that produced it from the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub ty: TypeHandle,
    pub constructor: ConstructorId,
}

/// One outgoing edge as reported by a `follow` closure: its weight, the
/// type it leads to, and the constructor that performs the conversion.
pub type Edge = (u32, TypeHandle, ConstructorId);

/// A found path together with its total weight — the on-stack buffer
/// §4.7 calls for, sized for the common case (a handful of implicit
/// conversions) before falling back to the heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPath {
    pub path: SmallVec<[PathStep; 16]>,
    pub weight_sum: u32,
    pub node: TypeHandle,
    /// The entry of `from_types` this path originates from.
    pub root: TypeHandle,
}

/// A search that found a result and, optionally, a tying competitor at
/// the same weight reaching a different node — the caller decides
/// whether that is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub primary: FoundPath,
    pub conflict: Option<FoundPath>,
}

struct StackEntry {
    ty: TypeHandle,
    constructor: ConstructorId,
    weight: u32,
    prev: Option<usize>,
}

/// Caps the number of priority-queue pops before giving up — real
/// reduction graphs are "single-digit to low hundreds" (§4.6); a search
/// that blows past this almost certainly indicates a `follow` closure
/// that is not actually acyclic-by-ancestor-check, which would be a
/// defect in the caller, not a legitimate large search.
const MAX_EXPANSIONS: usize = 1_000_000;

fn ancestor_contains(stack: &[StackEntry], mut cursor: Option<usize>, ty: TypeHandle) -> bool {
    while let Some(i) = cursor {
        if stack[i].ty == ty {
            return true;
        }
        cursor = stack[i].prev;
    }
    false
}

/// Walks `prev` links back to the root, collecting each hop *after*
/// the starting node — the root itself is never part of the returned
/// path (so `from == to` yields an empty path, invariant 4).
fn recover_path(stack: &[StackEntry], mut cursor: Option<usize>) -> (SmallVec<[PathStep; 16]>, TypeHandle) {
    let mut steps = SmallVec::new();
    let mut root = stack[cursor.expect("recover_path called with no entry")].ty;
    while let Some(i) = cursor {
        let entry = &stack[i];
        if entry.prev.is_none() {
            root = entry.ty;
            break;
        }
        steps.push(PathStep { ty: entry.ty, constructor: entry.constructor });
        cursor = entry.prev;
    }
    steps.reverse();
    (steps, root)
}

/// Runs the shared search: starts from every type in `from_types`
/// simultaneously (weight 0, empty path — so `deriveType(A, A)` finds
/// `A` immediately with an empty path, invariant 4), expands edges
/// returned by `follow(ty)`, and stops at the first node satisfying
/// `is_target`. Continues popping only as long as the queue's next
/// weight still equals the accepted one, to surface a same-weight
/// competitor as `conflict`.
///
/// Returns `Ok(None)` if no node satisfies `is_target`.
pub fn shortest_path_search<IsTarget, Follow>(
    from_types: &[TypeHandle],
    mut is_target: IsTarget,
    mut follow: Follow,
) -> Result<Option<SearchOutcome>>
where
    IsTarget: FnMut(TypeHandle) -> bool,
    Follow: FnMut(TypeHandle) -> SmallVec<[Edge; 8]>,
{
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut heap: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    for &ty in from_types {
        stack.push(StackEntry { ty, constructor: ConstructorId::IDENTITY, weight: 0, prev: None });
        let idx = stack.len() - 1;
        heap.push(Reverse((0, seq, idx)));
        seq += 1;
    }

    let mut accepted: Option<(usize, FoundPath)> = None;
    let mut expansions = 0usize;

    while let Some(Reverse((weight, _, idx))) = heap.pop() {
        expansions += 1;
        if expansions > MAX_EXPANSIONS {
            return Err(MewaError::bare(ErrorCode::LogicError));
        }

        let ty = stack[idx].ty;

        if let Some((accepted_idx, found)) = &accepted {
            if weight > found.weight_sum {
                break;
            }
            // Compare by stack-position identity, not by `ty`: the
            // diamond case this is meant to catch (§8 Scenario F) has
            // the tying competitor arrive at the *same* node as the
            // already-accepted path along a different path, so `ty !=
            // found.node` would never fire for it.
            if is_target(ty) && idx != *accepted_idx {
                let (path, root) = recover_path(&stack, Some(idx));
                return Ok(Some(SearchOutcome {
                    primary: found.clone(),
                    conflict: Some(FoundPath { path, weight_sum: weight, node: ty, root }),
                }));
            }
            continue;
        }

        if is_target(ty) {
            let (path, root) = recover_path(&stack, Some(idx));
            accepted = Some((idx, FoundPath { path, weight_sum: weight, node: ty, root }));
            continue;
        }

        for (edge_weight, to, constructor) in follow(ty) {
            if ancestor_contains(&stack, Some(idx), to) {
                continue;
            }
            stack.push(StackEntry { ty: to, constructor, weight: weight + edge_weight, prev: Some(idx) });
            let next_idx = stack.len() - 1;
            heap.push(Reverse((weight + edge_weight, seq, next_idx)));
            seq += 1;
        }
    }

    Ok(accepted.map(|(_, primary)| SearchOutcome { primary, conflict: None }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(n: u32) -> TypeHandle {
        TypeHandle(n)
    }

    #[test]
    fn same_source_and_target_is_an_empty_zero_weight_path() {
        let a = h(1);
        let outcome = shortest_path_search(&[a], |ty| ty == a, |_| SmallVec::new()).unwrap().unwrap();
        assert!(outcome.primary.path.is_empty());
        assert_eq!(outcome.primary.weight_sum, 0);
        assert!(outcome.conflict.is_none());
    }

    #[test]
    fn finds_shortest_of_two_paths() {
        let a = h(1);
        let b = h(2);
        let c = h(3);
        let d = h(4);
        let outcome = shortest_path_search(
            &[a],
            |ty| ty == d,
            |ty| -> SmallVec<[Edge; 8]> {
                match ty.0 {
                    1 => SmallVec::from_slice(&[(5, b, ConstructorId(0)), (1, c, ConstructorId(0))]),
                    3 => SmallVec::from_slice(&[(1, d, ConstructorId(0))]),
                    2 => SmallVec::from_slice(&[(1, d, ConstructorId(0))]),
                    _ => SmallVec::new(),
                }
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(outcome.primary.weight_sum, 2);
        assert_eq!(outcome.primary.path.last().unwrap().ty, d);
        assert!(outcome.conflict.is_none());
    }

    #[test]
    fn scenario_f_diamond_reports_conflict() {
        let a = h(1);
        let b = h(2);
        let c = h(3);
        let d = h(4);
        let outcome = shortest_path_search(
            &[a],
            |ty| ty == d,
            |ty| -> SmallVec<[Edge; 8]> {
                match ty.0 {
                    1 => SmallVec::from_slice(&[(1, b, ConstructorId(0)), (1, c, ConstructorId(0))]),
                    2 => SmallVec::from_slice(&[(1, d, ConstructorId(0))]),
                    3 => SmallVec::from_slice(&[(1, d, ConstructorId(0))]),
                    _ => SmallVec::new(),
                }
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(outcome.primary.weight_sum, 2);
        let conflict = outcome.conflict.expect("diamond paths of equal weight should conflict");
        assert_eq!(conflict.weight_sum, 2);
        assert_eq!(conflict.node, d);
    }

    #[test]
    fn cycle_does_not_hang_the_search() {
        let a = h(1);
        let b = h(2);
        let outcome = shortest_path_search(
            &[a],
            |ty| ty == b,
            |ty| -> SmallVec<[Edge; 8]> {
                match ty.0 {
                    1 => SmallVec::from_slice(&[(1, b, ConstructorId(0))]),
                    2 => SmallVec::from_slice(&[(1, a, ConstructorId(0))]),
                    _ => SmallVec::new(),
                }
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(outcome.primary.weight_sum, 1);
    }

    #[test]
    fn no_path_returns_none() {
        let a = h(1);
        let z = h(99);
        let outcome = shortest_path_search(&[a], |ty| ty == z, |_| SmallVec::new()).unwrap();
        assert!(outcome.is_none());
    }
}
