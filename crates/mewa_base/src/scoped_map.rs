//! Scope-sensitive maps: the storage primitives every scoped lookup in
//! mewa (named objects, type records, reductions) is built from (§4.2).
//!
//! Each primitive keeps its entries sorted by the scope's `end` so a
//! query at a given step can binary-search to the first candidate scope
//! and then scan forward only as far as the innermost match — scopes
//! inserted under the same key are guaranteed (by [`ScopedMap::insert`])
//! to be disjoint or nested, never partially overlapping, so the first
//! containing scope encountered in ascending-`end` order is always the
//! innermost one.

use crate::scope::{Scope, ScopeRelation, Step};
use rustc_hash::FxHashMap;
use std::fmt;

/// Raised when inserting a scope into a scoped map would partially
/// overlap a scope already present for the same key (§4.2, §6 code 1005).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeHierarchyError {
    pub inserted: Scope,
    pub existing: Scope,
}

impl fmt::Display for ScopeHierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scope {} partially overlaps existing scope {}",
            self.inserted, self.existing
        )
    }
}

impl std::error::Error for ScopeHierarchyError {}

/// Finds the index of the innermost entry whose scope contains `step`,
/// among entries kept sorted ascending by `scope.end`.
///
/// Entries at or before the partition point have `end <= step` and so
/// cannot contain `step`; scanning forward from there in ascending-`end`
/// order means the first entry whose `start <= step` is also the one
/// with smallest `end`, i.e. the innermost by construction.
fn find_innermost<V>(entries: &[(Scope, V)], step: Step) -> Option<usize> {
    let start = entries.partition_point(|(scope, _)| scope.end <= step);
    entries[start..]
        .iter()
        .position(|(scope, _)| scope.contains(step))
        .map(|offset| start + offset)
}

fn insertion_point<V>(entries: &[(Scope, V)], scope: &Scope) -> usize {
    entries.partition_point(|(existing, _)| existing.end <= scope.end)
}

fn check_against_siblings<V>(
    entries: &[(Scope, V)],
    scope: &Scope,
) -> Result<Option<usize>, ScopeHierarchyError> {
    for (i, (existing, _)) in entries.iter().enumerate() {
        match scope.relation_to(existing) {
            ScopeRelation::Equal => return Ok(Some(i)),
            ScopeRelation::Disjoint | ScopeRelation::Covers | ScopeRelation::CoveredBy => {}
            ScopeRelation::PartialOverlap => {
                return Err(ScopeHierarchyError {
                    inserted: *scope,
                    existing: *existing,
                })
            }
        }
    }
    Ok(None)
}

/// A single scoped value, keyed only by scope: "which value is visible
/// at this step" with no additional name or key attached.
#[derive(Debug, Clone)]
pub struct ScopedInstance<V> {
    entries: Vec<(Scope, V)>,
}

impl<V> ScopedInstance<V> {
    pub fn new() -> Self {
        ScopedInstance { entries: Vec::new() }
    }

    /// Inserts `value` under `scope`. Replaces the value if `scope`
    /// exactly matches an existing entry (mirrors §4.6's
    /// `setObjectInstance` replace-on-identical-scope behavior); rejects
    /// the insert with [`ScopeHierarchyError`] if `scope` partially
    /// overlaps an existing entry.
    pub fn insert(&mut self, scope: Scope, value: V) -> Result<(), ScopeHierarchyError> {
        if let Some(i) = check_against_siblings(&self.entries, &scope)? {
            self.entries[i] = (scope, value);
            return Ok(());
        }
        let at = insertion_point(&self.entries, &scope);
        self.entries.insert(at, (scope, value));
        Ok(())
    }

    /// Returns the value visible at `step`: the value held by the
    /// innermost scope containing `step`, or `None` if no scope does.
    pub fn get(&self, step: Step) -> Option<&V> {
        find_innermost(&self.entries, step).map(|i| &self.entries[i].1)
    }

    /// Returns the value defined for exactly `scope` (not a step query),
    /// used where a second definition in the very same scope must see
    /// the first one to extend it rather than shadow it (the type
    /// table's overload-chain head, §4.6 `defineType`).
    pub fn get_exact(&self, scope: Scope) -> Option<&V> {
        self.entries.iter().find(|(s, _)| *s == scope).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates all `(scope, value)` pairs, in ascending-`end` order.
    pub fn iter(&self) -> impl Iterator<Item = &(Scope, V)> {
        self.entries.iter()
    }
}

impl<V> Default for ScopedInstance<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A scope-sensitive map keyed by `K`: each key owns its own independent
/// forest of scopes (§4.2: "sorted primarily by key, secondarily by the
/// scope's end").
#[derive(Debug, Clone)]
pub struct ScopedMap<K, V> {
    buckets: FxHashMap<K, ScopedInstance<V>>,
}

impl<K: std::hash::Hash + Eq + Clone, V> ScopedMap<K, V> {
    pub fn new() -> Self {
        ScopedMap { buckets: FxHashMap::default() }
    }

    pub fn insert(&mut self, key: K, scope: Scope, value: V) -> Result<(), ScopeHierarchyError> {
        self.buckets.entry(key).or_insert_with(ScopedInstance::new).insert(scope, value)
    }

    /// Returns the value visible for `key` at `step`, if any.
    pub fn get(&self, key: &K, step: Step) -> Option<&V> {
        self.buckets.get(key)?.get(step)
    }

    /// Returns the value defined for `key` at exactly `scope`, if any
    /// (see [`ScopedInstance::get_exact`]).
    pub fn get_exact(&self, key: &K, scope: Scope) -> Option<&V> {
        self.buckets.get(key)?.get_exact(scope)
    }

    /// All scopes recorded for `key`, in ascending-`end` order.
    pub fn scopes_for(&self, key: &K) -> impl Iterator<Item = &(Scope, V)> {
        self.buckets.get(key).into_iter().flat_map(|instance| instance.iter())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.buckets.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(ScopedInstance::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(ScopedInstance::is_empty)
    }

    /// Every `(key, scope, value)` triple across every key's bucket, used
    /// by introspection to build a scope-hierarchy tree view spanning
    /// all keys at once (§4.2 "derived operation").
    pub fn all_entries(&self) -> impl Iterator<Item = (&K, &Scope, &V)> {
        self.buckets.iter().flat_map(|(k, inst)| inst.iter().map(move |(s, v)| (k, s, v)))
    }
}

impl<K: std::hash::Hash + Eq + Clone, V> Default for ScopedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// One right-hand entry of a scoped relation: a related key `r`, the
/// payload `v`, a one-based tag in `[1, 32]` and a non-negative integer
/// weight (§4.2, §4.6). Weights are kept in this fixed-point integer
/// domain specifically so `deriveType`'s shortest-path tie detection
/// never has to compare floating-point sums against an epsilon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEntry<R, V> {
    pub related: R,
    pub value: V,
    pub tag: u8,
    pub weight: u32,
}

/// A scope-sensitive multimap from a left key to a set of
/// [`RelationEntry`] values, used for reduction edges and overload
/// chains (§4.2, §4.6).
///
/// Queries union entries from every scope containing the query step
/// whose tag intersects the caller's mask; when the same `related` key
/// appears in more than one containing scope, the innermost scope's
/// entry wins.
#[derive(Debug, Clone)]
pub struct ScopedRelationMap<L, R, V> {
    buckets: FxHashMap<L, ScopedRelationBucket<R, V>>,
}

#[derive(Debug, Clone)]
struct ScopedRelationBucket<R, V> {
    entries: Vec<(Scope, Vec<RelationEntry<R, V>>)>,
}

impl<L: std::hash::Hash + Eq + Clone, R: std::hash::Hash + Clone + Eq, V: Clone> ScopedRelationMap<L, R, V> {
    pub fn new() -> Self {
        ScopedRelationMap { buckets: FxHashMap::default() }
    }

    /// Adds one relation entry under `key` at `scope`. Entries always
    /// accumulate, even when `(key, scope, related)` repeats: two edges
    /// to the same `related` defined in the exact same scope are kept
    /// side by side so [`ScopedRelationMap::query`] can report them as a
    /// tie instead of one silently shadowing the other (§4.6
    /// `AmbiguousReductionDefinitions` / `AmbiguousTypeReference`).
    pub fn insert(
        &mut self,
        key: L,
        scope: Scope,
        entry: RelationEntry<R, V>,
    ) -> Result<(), ScopeHierarchyError> {
        let bucket = self.buckets.entry(key).or_insert_with(|| ScopedRelationBucket { entries: Vec::new() });
        let bare: Vec<(Scope, ())> = bucket.entries.iter().map(|(s, _)| (*s, ())).collect();
        if let Some(i) = check_against_siblings(&bare, &scope)? {
            bucket.entries[i].1.push(entry);
            return Ok(());
        }
        let at = insertion_point(&bare, &scope);
        bucket.entries.insert(at, (scope, vec![entry]));
        Ok(())
    }

    /// Unions entries visible for `key` at `step` whose `tag` intersects
    /// `tag_mask` (a 32-bit mask, bit `t - 1` set for tag `t`).
    ///
    /// For each distinct `related` key, only entries from its
    /// innermost containing scope survive — except that if more than
    /// one entry shares that same innermost scope (two edges to the
    /// same `related` defined together), all of them survive as a tie,
    /// letting the caller detect ambiguity rather than picking a
    /// arbitrary winner.
    pub fn query(&self, key: &L, step: Step, tag_mask: u32) -> Vec<RelationEntry<R, V>> {
        let Some(bucket) = self.buckets.get(key) else {
            return Vec::new();
        };

        let mut matches: Vec<(Scope, &RelationEntry<R, V>)> = Vec::new();
        let mut innermost_len: FxHashMap<R, i64> = FxHashMap::default();
        for (scope, items) in &bucket.entries {
            if !scope.contains(step) {
                continue;
            }
            for item in items {
                if tag_mask & (1u32 << (item.tag.saturating_sub(1))) == 0 {
                    continue;
                }
                let len = scope.len();
                innermost_len
                    .entry(item.related.clone())
                    .and_modify(|best| {
                        if len < *best {
                            *best = len;
                        }
                    })
                    .or_insert(len);
                matches.push((*scope, item));
            }
        }

        matches
            .into_iter()
            .filter(|(scope, item)| scope.len() == innermost_len[&item.related])
            .map(|(_, item)| item.clone())
            .collect()
    }

    /// Every `(key, scope, entry)` triple across every key's bucket,
    /// unfiltered by step or tag — used to build the reduction-tree
    /// introspection view, which spans all keys at once.
    pub fn all_entries(&self) -> impl Iterator<Item = (&L, &Scope, &RelationEntry<R, V>)> {
        self.buckets.iter().flat_map(|(k, bucket)| {
            bucket.entries.iter().flat_map(move |(s, items)| items.iter().map(move |item| (k, s, item)))
        })
    }
}

impl<L: std::hash::Hash + Eq + Clone, R: std::hash::Hash + Clone + Eq, V: Clone> Default
    for ScopedRelationMap<L, R, V>
{
    fn default() -> Self {
        Self::new()
    }
}
