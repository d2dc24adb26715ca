//! Type records and overload chains (§3 "Type record", §4.6 `defineType`/
//! `getType`).
//!
//! Parameters live in one flat, append-only pool (§3: "a flat slice into
//! a global parameter table") rather than per-record `Vec`s, mirroring
//! the arena-of-roles discipline §5 describes for the whole database.
//! Types sharing `(scope, contextType, name)` form a singly linked
//! overload chain through [`TypeRecord::next`]; [`TypeTable::define`]
//! walks it to find a matching parameter signature before appending a
//! new link.

use mewa_base::error::{ErrorCode, MewaError, Result};
use mewa_base::{Ident, Scope, ScopedMap, Step};

use crate::handle::{ConstructorId, TypeHandle};

/// One formal parameter: its type and the constructor that adapts an
/// argument into it (§3 "Type record": "each entry a `(type,
/// constructor)` pair").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeHandle,
    pub constructor: ConstructorId,
}

#[derive(Debug, Clone)]
struct TypeRecord {
    scope: Scope,
    context_type: TypeHandle,
    name: Ident,
    constructor: ConstructorId,
    param_start: u32,
    param_len: u16,
    priority: u16,
    next: Option<TypeHandle>,
}

/// The result of [`TypeTable::define`] (§4.6 `defineType`): Rust's
/// `enum` stands in for the original's `handle | -1 | 0` convention —
/// `Created` is the positive handle, `Duplicate` is `-1` (rejected,
/// equal priority), `Discarded` is `0` (a strictly higher-priority
/// definition already won; the winning handle is returned alongside so
/// callers don't have to re-query for it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefineTypeOutcome {
    Created(TypeHandle),
    Duplicate,
    Discarded { existing: TypeHandle },
}

/// The scoped table of type definitions: the overload-chain heads keyed
/// by `(contextType, name)` plus the append-only record and parameter
/// pools backing every handle (§3, §4.6).
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    records: Vec<TypeRecord>,
    parameters: Vec<Parameter>,
    heads: ScopedMap<(TypeHandle, Ident), TypeHandle>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable { records: Vec::new(), parameters: Vec::new(), heads: ScopedMap::new() }
    }

    fn record(&self, handle: TypeHandle) -> Result<&TypeRecord> {
        if handle.is_none() || handle.index() >= self.records.len() {
            return Err(MewaError::new(ErrorCode::InvalidHandle, handle.to_string()));
        }
        Ok(&self.records[handle.index()])
    }

    fn signature(&self, rec: &TypeRecord) -> &[Parameter] {
        &self.parameters[rec.param_start as usize..rec.param_start as usize + rec.param_len as usize]
    }

    fn signature_matches(&self, rec: &TypeRecord, parameters: &[Parameter]) -> bool {
        rec.param_len as usize == parameters.len()
            && self.signature(rec).iter().zip(parameters).all(|(a, b)| a.ty == b.ty)
    }

    /// Defines a new type, or extends/overrides the overload set at
    /// `(scope, contextType, name)` per §4.6's priority rules.
    pub fn define(
        &mut self,
        scope: Scope,
        context_type: TypeHandle,
        name: Ident,
        constructor: ConstructorId,
        parameters: &[Parameter],
        priority: u16,
    ) -> Result<DefineTypeOutcome> {
        if !scope.is_well_formed() {
            return Err(MewaError::new(ErrorCode::InvalidBoundary, scope.to_string()));
        }
        if !context_type.is_none() && context_type.index() >= self.records.len() {
            return Err(MewaError::new(ErrorCode::InvalidHandle, context_type.to_string()));
        }

        let key = (context_type, name);
        let param_start = self.parameters.len() as u32;
        self.parameters.extend_from_slice(parameters);
        let candidate = TypeRecord {
            scope,
            context_type,
            name,
            constructor,
            param_start,
            param_len: parameters.len() as u16,
            priority,
            next: None,
        };

        let Some(&head) = self.heads.get_exact(&key, scope) else {
            self.records.push(candidate);
            let handle = TypeHandle::from_index(self.records.len() - 1);
            self.heads
                .insert(key, scope, handle)
                .map_err(|e| MewaError::new(ErrorCode::ScopeHierarchyError, e.to_string()))?;
            return Ok(DefineTypeOutcome::Created(handle));
        };

        let mut cursor = head;
        loop {
            let existing = self.records[cursor.index()].clone();
            if self.signature_matches(&existing, parameters) {
                return Ok(if priority > existing.priority {
                    let rec = &mut self.records[cursor.index()];
                    rec.priority = priority;
                    rec.constructor = constructor;
                    rec.param_start = param_start;
                    rec.param_len = parameters.len() as u16;
                    DefineTypeOutcome::Created(cursor)
                } else if priority == existing.priority {
                    DefineTypeOutcome::Duplicate
                } else {
                    DefineTypeOutcome::Discarded { existing: cursor }
                });
            }
            match existing.next {
                Some(next) => cursor = next,
                None => break,
            }
        }

        self.records.push(candidate);
        let handle = TypeHandle::from_index(self.records.len() - 1);
        self.records[cursor.index()].next = Some(handle);
        Ok(DefineTypeOutcome::Created(handle))
    }

    /// Looks up a type with an exact parameter signature defined in
    /// exactly `scope` — does not search enclosing scopes (§4.6
    /// `getType`).
    pub fn get(
        &self,
        scope: Scope,
        context_type: TypeHandle,
        name: Ident,
        parameter_types: &[TypeHandle],
    ) -> Option<TypeHandle> {
        let mut cursor = self.heads.get_exact(&(context_type, name), scope).copied();
        while let Some(handle) = cursor {
            let rec = &self.records[handle.index()];
            let matches = rec.param_len as usize == parameter_types.len()
                && self.signature(rec).iter().map(|p| p.ty).eq(parameter_types.iter().copied());
            if matches {
                return Some(handle);
            }
            cursor = rec.next;
        }
        None
    }

    /// The overload-chain head visible for `(contextType, name)` at
    /// `step` — the innermost scope containing it, not necessarily an
    /// exact match. Used internally by `resolveType`'s search.
    pub(crate) fn head_at_step(&self, context_type: TypeHandle, name: Ident, step: Step) -> Option<TypeHandle> {
        self.heads.get(&(context_type, name), step).copied()
    }

    /// Walks an overload chain from its head, collecting every
    /// `(handle, constructor)` pair (§4.6 `resolveType`'s `items`).
    pub(crate) fn overload_chain(&self, head: TypeHandle) -> Vec<(TypeHandle, ConstructorId)> {
        let mut items = Vec::new();
        let mut cursor = Some(head);
        while let Some(handle) = cursor {
            let rec = &self.records[handle.index()];
            items.push((handle, rec.constructor));
            cursor = rec.next;
        }
        items
    }

    pub fn name(&self, handle: TypeHandle) -> Result<Ident> {
        self.record(handle).map(|r| r.name)
    }

    pub fn parameters(&self, handle: TypeHandle) -> Result<&[Parameter]> {
        let rec = self.record(handle)?;
        Ok(self.signature(rec))
    }

    pub fn constructor(&self, handle: TypeHandle) -> Result<ConstructorId> {
        self.record(handle).map(|r| r.constructor)
    }

    pub fn scope(&self, handle: TypeHandle) -> Result<Scope> {
        self.record(handle).map(|r| r.scope)
    }

    pub fn context(&self, handle: TypeHandle) -> Result<TypeHandle> {
        self.record(handle).map(|r| r.context_type)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every `(scope, (contextType, name), head)` triple recorded,
    /// regardless of key — the raw material for
    /// [`crate::tree::build_type_definition_tree`].
    pub(crate) fn all_heads(&self) -> impl Iterator<Item = (&(TypeHandle, Ident), &Scope, &TypeHandle)> {
        self.heads.all_entries()
    }
}
