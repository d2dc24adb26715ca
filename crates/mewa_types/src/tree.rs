//! Scope-hierarchy tree views for introspection (§4.2 "a derived
//! operation builds a *scope hierarchy tree* view", §4.6
//! `getObjectInstanceTree`/`getTypeDefinitionTree`/
//! `getReductionDefinitionTree`).
//!
//! Built by sorting every recorded scope `(start asc, end desc)` and
//! folding them onto a stack: a scope waits on the stack as long as it
//! covers the next one in sorted order, which is exactly when it is
//! that scope's nearest enclosing ancestor (§4.2: "`O(N log N)` by
//! sorting scopes by `(start asc, end desc)`").

use mewa_base::{Ident, RelationEntry, Scope};

use crate::handle::{ConstructorId, ObjectHandle, TypeHandle};
use crate::object::ObjectTable;
use crate::reduction::ReductionTable;
use crate::types::TypeTable;

/// One node of a scope-hierarchy tree: the scope it represents, every
/// entry defined in exactly that scope, and its nested children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTreeNode<E> {
    pub scope: Scope,
    pub entries: Vec<E>,
    pub children: Vec<ScopeTreeNode<E>>,
}

fn push_to_parent_or_roots<E>(stack: &mut Vec<ScopeTreeNode<E>>, roots: &mut Vec<ScopeTreeNode<E>>, node: ScopeTreeNode<E>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Builds the forest of [`ScopeTreeNode`]s from an unordered list of
/// `(scope, entry)` pairs. Entries sharing the exact same scope are
/// folded into one node (§9 note 3: scopes that define nothing simply
/// produce no node at all, never a sentinel).
fn build_scope_tree<E>(mut items: Vec<(Scope, E)>) -> Vec<ScopeTreeNode<E>> {
    items.sort_by(|a, b| a.0.start.cmp(&b.0.start).then(b.0.end.cmp(&a.0.end)));

    let mut nodes: Vec<ScopeTreeNode<E>> = Vec::new();
    for (scope, entry) in items {
        if let Some(last) = nodes.last_mut() {
            if last.scope == scope {
                last.entries.push(entry);
                continue;
            }
        }
        nodes.push(ScopeTreeNode { scope, entries: vec![entry], children: Vec::new() });
    }

    let mut roots: Vec<ScopeTreeNode<E>> = Vec::new();
    let mut stack: Vec<ScopeTreeNode<E>> = Vec::new();

    for node in nodes {
        while let Some(top) = stack.last() {
            if top.scope.covers(&node.scope) {
                break;
            }
            let finished = stack.pop().expect("stack is non-empty inside this loop");
            push_to_parent_or_roots(&mut stack, &mut roots, finished);
        }
        stack.push(node);
    }
    while let Some(finished) = stack.pop() {
        push_to_parent_or_roots(&mut stack, &mut roots, finished);
    }
    roots
}

/// One object binding recorded in an [`ObjectTable`] (§4.6
/// `getObjectInstanceTree`).
pub type ObjectInstanceEntry = (Ident, ObjectHandle);

pub fn build_object_instance_tree(objects: &ObjectTable) -> Vec<ScopeTreeNode<ObjectInstanceEntry>> {
    let items = objects.all_entries().map(|(name, scope, handle)| (*scope, (*name, *handle))).collect();
    build_scope_tree(items)
}

/// One type-overload-chain head recorded in a [`TypeTable`] (§4.6
/// `getTypeDefinitionTree`): `(contextType, name, chainHead)`.
pub type TypeDefinitionEntry = (TypeHandle, Ident, TypeHandle);

pub fn build_type_definition_tree(types: &TypeTable) -> Vec<ScopeTreeNode<TypeDefinitionEntry>> {
    let items = types
        .all_heads()
        .map(|((context_type, name), scope, head)| (*scope, (*context_type, *name, *head)))
        .collect();
    build_scope_tree(items)
}

/// One reduction edge recorded in a [`ReductionTable`] (§4.6
/// `getReductionDefinitionTree`): `(fromType, edge)`.
pub type ReductionDefinitionEntry = (TypeHandle, RelationEntry<TypeHandle, ConstructorId>);

pub fn build_reduction_definition_tree(reductions: &ReductionTable) -> Vec<ScopeTreeNode<ReductionDefinitionEntry>> {
    let items = reductions.all_edges().map(|(from_type, scope, entry)| (*scope, (*from_type, entry.clone()))).collect();
    build_scope_tree(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mewa_base::IdentTable;

    #[test]
    fn nested_scopes_become_parent_and_child() {
        let mut idents = IdentTable::new();
        let x = idents.get("x");
        let mut objects = ObjectTable::new();
        objects.set(x, Scope::new(0, 100), ObjectHandle(1)).unwrap();
        objects.set(x, Scope::new(10, 20), ObjectHandle(2)).unwrap();

        let tree = build_object_instance_tree(&objects);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].scope, Scope::new(0, 100));
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].scope, Scope::new(10, 20));
    }

    #[test]
    fn disjoint_scopes_become_siblings() {
        let mut idents = IdentTable::new();
        let x = idents.get("x");
        let y = idents.get("y");
        let mut objects = ObjectTable::new();
        objects.set(x, Scope::new(0, 10), ObjectHandle(1)).unwrap();
        objects.set(y, Scope::new(10, 20), ObjectHandle(2)).unwrap();

        let tree = build_object_instance_tree(&objects);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn empty_table_produces_no_nodes() {
        let objects = ObjectTable::new();
        assert!(build_object_instance_tree(&objects).is_empty());
    }
}
