//! The top-level [`TypeDatabase`] (§4.6): one value owning the named-
//! object map, the type table and the reduction table for a single
//! compilation (§9 "Object ownership": "All major tables... are owned
//! by one `TypeDatabase` value").

use mewa_base::error::{ErrorCode, MewaError, Result};
use mewa_base::{Ident, IdentTable, Scope, Step};

use crate::derive::{derive_type, DeriveResult};
use crate::handle::{ConstructorId, ObjectHandle, TypeHandle};
use crate::object::ObjectTable;
use crate::reduction::{Reduction, ReductionTable};
use crate::resolve::{resolve_type, ResolveResult};
use crate::tree::{
    build_object_instance_tree, build_reduction_definition_tree, build_type_definition_tree, ObjectInstanceEntry,
    ReductionDefinitionEntry, ScopeTreeNode, TypeDefinitionEntry,
};
use crate::types::{DefineTypeOutcome, Parameter, TypeTable};

/// The scoped object/type/reduction database a single compilation
/// builds up as the driver runs its semantic actions (§1, §4.6).
#[derive(Debug, Clone, Default)]
pub struct TypeDatabase {
    objects: ObjectTable,
    types: TypeTable,
    reductions: ReductionTable,
}

impl TypeDatabase {
    pub fn new() -> Self {
        TypeDatabase { objects: ObjectTable::new(), types: TypeTable::new(), reductions: ReductionTable::new() }
    }

    // --- Object instances ---

    pub fn set_object_instance(&mut self, name: Ident, scope: Scope, handle: ObjectHandle) -> Result<()> {
        self.objects
            .set(name, scope, handle)
            .map_err(|e| MewaError::new(ErrorCode::ScopeHierarchyError, e.to_string()))
    }

    pub fn get_object_instance(&self, name: Ident, step: Step) -> Option<ObjectHandle> {
        self.objects.get(name, step)
    }

    pub fn get_object_instance_tree(&self) -> Vec<ScopeTreeNode<ObjectInstanceEntry>> {
        build_object_instance_tree(&self.objects)
    }

    // --- Types ---

    #[allow(clippy::too_many_arguments)]
    pub fn define_type(
        &mut self,
        scope: Scope,
        context_type: TypeHandle,
        name: Ident,
        constructor: ConstructorId,
        parameters: &[Parameter],
        priority: u16,
    ) -> Result<DefineTypeOutcome> {
        self.types.define(scope, context_type, name, constructor, parameters, priority)
    }

    pub fn get_type(&self, scope: Scope, context_type: TypeHandle, name: Ident, parameter_types: &[TypeHandle]) -> Option<TypeHandle> {
        self.types.get(scope, context_type, name, parameter_types)
    }

    pub fn get_type_definition_tree(&self) -> Vec<ScopeTreeNode<TypeDefinitionEntry>> {
        build_type_definition_tree(&self.types)
    }

    pub fn type_name(&self, handle: TypeHandle) -> Result<Ident> {
        self.types.name(handle)
    }

    pub fn type_parameters(&self, handle: TypeHandle) -> Result<&[Parameter]> {
        self.types.parameters(handle)
    }

    pub fn type_constructor(&self, handle: TypeHandle) -> Result<ConstructorId> {
        self.types.constructor(handle)
    }

    pub fn type_scope(&self, handle: TypeHandle) -> Result<Scope> {
        self.types.scope(handle)
    }

    /// A fully-qualified, human-readable rendering of `handle`:
    /// `context.name(paramType, ...)`, omitting the context prefix for a
    /// handle defined at global scope (§4.6 `typeToString`).
    pub fn type_to_string(&self, idents: &IdentTable, handle: TypeHandle) -> Result<String> {
        let mut out = String::new();
        let context = self.types.context(handle)?;
        if !context.is_none() {
            out.push_str(&self.type_to_string(idents, context)?);
            out.push('.');
        }
        out.push_str(idents.inv(self.types.name(handle)?));

        let params = self.types.parameters(handle)?;
        if !params.is_empty() {
            out.push('(');
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(idents.inv(self.types.name(param.ty)?));
            }
            out.push(')');
        }
        Ok(out)
    }

    // --- Reductions ---

    pub fn define_reduction(
        &mut self,
        scope: Scope,
        to_type: TypeHandle,
        from_type: TypeHandle,
        constructor: ConstructorId,
        tag: u8,
        weight: u32,
    ) -> Result<()> {
        self.reductions.define(scope, to_type, from_type, constructor, tag, weight)
    }

    pub fn get_reduction(&self, step: Step, to_type: TypeHandle, from_type: TypeHandle, tag_mask: u32) -> Result<Option<Reduction>> {
        self.reductions.get_reduction(step, to_type, from_type, tag_mask)
    }

    pub fn reductions(&self, step: Step, from_type: TypeHandle, tag_mask: u32) -> Vec<Reduction> {
        self.reductions.reductions(step, from_type, tag_mask)
    }

    pub fn get_reduction_definition_tree(&self) -> Vec<ScopeTreeNode<ReductionDefinitionEntry>> {
        build_reduction_definition_tree(&self.reductions)
    }

    // --- Search ---

    #[allow(clippy::too_many_arguments)]
    pub fn derive_type(
        &self,
        step: Step,
        from_type: TypeHandle,
        to_type: TypeHandle,
        tag_mask: u32,
        length_count_mask: u32,
        max_length_count: u32,
    ) -> Result<DeriveResult> {
        derive_type(&self.reductions, step, from_type, to_type, tag_mask, length_count_mask, max_length_count)
    }

    pub fn resolve_type(
        &self,
        step: Step,
        context_types: &[TypeHandle],
        name: Ident,
        tag_mask: u32,
    ) -> Result<Option<ResolveResult>> {
        resolve_type(&self.types, &self.reductions, step, context_types, name, tag_mask)
    }
}
