//! `DIBuilder` methods for functions, scopes, variables, expressions and
//! locations.

use dig_ir::metadata::{
    GlobalVariableData, LexicalBlockData, LexicalBlockFileData, LocalVariableData, LocationData,
    SubprogramData,
};
use dig_ir::{DIFlags, NodeData, ValueKind, ValueRef};

use crate::builder::DIBuilder;
use crate::compat::Revision;
use crate::config::DebugInfoError;
use crate::handle::{
    DIExpression, DIFile, DIGlobalVariable, DILexicalBlock, DILexicalBlockFile, DILocalVariable,
    DILocation, DIScope, DISubprogram, DISubroutineType, DITuple, DIType, NodeRef,
};
use crate::params::{FunctionParams, GlobalVariableParams};

impl<R: Revision> DIBuilder<'_, R> {
    // -- Function Debug Info --

    /// Create the subprogram for a function and attach it to the function.
    ///
    /// The attachment is made for every revision; revisions that also record
    /// the function on the node do so as well. A function that already has a
    /// subprogram gets the new one.
    ///
    /// # Errors
    ///
    /// `NotAFunction` if `params.function` is not a function value of this
    /// module.
    pub fn create_function(
        &self,
        params: FunctionParams<'_>,
    ) -> Result<Option<ValueRef>, DebugInfoError> {
        self.note_use("create_function");
        let function = params
            .function
            .and_then(ValueRef::as_value)
            .filter(|&f| self.module.value_kind(f) == Some(ValueKind::Function))
            .ok_or(DebugInfoError::NotAFunction)?;

        let data = SubprogramData {
            scope: self.md::<DIScope>(params.scope).map(NodeRef::id),
            name: params.name.to_string(),
            linkage_name: params.linkage_name.to_string(),
            file: self.md::<DIFile>(params.file).map(NodeRef::id),
            line: params.line,
            ty: self.md::<DISubroutineType>(params.ty).map(NodeRef::id),
            is_local: params.is_local,
            is_definition: params.is_definition,
            scope_line: params.scope_line,
            flags: params.flags,
            is_optimized: params.is_optimized,
            function: None,
            template_params: self.md::<DITuple>(params.template_params).map(NodeRef::id),
            declaration: self.md::<DISubprogram>(params.declaration).map(NodeRef::id),
            variables: None,
        };

        let handle = R::create_function(&self.factory, data, function);
        if let Some(sp) = R::lower(handle) {
            if let Some(previous) = self.module.subprogram(function) {
                tracing::warn!(?function, ?previous, "function already had a subprogram, replaced");
            }
            self.module.set_subprogram(function, sp.id())?;
            self.tracked.borrow_mut().track_subprogram(sp);
            tracing::debug!(?sp, name = params.name, "subprogram attached");
        }
        Ok(R::wrap(handle))
    }

    // -- Scopes --

    /// A lexical block nested in `scope`. Every call creates a new block.
    pub fn create_lexical_block(
        &self,
        scope: Option<ValueRef>,
        file: Option<ValueRef>,
        line: u32,
        column: u32,
    ) -> Option<ValueRef> {
        self.note_use("create_lexical_block");
        let block: DILexicalBlock = self.factory.distinct(NodeData::LexicalBlock(LexicalBlockData {
            scope: self.md::<DIScope>(scope).map(NodeRef::id),
            file: self.md::<DIFile>(file).map(NodeRef::id),
            line,
            column,
        }));
        self.out(block)
    }

    /// A file switch inside `scope`, distinguished by `discriminator`.
    pub fn create_lexical_block_file(
        &self,
        scope: Option<ValueRef>,
        file: Option<ValueRef>,
        discriminator: u32,
    ) -> Option<ValueRef> {
        self.note_use("create_lexical_block_file");
        let block: DILexicalBlockFile =
            self.factory.unique(NodeData::LexicalBlockFile(LexicalBlockFileData {
                scope: self.md::<DIScope>(scope).map(NodeRef::id),
                file: self.md::<DIFile>(file).map(NodeRef::id),
                discriminator,
            }));
        self.out(block)
    }

    /// Push a scope onto the scope stack. Null and non-scope handles are
    /// ignored.
    pub fn push_scope(&self, scope: Option<ValueRef>) {
        if let Some(scope) = self.md::<DIScope>(scope) {
            self.scope_stack.borrow_mut().push(scope);
        }
    }

    /// Pop a scope from the scope stack.
    pub fn pop_scope(&self) -> Option<ValueRef> {
        let scope = self.scope_stack.borrow_mut().pop()?;
        self.out(scope)
    }

    /// Get the current scope (top of stack or compile unit).
    pub fn current_scope(&self) -> Option<ValueRef> {
        let top = self.scope_stack.borrow().last().copied();
        match top {
            Some(scope) => self.out(scope),
            None => self.get_cu(),
        }
    }

    /// The enclosing-scope walk from `node` up to the compile unit.
    ///
    /// The first entry is `node` itself. Nodes without an explicit scope are
    /// enclosed by the compile unit. The walk takes at most one hop per node
    /// in the graph, so a malformed cycle ends it early.
    pub fn scope_chain(&self, node: Option<ValueRef>) -> Vec<ValueRef> {
        let Some(start) = self.md_any(node) else {
            return Vec::new();
        };
        let cu = self.compile_unit.get().map(NodeRef::id);
        let graph = self.module.metadata();

        let mut chain = vec![start];
        let mut current = start;
        for _ in 0..graph.len() {
            if Some(current) == cu {
                break;
            }
            match graph.enclosing_scope(current) {
                Some(parent) => {
                    chain.push(parent);
                    current = parent;
                }
                None => {
                    chain.extend(cu);
                    break;
                }
            }
        }
        if chain.last().copied() != cu {
            tracing::warn!(?start, "scope chain does not reach the compile unit");
        }
        chain.into_iter().map(ValueRef::Metadata).collect()
    }

    // -- Variable Debug Info --

    /// Create a local (auto) variable.
    ///
    /// # Arguments
    ///
    /// * `scope` - The local scope containing the variable
    /// * `always_preserve` - Keep the variable in its subprogram's variable
    ///   list even if no `dbg.declare` survives
    #[allow(clippy::too_many_arguments, reason = "mirrors the node's fields")]
    pub fn create_auto_variable(
        &self,
        scope: Option<ValueRef>,
        name: &str,
        file: Option<ValueRef>,
        line: u32,
        ty: Option<ValueRef>,
        always_preserve: bool,
        flags: DIFlags,
    ) -> Option<ValueRef> {
        self.note_use("create_auto_variable");
        let var = self.local_variable(scope, name, file, line, ty, 0, flags, always_preserve);
        self.out(var)
    }

    /// Create a function parameter variable.
    ///
    /// Parameter numbers are 1-indexed (first param = 1).
    #[allow(clippy::too_many_arguments, reason = "mirrors the node's fields")]
    pub fn create_parameter_variable(
        &self,
        scope: Option<ValueRef>,
        name: &str,
        arg_no: u32,
        file: Option<ValueRef>,
        line: u32,
        ty: Option<ValueRef>,
        always_preserve: bool,
        flags: DIFlags,
    ) -> Option<ValueRef> {
        self.note_use("create_parameter_variable");
        if arg_no == 0 {
            tracing::warn!(name, "parameter numbers start at 1");
        }
        let var = self.local_variable(scope, name, file, line, ty, arg_no, flags, always_preserve);
        self.out(var)
    }

    #[allow(clippy::too_many_arguments, reason = "shared by both variable kinds")]
    fn local_variable(
        &self,
        scope: Option<ValueRef>,
        name: &str,
        file: Option<ValueRef>,
        line: u32,
        ty: Option<ValueRef>,
        arg: u32,
        flags: DIFlags,
        always_preserve: bool,
    ) -> DILocalVariable {
        let scope = self.md::<DIScope>(scope);
        let var: DILocalVariable = self.factory.unique(NodeData::LocalVariable(LocalVariableData {
            scope: scope.map(NodeRef::id),
            name: name.to_string(),
            file: self.md::<DIFile>(file).map(NodeRef::id),
            line,
            ty: self.md::<DIType>(ty).map(NodeRef::id),
            arg,
            flags,
        }));

        if always_preserve {
            let owner = scope.and_then(|s| self.factory.graph().subprogram_of(s.id()));
            match owner {
                Some(sp) => self
                    .tracked
                    .borrow_mut()
                    .track_preserved(DISubprogram::from_id_unchecked(sp), var),
                None => tracing::warn!(?var, "preserved variable is not inside a subprogram"),
            }
        }
        var
    }

    /// Create a global variable; listed in the compile unit at finalize.
    ///
    /// Definitions are always distinct nodes; declarations are uniqued.
    pub fn create_global_variable(&self, params: GlobalVariableParams<'_>) -> Option<ValueRef> {
        self.note_use("create_global_variable");
        let constant = match params.value {
            Some(ValueRef::Value(v)) => Some(v),
            Some(ValueRef::Metadata(id)) => {
                tracing::warn!(?id, "global variable value is metadata, dropped");
                None
            }
            None => None,
        };
        let data = NodeData::GlobalVariable(GlobalVariableData {
            scope: self.md::<DIScope>(params.scope).map(NodeRef::id),
            name: params.name.to_string(),
            linkage_name: params.linkage_name.to_string(),
            file: self.md::<DIFile>(params.file).map(NodeRef::id),
            line: params.line,
            ty: self.md::<DIType>(params.ty).map(NodeRef::id),
            is_local: params.is_local,
            is_definition: params.is_definition,
            constant,
            declaration: self.md::<DIGlobalVariable>(params.declaration).map(NodeRef::id),
        });
        let gv: DIGlobalVariable = if params.is_definition {
            self.factory.distinct(data)
        } else {
            self.factory.unique(data)
        };
        self.tracked.borrow_mut().track_global(gv);
        self.out(gv)
    }

    // -- Expressions and Locations --

    /// A location expression; an empty list means "the storage itself".
    pub fn create_expression(&self, ops: &[u64]) -> Option<ValueRef> {
        self.note_use("create_expression");
        let expr: DIExpression = self.factory.unique(NodeData::Expression(ops.to_vec()));
        self.out(expr)
    }

    /// Create a debug location (line/column/scope).
    ///
    /// # Errors
    ///
    /// `MissingScope` if `scope` is null or not a scope.
    pub fn create_location(
        &self,
        line: u32,
        column: u32,
        scope: Option<ValueRef>,
    ) -> Result<Option<ValueRef>, DebugInfoError> {
        self.note_use("create_location");
        let scope = self.md::<DIScope>(scope).ok_or(DebugInfoError::MissingScope)?;
        let loc: DILocation = self.factory.unique(NodeData::Location(LocationData {
            line,
            column,
            scope: scope.id(),
            inlined_at: None,
        }));
        Ok(self.out(loc))
    }
}
