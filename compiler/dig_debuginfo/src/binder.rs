//! Binding source positions and variables to IR.
//!
//! Positions go on the [`IrBuilder`] cursor, so every instruction built
//! after `associate_position` carries them. Variables are bound by
//! `dbg.declare` instructions that point at their storage.

use dig_ir::{BlockId, DebugLoc, InsertPoint, IrBuilder, Opcode, ValueId, ValueRef};

use crate::builder::DIBuilder;
use crate::compat::Revision;
use crate::config::{invalid_declare, DebugInfoError};
use crate::handle::{DIExpression, DILocalVariable, DILocation, DIScope, NodeRef};

impl<R: Revision> DIBuilder<'_, R> {
    /// Set the position that subsequently built instructions carry.
    ///
    /// A null or non-scope `scope` clears the position instead.
    pub fn associate_position(
        &self,
        ir: &IrBuilder<'_>,
        line: u32,
        column: u32,
        scope: Option<ValueRef>,
    ) {
        match self.md::<DIScope>(scope) {
            Some(scope) => ir.set_current_debug_location(DebugLoc::new(line, column, scope.id())),
            None => {
                tracing::debug!(line, column, "position without a scope, location cleared");
                ir.unset_current_debug_location();
            }
        }
    }

    /// Clear the cursor's position; following instructions carry none.
    pub fn deassociate_position(&self, ir: &IrBuilder<'_>) {
        ir.unset_current_debug_location();
    }

    /// Append a `dbg.declare` of `var` at `storage` to the end of `block`.
    ///
    /// # Errors
    ///
    /// `InvalidDeclare` when an operand is null or of the wrong kind, or when
    /// the location and the variable belong to different subprograms. `Ir`
    /// when the block does not exist.
    pub fn insert_declare(
        &self,
        storage: Option<ValueRef>,
        var: Option<ValueRef>,
        expr: Option<ValueRef>,
        loc: Option<ValueRef>,
        block: BlockId,
    ) -> Result<Option<ValueRef>, DebugInfoError> {
        self.note_use("insert_declare");
        self.declare(storage, var, expr, loc, InsertPoint::AtEnd(block))
    }

    /// Insert a `dbg.declare` immediately before `instruction`.
    ///
    /// # Errors
    ///
    /// As [`insert_declare`](Self::insert_declare); `Ir` when `instruction`
    /// is not an instruction in a block.
    pub fn insert_declare_before(
        &self,
        storage: Option<ValueRef>,
        var: Option<ValueRef>,
        expr: Option<ValueRef>,
        loc: Option<ValueRef>,
        instruction: ValueId,
    ) -> Result<Option<ValueRef>, DebugInfoError> {
        self.note_use("insert_declare_before");
        self.declare(storage, var, expr, loc, InsertPoint::Before(instruction))
    }

    fn declare(
        &self,
        storage: Option<ValueRef>,
        var: Option<ValueRef>,
        expr: Option<ValueRef>,
        loc: Option<ValueRef>,
        point: InsertPoint,
    ) -> Result<Option<ValueRef>, DebugInfoError> {
        let storage = storage
            .and_then(ValueRef::as_value)
            .filter(|&v| self.module.value_kind(v).is_some())
            .ok_or_else(|| invalid_declare("storage is not an IR value"))?;
        let var = self
            .md::<DILocalVariable>(var)
            .ok_or_else(|| invalid_declare("variable is not a local variable"))?;
        let expr = self
            .md::<DIExpression>(expr)
            .ok_or_else(|| invalid_declare("expression is not an expression"))?;
        let loc = self
            .md::<DILocation>(loc)
            .ok_or_else(|| invalid_declare("location is not a location"))?;

        let debug_loc = {
            let graph = self.module.metadata();
            let var_sp = graph
                .enclosing_scope(var.id())
                .and_then(|scope| graph.subprogram_of(scope))
                .ok_or_else(|| invalid_declare("variable is not inside a subprogram"))?;
            if graph.subprogram_of(loc.id()) != Some(var_sp) {
                return Err(invalid_declare("location and variable are in different subprograms"));
            }
            let data = graph
                .location(loc.id())
                .ok_or_else(|| invalid_declare("location is not a location"))?;
            DebugLoc {
                line: data.line,
                column: data.column,
                scope: data.scope,
                inlined_at: data.inlined_at,
            }
        };

        let id = self.module.insert_instruction(
            "",
            Opcode::DbgDeclare {
                storage,
                variable: var.id(),
                expression: expr.id(),
            },
            Some(debug_loc),
            point,
        )?;
        tracing::trace!(?id, ?var, "dbg.declare inserted");
        Ok(Some(ValueRef::Value(id)))
    }
}
