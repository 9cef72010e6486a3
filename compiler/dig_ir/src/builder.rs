//! ID-based instruction cursor.
//!
//! `IrBuilder` borrows a [`Module`] and appends instructions at an insertion
//! point, stamping each with the cursor's current debug location. Callers only
//! handle `Copy` ids.
//!
//! | Category | Methods |
//! |----------|---------|
//! | Position | `position_at_end`, `position_before`, `insert_point` |
//! | Debug location | `set_current_debug_location`, `unset_current_debug_location` |
//! | Memory | `build_alloca`, `build_load`, `build_store` |
//! | Control flow | `build_call`, `build_return` |

use std::cell::Cell;

use crate::error::IrError;
use crate::module::Module;
use crate::value::{BlockId, DebugLoc, InsertPoint, Opcode, ValueId};

/// Instruction builder over a shared module.
pub struct IrBuilder<'m> {
    module: &'m Module,
    insert_point: Cell<Option<InsertPoint>>,
    debug_loc: Cell<Option<DebugLoc>>,
}

impl<'m> IrBuilder<'m> {
    pub fn new(module: &'m Module) -> Self {
        Self {
            module,
            insert_point: Cell::new(None),
            debug_loc: Cell::new(None),
        }
    }

    #[inline]
    pub fn module(&self) -> &'m Module {
        self.module
    }

    // -- Position --

    /// Append subsequent instructions to the end of `block`.
    pub fn position_at_end(&self, block: BlockId) {
        self.insert_point.set(Some(InsertPoint::AtEnd(block)));
    }

    /// Insert subsequent instructions immediately before `instruction`.
    pub fn position_before(&self, instruction: ValueId) {
        self.insert_point.set(Some(InsertPoint::Before(instruction)));
    }

    #[inline]
    pub fn insert_point(&self) -> Option<InsertPoint> {
        self.insert_point.get()
    }

    // -- Debug location --

    pub fn set_current_debug_location(&self, loc: DebugLoc) {
        self.debug_loc.set(Some(loc));
    }

    pub fn unset_current_debug_location(&self) {
        self.debug_loc.set(None);
    }

    #[inline]
    pub fn current_debug_location(&self) -> Option<DebugLoc> {
        self.debug_loc.get()
    }

    // -- Instructions --

    fn insert(&self, name: &str, opcode: Opcode) -> Result<ValueId, IrError> {
        let point = self.insert_point.get().ok_or(IrError::NoInsertPoint)?;
        let id = self
            .module
            .insert_instruction(name, opcode, self.debug_loc.get(), point)?;
        tracing::trace!(?id, name, "built instruction");
        Ok(id)
    }

    pub fn build_alloca(&self, name: &str) -> Result<ValueId, IrError> {
        self.insert(name, Opcode::Alloca)
    }

    pub fn build_load(&self, ptr: ValueId, name: &str) -> Result<ValueId, IrError> {
        self.insert(name, Opcode::Load { ptr })
    }

    pub fn build_store(&self, value: ValueId, ptr: ValueId) -> Result<ValueId, IrError> {
        self.insert("", Opcode::Store { value, ptr })
    }

    pub fn build_call(
        &self,
        callee: ValueId,
        args: &[ValueId],
        name: &str,
    ) -> Result<ValueId, IrError> {
        self.insert(
            name,
            Opcode::Call {
                callee,
                args: args.to_vec(),
            },
        )
    }

    pub fn build_return(&self, value: Option<ValueId>) -> Result<ValueId, IrError> {
        self.insert("", Opcode::Ret(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
