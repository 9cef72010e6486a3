//! Combined debug info context for a source file.

use dig_ir::{BlockId, DIFlags, IrBuilder, ValueRef};

use crate::builder::DIBuilder;
use crate::compat::{ActiveRevision, Revision};
use crate::config::DebugInfoError;
use crate::line_map::LineMap;

/// Combined debug info context for a source file.
///
/// This combines a [`DIBuilder`] with a [`LineMap`] so front ends can work
/// in byte offsets instead of line/column pairs.
pub struct DebugContext<'m, R: Revision = ActiveRevision> {
    /// The debug info builder.
    pub builder: DIBuilder<'m, R>,
    /// Line map for offset-to-location conversion.
    pub line_map: LineMap,
}

impl<'m, R: Revision> DebugContext<'m, R> {
    /// Create a new debug context.
    ///
    /// # Arguments
    ///
    /// * `builder` - The debug info builder for the module
    /// * `source_text` - The source text (for line map building)
    #[must_use]
    pub fn new(builder: DIBuilder<'m, R>, source_text: &str) -> Self {
        Self {
            builder,
            line_map: LineMap::new(source_text),
        }
    }

    /// Set the cursor's position from a byte offset.
    pub fn set_location_from_offset(&self, ir: &IrBuilder<'_>, offset: u32, scope: Option<ValueRef>) {
        let (line, col) = self.line_map.offset_to_line_col(offset);
        self.builder.associate_position(ir, line, col, scope);
    }

    /// Set the cursor's position from a byte offset, in the current scope.
    pub fn set_location_in_current_scope(&self, ir: &IrBuilder<'_>, offset: u32) {
        let (line, col) = self.line_map.offset_to_line_col(offset);
        self.builder
            .associate_position(ir, line, col, self.builder.current_scope());
    }

    /// Get the line and column for a byte offset.
    #[must_use]
    pub fn offset_to_line_col(&self, offset: u32) -> (u32, u32) {
        self.line_map.offset_to_line_col(offset)
    }

    /// Create a lexical block at a given offset.
    pub fn create_lexical_block_at_offset(
        &self,
        scope: Option<ValueRef>,
        file: Option<ValueRef>,
        offset: u32,
    ) -> Option<ValueRef> {
        let (line, col) = self.line_map.offset_to_line_col(offset);
        self.builder.create_lexical_block(scope, file, line, col)
    }

    /// Push a scope (function or block).
    pub fn enter_scope(&self, scope: Option<ValueRef>) {
        self.builder.push_scope(scope);
    }

    /// Pop the current scope.
    pub fn exit_scope(&self) {
        self.builder.pop_scope();
    }

    /// Declare a local variable stored at `storage`.
    ///
    /// Creates the auto variable in the current scope, a location from
    /// `offset` and an empty expression, then appends the `dbg.declare` to
    /// `block`.
    ///
    /// # Errors
    ///
    /// As [`DIBuilder::create_location`] and [`DIBuilder::insert_declare`].
    pub fn declare_local_at_offset(
        &self,
        storage: Option<ValueRef>,
        name: &str,
        file: Option<ValueRef>,
        ty: Option<ValueRef>,
        offset: u32,
        block: BlockId,
    ) -> Result<Option<ValueRef>, DebugInfoError> {
        let (line, col) = self.line_map.offset_to_line_col(offset);
        let scope = self.builder.current_scope();
        let var = self
            .builder
            .create_auto_variable(scope, name, file, line, ty, true, DIFlags::empty());
        let loc = self.builder.create_location(line, col, scope)?;
        let expr = self.builder.create_expression(&[]);
        self.builder.insert_declare(storage, var, expr, loc, block)
    }

    /// Get the debug info builder.
    #[must_use]
    pub fn di(&self) -> &DIBuilder<'m, R> {
        &self.builder
    }

    /// Finalize debug info.
    pub fn finalize(&self) {
        self.builder.finalize();
    }
}
