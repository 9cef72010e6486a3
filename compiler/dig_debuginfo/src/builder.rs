//! `DIBuilder` struct definition, construction and lifecycle.

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

use dig_ir::metadata::NodeData;
use dig_ir::{DIFlags, FlagBehavior, MetadataId, Module, ValueRef};
use smallvec::SmallVec;

use crate::compat::{ActiveRevision, Revision};
use crate::config::DebugInfoConfig;
use crate::factory::NodeFactory;
use crate::handle::{
    self, DICompileUnit, DICompositeType, DIGlobalVariable, DILocalVariable, DIScope,
    DISubprogram, DITuple, DIType, NodeRef,
};

/// Lifecycle state of a [`DIBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Accepting node creation.
    Open,
    /// Deferred nodes resolved. Further calls still work but are logged.
    Finalized,
    /// Bookkeeping released; only reachable during drop.
    Disposed,
}

/// Nodes the builder remembers until finalize.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tracked {
    pub(crate) enum_types: Vec<DICompositeType>,
    pub(crate) retained_types: Vec<DIType>,
    pub(crate) subprograms: Vec<DISubprogram>,
    pub(crate) globals: Vec<DIGlobalVariable>,
    /// Always-preserved locals, grouped by owning subprogram.
    pub(crate) preserved: Vec<(DISubprogram, SmallVec<[DILocalVariable; 4]>)>,
    /// Struct and union types created without elements and not yet patched.
    pub(crate) forward_decls: Vec<DICompositeType>,
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

impl Tracked {
    pub(crate) fn track_forward_decl(&mut self, ty: DICompositeType) {
        push_unique(&mut self.forward_decls, ty);
    }

    pub(crate) fn resolve_forward_decl(&mut self, ty: DICompositeType) {
        self.forward_decls.retain(|&t| t != ty);
    }

    pub(crate) fn track_enum(&mut self, ty: DICompositeType) {
        push_unique(&mut self.enum_types, ty);
    }

    pub(crate) fn track_retained(&mut self, ty: DIType) {
        push_unique(&mut self.retained_types, ty);
    }

    pub(crate) fn track_subprogram(&mut self, sp: DISubprogram) {
        push_unique(&mut self.subprograms, sp);
    }

    pub(crate) fn track_global(&mut self, gv: DIGlobalVariable) {
        push_unique(&mut self.globals, gv);
    }

    pub(crate) fn track_preserved(&mut self, sp: DISubprogram, var: DILocalVariable) {
        if let Some((_, vars)) = self.preserved.iter_mut().find(|(s, _)| *s == sp) {
            if !vars.contains(&var) {
                vars.push(var);
            }
        } else {
            self.preserved.push((sp, smallvec::smallvec![var]));
        }
    }
}

/// Debug-info builder for one module.
///
/// Creates nodes in the module's metadata arena through the revision `R`
/// and exposes them as `Option<ValueRef>` handles. Every builder owns its
/// own uniquing table; the nodes themselves belong to the module and
/// outlive the builder.
///
/// Drop finalizes a builder that is still open, so forward declarations
/// never outlive it unresolved.
pub struct DIBuilder<'m, R: Revision = ActiveRevision> {
    pub(crate) module: &'m Module,
    pub(crate) factory: NodeFactory<'m>,
    pub(crate) config: DebugInfoConfig,
    pub(crate) compile_unit: Cell<Option<DICompileUnit>>,
    pub(crate) tracked: RefCell<Tracked>,
    /// Current scope stack for lexical blocks.
    pub(crate) scope_stack: RefCell<Vec<DIScope>>,
    lifecycle: Cell<Lifecycle>,
    _revision: PhantomData<R>,
}

impl<'m> DIBuilder<'m> {
    /// Create a builder over the active revision with the default config.
    pub fn new(module: &'m Module) -> Self {
        Self::for_revision(module, DebugInfoConfig::default())
    }

    /// Create a builder over the active revision.
    pub fn with_config(module: &'m Module, config: DebugInfoConfig) -> Self {
        Self::for_revision(module, config)
    }
}

impl<'m, R: Revision> DIBuilder<'m, R> {
    /// Create a builder over an explicitly chosen revision.
    ///
    /// Adds the "Debug Info Version" module flag and either "Dwarf Version"
    /// or "CodeView", unless disabled in `config`.
    #[tracing::instrument(level = "debug", skip_all, fields(module = module.name(), revision = R::NAME))]
    pub fn for_revision(module: &'m Module, config: DebugInfoConfig) -> Self {
        if config.emit_module_flags {
            module.add_flag(
                FlagBehavior::Warning,
                "Debug Info Version",
                u64::from(R::DEBUG_METADATA_VERSION),
            );
            let (flag, value) = config.format.module_flag(config.dwarf_version);
            module.add_flag(FlagBehavior::Warning, flag, value);
        }
        tracing::debug!(format = %config.format, "debug info builder opened");

        Self {
            module,
            factory: NodeFactory::new(module),
            config,
            compile_unit: Cell::new(None),
            tracked: RefCell::new(Tracked::default()),
            scope_stack: RefCell::new(Vec::new()),
            lifecycle: Cell::new(Lifecycle::Open),
            _revision: PhantomData,
        }
    }

    #[inline]
    pub fn module(&self) -> &'m Module {
        self.module
    }

    #[inline]
    pub fn config(&self) -> &DebugInfoConfig {
        &self.config
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    /// Debug metadata version of this builder's revision.
    #[inline]
    pub fn debug_metadata_version(&self) -> u32 {
        R::DEBUG_METADATA_VERSION
    }

    /// The compile unit, or null before `create_compile_unit`.
    pub fn get_cu(&self) -> Option<ValueRef> {
        self.compile_unit.get().and_then(|cu| self.out(cu))
    }

    // -- Handle plumbing shared by the surface modules --

    /// Checked downcast of an incoming handle.
    pub(crate) fn md<T: NodeRef>(&self, handle: Option<ValueRef>) -> Option<T> {
        handle::unwrap_as(&self.module.metadata(), handle)
    }

    /// Incoming handle as a node of any kind.
    pub(crate) fn md_any(&self, handle: Option<ValueRef>) -> Option<MetadataId> {
        handle::unwrap_md(&self.module.metadata(), handle)
    }

    /// Copy a handle list into a uniqued tuple.
    pub(crate) fn array(&self, handles: &[Option<ValueRef>]) -> DITuple {
        let elements = handle::unwrap_list(&self.module.metadata(), handles);
        self.factory.tuple(&elements)
    }

    /// Outgoing handle, normalized through the revision.
    pub(crate) fn out<T: NodeRef>(&self, node: T) -> Option<ValueRef> {
        R::wrap(R::lift(Some(node)))
    }

    /// Log use of a builder that is no longer open.
    pub(crate) fn note_use(&self, op: &'static str) {
        let state = self.lifecycle.get();
        if state != Lifecycle::Open {
            tracing::warn!(op, ?state, "debug info builder used after finalize");
        }
    }

    // -- Lifecycle --

    /// Resolve deferred state and move to [`Lifecycle::Finalized`].
    ///
    /// Fills the compile unit's enum, retained-type, subprogram and global
    /// lists, attaches preserved locals to their subprograms, and completes
    /// every forward-declared struct or union that was never given a body
    /// (empty elements, `FWD_DECL` flag, logged). Calling it again repeats
    /// the work for nodes created since.
    #[tracing::instrument(level = "debug", skip_all, fields(module = self.module.name()))]
    pub fn finalize(&self) {
        let tracked = self.tracked.borrow().clone();

        for ty in &tracked.forward_decls {
            let name = self
                .factory
                .graph()
                .composite(ty.id())
                .map(|c| c.name.clone())
                .unwrap_or_default();
            tracing::warn!(?ty, %name, "forward declaration never completed, emitting as declaration");
            let empty = self.factory.tuple(&[]);
            self.factory.rewrite(ty.id(), |data| {
                if let NodeData::CompositeType(c) = data {
                    if c.elements.is_none() {
                        c.elements = Some(empty.id());
                        c.flags |= DIFlags::FWD_DECL;
                    }
                }
            });
        }

        for (sp, vars) in &tracked.preserved {
            let list: SmallVec<[Option<MetadataId>; 4]> = vars.iter().map(|v| Some(v.id())).collect();
            let tuple = self.factory.tuple(&list);
            self.factory.rewrite(sp.id(), |data| {
                if let NodeData::Subprogram(s) = data {
                    s.variables = Some(tuple.id());
                }
            });
        }

        if let Some(cu) = self.compile_unit.get() {
            let enum_types = self.id_tuple(&tracked.enum_types);
            let retained_types = self.id_tuple(&tracked.retained_types);
            let subprograms = self.id_tuple(&tracked.subprograms);
            let global_variables = self.id_tuple(&tracked.globals);
            self.factory.rewrite(cu.id(), |data| {
                if let NodeData::CompileUnit(unit) = data {
                    unit.enum_types = Some(enum_types.id());
                    unit.retained_types = Some(retained_types.id());
                    unit.subprograms = Some(subprograms.id());
                    unit.global_variables = Some(global_variables.id());
                }
            });
        } else {
            tracing::debug!("finalizing a builder without a compile unit");
        }

        self.tracked.borrow_mut().forward_decls.clear();

        if self.lifecycle.get() == Lifecycle::Open {
            self.lifecycle.set(Lifecycle::Finalized);
        }
        tracing::debug!("debug info builder finalized");
    }

    /// Release the builder, finalizing first if it is still open or has
    /// forward declarations created after the last finalize.
    ///
    /// The nodes it created stay in the module.
    pub fn dispose(self) {
        self.finalize_if_needed();
        self.lifecycle.set(Lifecycle::Disposed);
        tracing::debug!(module = self.module.name(), "debug info builder disposed");
    }

    fn finalize_if_needed(&self) {
        let pending = !self.tracked.borrow().forward_decls.is_empty();
        if self.lifecycle.get() == Lifecycle::Open || pending {
            self.finalize();
        }
    }

    fn id_tuple<T: NodeRef>(&self, nodes: &[T]) -> DITuple {
        let ids: Vec<Option<MetadataId>> = nodes.iter().map(|n| Some(n.id())).collect();
        self.factory.tuple(&ids)
    }
}

impl<R: Revision> Drop for DIBuilder<'_, R> {
    fn drop(&mut self) {
        if self.lifecycle.get() != Lifecycle::Disposed {
            self.finalize_if_needed();
        }
    }
}
