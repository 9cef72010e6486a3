//! Oldest revision: plain descriptor handles.

use std::fmt;

use dig_ir::metadata::{CompileUnitData, NodeData, SubprogramData, SubroutineTypeData};
use dig_ir::{DIFlags, ValueId};

use super::Revision;
use crate::factory::NodeFactory;
use crate::handle::{DICompileUnit, DICompositeType, DIFile, DISubprogram, DISubroutineType, DITuple, NodeRef};

/// Plain-struct node handle; a null descriptor wraps no node.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor<T> {
    node: Option<T>,
}

impl<T: NodeRef> Descriptor<T> {
    #[inline]
    pub fn new(node: Option<T>) -> Self {
        Self { node }
    }

    #[inline]
    pub fn null() -> Self {
        Self { node: None }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.node.is_some()
    }

    #[inline]
    pub fn get(self) -> Option<T> {
        self.node
    }
}

impl<T: NodeRef> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "Descriptor({node:?})"),
            None => f.write_str("Descriptor(null)"),
        }
    }
}

/// Revision with descriptor handles and no split-unit id.
#[derive(Copy, Clone, Debug, Default)]
pub struct DescriptorApi;

impl Revision for DescriptorApi {
    const NAME: &'static str = "descriptor";
    const DEBUG_METADATA_VERSION: u32 = 2;

    type NodeHandle<T: NodeRef> = Descriptor<T>;

    #[inline]
    fn lift<T: NodeRef>(node: Option<T>) -> Descriptor<T> {
        Descriptor::new(node)
    }

    #[inline]
    fn lower<T: NodeRef>(handle: Descriptor<T>) -> Option<T> {
        handle.get()
    }

    fn create_compile_unit(factory: &NodeFactory<'_>, mut unit: CompileUnitData) -> Descriptor<DICompileUnit> {
        if unit.dwo_id != 0 {
            tracing::debug!(dwo_id = unit.dwo_id, "split-unit id not supported by this revision, dropped");
        }
        unit.dwo_id = 0;
        Descriptor::new(Some(factory.distinct(NodeData::CompileUnit(unit))))
    }

    fn create_subroutine_type(
        factory: &NodeFactory<'_>,
        file: Descriptor<DIFile>,
        types: Descriptor<DITuple>,
        flags: DIFlags,
    ) -> Descriptor<DISubroutineType> {
        tracing::trace!(?file, "subroutine type file is not recorded");
        Descriptor::new(Some(factory.unique(NodeData::SubroutineType(
            SubroutineTypeData {
                flags,
                types: types.get().map(NodeRef::id),
            },
        ))))
    }

    fn create_function(
        factory: &NodeFactory<'_>,
        mut subprogram: SubprogramData,
        function: ValueId,
    ) -> Descriptor<DISubprogram> {
        subprogram.function = Some(function);
        Descriptor::new(Some(factory.distinct(NodeData::Subprogram(subprogram))))
    }

    fn replace_body(
        factory: &NodeFactory<'_>,
        composite: Descriptor<DICompositeType>,
        elements: Descriptor<DITuple>,
    ) {
        factory.replace_arrays(composite, elements);
    }
}
