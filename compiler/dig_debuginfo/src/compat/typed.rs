//! Middle revision: typed node references, split-unit id supported.

use dig_ir::metadata::{CompileUnitData, NodeData, SubprogramData, SubroutineTypeData};
use dig_ir::{DIFlags, ValueId};

use super::Revision;
use crate::factory::NodeFactory;
use crate::handle::{DICompileUnit, DICompositeType, DIFile, DISubprogram, DISubroutineType, DITuple, NodeRef};

/// Revision with `Option<T>` handles where subprograms still record their
/// function.
#[derive(Copy, Clone, Debug, Default)]
pub struct TypedApi;

impl Revision for TypedApi {
    const NAME: &'static str = "typed";
    const DEBUG_METADATA_VERSION: u32 = 3;

    type NodeHandle<T: NodeRef> = Option<T>;

    #[inline]
    fn lift<T: NodeRef>(node: Option<T>) -> Option<T> {
        node
    }

    #[inline]
    fn lower<T: NodeRef>(handle: Option<T>) -> Option<T> {
        handle
    }

    fn create_compile_unit(factory: &NodeFactory<'_>, unit: CompileUnitData) -> Option<DICompileUnit> {
        Some(factory.distinct(NodeData::CompileUnit(unit)))
    }

    fn create_subroutine_type(
        factory: &NodeFactory<'_>,
        file: Option<DIFile>,
        types: Option<DITuple>,
        flags: DIFlags,
    ) -> Option<DISubroutineType> {
        tracing::trace!(?file, "subroutine type file is not recorded");
        Some(factory.unique(NodeData::SubroutineType(SubroutineTypeData {
            flags,
            types: types.map(NodeRef::id),
        })))
    }

    fn create_function(
        factory: &NodeFactory<'_>,
        mut subprogram: SubprogramData,
        function: ValueId,
    ) -> Option<DISubprogram> {
        subprogram.function = Some(function);
        Some(factory.distinct(NodeData::Subprogram(subprogram)))
    }

    fn replace_body(factory: &NodeFactory<'_>, composite: Option<DICompositeType>, elements: Option<DITuple>) {
        if let (Some(composite), Some(elements)) = (composite, elements) {
            composite.replace_elements(factory, elements);
        }
    }
}
