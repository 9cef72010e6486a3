//! Newest revision: the function records its subprogram, not the reverse.

use dig_ir::metadata::{CompileUnitData, NodeData, SubprogramData, SubroutineTypeData};
use dig_ir::{DIFlags, ValueId};

use super::Revision;
use crate::factory::NodeFactory;
use crate::handle::{DICompileUnit, DICompositeType, DIFile, DISubprogram, DISubroutineType, DITuple, NodeRef};

/// Revision with `Option<T>` handles and subprograms detached from their
/// function. Subroutine types take no file and template parameters are not
/// supported.
#[derive(Copy, Clone, Debug, Default)]
pub struct DetachedApi;

impl Revision for DetachedApi {
    const NAME: &'static str = "detached";
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
        _file: Option<DIFile>,
        types: Option<DITuple>,
        flags: DIFlags,
    ) -> Option<DISubroutineType> {
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
        if subprogram.template_params.take().is_some() {
            tracing::debug!(?function, "template parameters not supported by this revision, dropped");
        }
        subprogram.function = None;
        Some(factory.distinct(NodeData::Subprogram(subprogram)))
    }

    fn replace_body(factory: &NodeFactory<'_>, composite: Option<DICompositeType>, elements: Option<DITuple>) {
        if let (Some(composite), Some(elements)) = (composite, elements) {
            composite.replace_elements(factory, elements);
        }
    }
}
