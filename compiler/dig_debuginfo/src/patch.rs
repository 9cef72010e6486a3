//! Completing forward-declared struct and union types.
//!
//! A composite created without elements is referenced by id from the start,
//! so members can point back at it. Patching writes the element tuple into
//! the existing node; every reference taken before the patch sees the body.
//! A patched node is complete, so any `FWD_DECL` left by an earlier
//! finalize is cleared.

use dig_ir::metadata::dwarf::{DW_TAG_STRUCTURE_TYPE, DW_TAG_UNION_TYPE};
use dig_ir::{DIFlags, MetadataId, NodeData, ValueRef};

use crate::builder::DIBuilder;
use crate::compat::{Descriptor, Revision};
use crate::config::DebugInfoError;
use crate::factory::NodeFactory;
use crate::handle::{DICompositeType, DITuple, NodeRef};

fn set_elements(factory: &NodeFactory<'_>, composite: MetadataId, elements: MetadataId) {
    let mut replaced = None;
    factory.rewrite(composite, |data| {
        if let NodeData::CompositeType(c) = data {
            replaced = Some(c.elements.replace(elements));
            c.flags.remove(DIFlags::FWD_DECL);
        }
    });
    match replaced {
        Some(Some(previous)) if previous != elements => {
            tracing::debug!(?composite, ?previous, "replacing an existing composite body");
        }
        Some(_) => tracing::trace!(?composite, ?elements, "composite body set"),
        None => tracing::warn!(?composite, "body replacement on a node that is not a composite"),
    }
}

impl NodeFactory<'_> {
    /// Replace the element array of a composite (descriptor revision).
    ///
    /// Null descriptors are ignored.
    pub fn replace_arrays(
        &self,
        composite: Descriptor<DICompositeType>,
        elements: Descriptor<DITuple>,
    ) {
        if let (Some(composite), Some(elements)) = (composite.get(), elements.get()) {
            set_elements(self, composite.id(), elements.id());
        }
    }
}

impl DICompositeType {
    /// Replace this type's element list in place.
    pub fn replace_elements(self, factory: &NodeFactory<'_>, elements: DITuple) {
        set_elements(factory, self.id(), elements.id());
    }
}

impl<R: Revision> DIBuilder<'_, R> {
    /// Give a forward-declared struct its members.
    ///
    /// # Errors
    ///
    /// `NotAComposite` if `ty` is null or not a composite type.
    pub fn set_struct_body(
        &self,
        ty: Option<ValueRef>,
        elements: &[Option<ValueRef>],
    ) -> Result<(), DebugInfoError> {
        self.note_use("set_struct_body");
        self.set_body(ty, elements, DW_TAG_STRUCTURE_TYPE)
    }

    /// Give a forward-declared union its members.
    ///
    /// # Errors
    ///
    /// `NotAComposite` if `ty` is null or not a composite type.
    pub fn set_union_body(
        &self,
        ty: Option<ValueRef>,
        elements: &[Option<ValueRef>],
    ) -> Result<(), DebugInfoError> {
        self.note_use("set_union_body");
        self.set_body(ty, elements, DW_TAG_UNION_TYPE)
    }

    fn set_body(
        &self,
        ty: Option<ValueRef>,
        elements: &[Option<ValueRef>],
        expected_tag: u32,
    ) -> Result<(), DebugInfoError> {
        let composite = self
            .md::<DICompositeType>(ty)
            .ok_or(DebugInfoError::NotAComposite)?;

        let tag = self.factory.graph().composite(composite.id()).map(|c| c.tag);
        if tag != Some(expected_tag) {
            tracing::warn!(?composite, ?tag, expected_tag, "body tag does not match the composite");
        }

        let tuple = self.array(elements);
        R::replace_body(&self.factory, R::lift(Some(composite)), R::lift(Some(tuple)));
        self.tracked.borrow_mut().resolve_forward_decl(composite);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests {
    use dig_ir::Module;

    use crate::compat::{DescriptorApi, TypedApi};
    use crate::{DIBuilder, DIFlags, DebugInfoConfig, DebugInfoError, StructTypeParams};

    #[test]
    fn body_lands_on_the_declared_node() {
        let module = Module::new("m");
        let di = DIBuilder::<TypedApi>::for_revision(&module, DebugInfoConfig::default());
        let node = di.create_struct_type(StructTypeParams::new("Node", 64, 64, &[]));
        let ptr = di.create_pointer_type(node, 64, 64, "");
        di.set_struct_body(node, &[ptr]).unwrap();

        let id = node.and_then(|h| h.as_metadata()).unwrap();
        let graph = module.metadata();
        let elements = graph.composite_elements(id).unwrap();
        assert_eq!(elements, &[ptr.and_then(|h| h.as_metadata())]);
    }

    #[test]
    fn null_and_non_composite_targets_are_rejected() {
        let module = Module::new("m");
        let di = DIBuilder::<DescriptorApi>::for_revision(&module, DebugInfoConfig::default());
        assert_eq!(di.set_struct_body(None, &[]), Err(DebugInfoError::NotAComposite));
        let int = di.create_basic_type("int", 32, 32, 5);
        assert_eq!(di.set_union_body(int, &[]), Err(DebugInfoError::NotAComposite));
    }

    #[test]
    fn patch_after_finalize_completes_the_declaration() {
        let module = Module::new("m");
        let di = DIBuilder::<TypedApi>::for_revision(&module, DebugInfoConfig::default());
        let node = di.create_struct_type(StructTypeParams::new("Node", 32, 32, &[]));
        di.finalize();
        let int = di.create_basic_type("int", 32, 32, 5);
        di.set_struct_body(node, &[int]).unwrap();

        let id = node.and_then(|h| h.as_metadata()).unwrap();
        let graph = module.metadata();
        let composite = graph.composite(id).unwrap();
        assert!(!composite.flags.contains(DIFlags::FWD_DECL));
        assert_eq!(graph.composite_elements(id).unwrap(), &[int.and_then(|h| h.as_metadata())]);
    }
}
