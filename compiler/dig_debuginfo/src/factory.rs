//! Typed node creation over a module's metadata arena.
//!
//! `NodeFactory` is the revision-neutral core every [`Revision`] builds on:
//! it owns the builder's uniquing table and creates uniqued or distinct
//! nodes, returning typed references. It never sees opaque handles; those
//! are resolved by the builder before a factory call.
//!
//! [`Revision`]: crate::Revision

use std::cell::{Ref, RefCell};

use dig_ir::{MetadataGraph, MetadataId, Module, NodeData, Storage};

use crate::handle::{DITuple, NodeRef};
use crate::uniquing::UniquingTable;

pub struct NodeFactory<'m> {
    module: &'m Module,
    table: RefCell<UniquingTable>,
}

impl<'m> NodeFactory<'m> {
    pub fn new(module: &'m Module) -> Self {
        Self {
            module,
            table: RefCell::new(UniquingTable::new()),
        }
    }

    #[inline]
    pub fn module(&self) -> &'m Module {
        self.module
    }

    /// Shared view of the metadata graph.
    ///
    /// Drop the guard before calling any creating method.
    pub fn graph(&self) -> Ref<'m, MetadataGraph> {
        self.module.metadata()
    }

    /// Number of uniqued nodes this factory has created.
    pub fn uniqued_count(&self) -> usize {
        self.table.borrow().len()
    }

    /// Return the node with this content, creating it if needed.
    pub fn unique<T: NodeRef>(&self, data: NodeData) -> T {
        debug_assert!(T::accepts(data.kind()), "{} cannot hold {}", T::NAME, data.kind());
        let kind = data.kind();
        let mut graph = self.module.metadata_mut();
        let before = graph.len();
        let id = self.table.borrow_mut().get_or_insert(&mut graph, data);
        if graph.len() > before {
            tracing::trace!(?id, %kind, "created uniqued node");
        }
        T::from_id_unchecked(id)
    }

    /// Create a node that never takes part in uniquing.
    pub fn distinct<T: NodeRef>(&self, data: NodeData) -> T {
        debug_assert!(T::accepts(data.kind()), "{} cannot hold {}", T::NAME, data.kind());
        let kind = data.kind();
        let id = self.module.metadata_mut().push(data, Storage::Distinct);
        tracing::trace!(?id, %kind, "created distinct node");
        T::from_id_unchecked(id)
    }

    /// Uniqued tuple of the given elements.
    ///
    /// Equal element lists give the same tuple however they were supplied.
    pub fn tuple(&self, elements: &[Option<MetadataId>]) -> DITuple {
        self.unique(NodeData::Tuple(elements.to_vec()))
    }

    /// Rewrite a node in place, keeping uniquing consistent.
    ///
    /// Returns `true` if the node was made distinct because its new content
    /// matches another node.
    pub fn rewrite(&self, id: MetadataId, edit: impl FnOnce(&mut NodeData)) -> bool {
        let mut graph = self.module.metadata_mut();
        let collided = self.table.borrow_mut().rewrite(&mut graph, id, edit);
        if collided {
            tracing::debug!(?id, "rewritten node collides with an existing node, made distinct");
        }
        collided
    }
}

#[cfg(test)]
mod tests {
    use dig_ir::metadata::FileData;
    use dig_ir::{Module, NodeData, Storage};

    use super::NodeFactory;
    use crate::handle::{DIExpression, DIFile, NodeRef};

    #[test]
    fn tuples_unique_by_content() {
        let module = Module::new("m");
        let factory = NodeFactory::new(&module);
        let file: DIFile = factory.unique(NodeData::File(FileData {
            filename: "a.c".into(),
            directory: String::new(),
        }));
        let first = [Some(file.id()), None];
        let second = vec![Some(file.id()), None];
        assert_eq!(factory.tuple(&first), factory.tuple(&second));
        assert_ne!(factory.tuple(&first), factory.tuple(&[None]));
    }

    #[test]
    fn distinct_nodes_never_merge() {
        let module = Module::new("m");
        let factory = NodeFactory::new(&module);
        let ops: Vec<u64> = vec![6];
        let a: DIExpression = factory.distinct(NodeData::Expression(ops.clone()));
        let b: DIExpression = factory.unique(NodeData::Expression(ops));
        assert_ne!(a, b);
        assert_eq!(factory.graph().storage(a.id()), Some(Storage::Distinct));
        assert_eq!(factory.uniqued_count(), 1);
    }
}
