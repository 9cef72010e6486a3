//! Per-builder content-addressed node table.
//!
//! Maps the full content of every uniqued node this builder created to its
//! id. Distinct nodes never enter the table. When a uniqued node is
//! rewritten in place, its entry is re-keyed; if the new content already
//! belongs to another node, the rewritten node is made distinct instead of
//! merged, so both identities survive.

use dig_ir::{MetadataGraph, MetadataId, NodeData, Storage};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub(crate) struct UniquingTable {
    map: FxHashMap<NodeData, MetadataId>,
}

impl UniquingTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    /// Return the node with this content, creating it if needed.
    pub(crate) fn get_or_insert(&mut self, graph: &mut MetadataGraph, data: NodeData) -> MetadataId {
        if let Some(&id) = self.map.get(&data) {
            return id;
        }
        let id = graph.push(data.clone(), Storage::Uniqued);
        self.map.insert(data, id);
        id
    }

    /// Rewrite a node in place and keep the table consistent.
    ///
    /// Returns `true` if the node had to be made distinct because its new
    /// content collides with another uniqued node.
    pub(crate) fn rewrite(
        &mut self,
        graph: &mut MetadataGraph,
        id: MetadataId,
        edit: impl FnOnce(&mut NodeData),
    ) -> bool {
        let uniqued = graph.storage(id) == Some(Storage::Uniqued);
        let Some(data) = graph.get_mut(id) else {
            return false;
        };
        if uniqued && self.map.get(data) == Some(&id) {
            self.map.remove(data);
        }
        edit(data);
        if !uniqued {
            return false;
        }
        match self.map.get(data) {
            Some(&other) if other != id => {
                graph.make_distinct(id);
                true
            }
            _ => {
                self.map.insert(data.clone(), id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dig_ir::metadata::FileData;
    use dig_ir::{MetadataGraph, NodeData, Storage};

    use super::UniquingTable;

    fn file(name: &str) -> NodeData {
        NodeData::File(FileData {
            filename: name.into(),
            directory: "/src".into(),
        })
    }

    #[test]
    fn equal_content_shares_a_node() {
        let mut graph = MetadataGraph::new();
        let mut table = UniquingTable::new();
        let a = table.get_or_insert(&mut graph, file("a.c"));
        let b = table.get_or_insert(&mut graph, file("a.c"));
        let c = table.get_or_insert(&mut graph, file("c.c"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(graph.len(), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn rewrite_rekeys_entry() {
        let mut graph = MetadataGraph::new();
        let mut table = UniquingTable::new();
        let a = table.get_or_insert(&mut graph, file("a.c"));
        let collided = table.rewrite(&mut graph, a, |data| *data = file("b.c"));
        assert!(!collided);
        assert_eq!(table.get_or_insert(&mut graph, file("b.c")), a);
        let fresh = table.get_or_insert(&mut graph, file("a.c"));
        assert_ne!(fresh, a);
    }

    #[test]
    fn colliding_rewrite_becomes_distinct() {
        let mut graph = MetadataGraph::new();
        let mut table = UniquingTable::new();
        let a = table.get_or_insert(&mut graph, file("a.c"));
        let b = table.get_or_insert(&mut graph, file("b.c"));
        assert!(table.rewrite(&mut graph, a, |data| *data = file("b.c")));
        assert_eq!(graph.storage(a), Some(Storage::Distinct));
        assert_eq!(table.get_or_insert(&mut graph, file("b.c")), b);
        assert_eq!(graph.get(a), graph.get(b));
    }

    #[test]
    fn distinct_nodes_are_edited_without_table_changes() {
        let mut graph = MetadataGraph::new();
        let mut table = UniquingTable::new();
        let d = graph.push(file("d.c"), Storage::Distinct);
        assert!(!table.rewrite(&mut graph, d, |data| *data = file("e.c")));
        assert_eq!(table.len(), 0);
        assert_eq!(graph.storage(d), Some(Storage::Distinct));
    }
}
