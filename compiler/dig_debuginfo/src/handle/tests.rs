use dig_ir::metadata::{
    BasicTypeData, CompileUnitData, CompositeTypeData, DerivedTypeData, EnumeratorData, FileData,
    GlobalVariableData, LexicalBlockData, LexicalBlockFileData, LocalVariableData, LocationData,
    SubprogramData, SubrangeData, SubroutineTypeData,
};
use dig_ir::{DIFlags, EmissionKind, MetadataGraph, NodeData, Storage, ValueId};
use proptest::prelude::*;

use super::*;

/// One node of every kind, each referring only to node 0 (the file).
fn one_of_each() -> Vec<NodeData> {
    let file = MetadataId::from_raw(0);
    vec![
        NodeData::File(FileData {
            filename: "a.c".into(),
            directory: "/src".into(),
        }),
        NodeData::Tuple(vec![Some(file), None]),
        NodeData::CompileUnit(CompileUnitData {
            language: 12,
            file,
            producer: "testcc 1.0".into(),
            is_optimized: false,
            flags: String::new(),
            runtime_version: 0,
            split_debug_filename: String::new(),
            emission_kind: EmissionKind::Full,
            dwo_id: 0,
            emit_debug_info: true,
            enum_types: None,
            retained_types: None,
            subprograms: None,
            global_variables: None,
        }),
        NodeData::BasicType(BasicTypeData {
            tag: 0x24,
            name: "int".into(),
            size_bits: 32,
            align_bits: 32,
            encoding: 5,
        }),
        NodeData::DerivedType(DerivedTypeData {
            tag: 0x0f,
            scope: None,
            name: String::new(),
            file: None,
            line: 0,
            base_type: None,
            size_bits: 64,
            align_bits: 64,
            offset_bits: 0,
            flags: DIFlags::empty(),
        }),
        NodeData::CompositeType(CompositeTypeData {
            tag: 0x13,
            scope: None,
            name: "S".into(),
            file: Some(file),
            line: 3,
            size_bits: 0,
            align_bits: 0,
            flags: DIFlags::empty(),
            elements: None,
            base_type: None,
            vtable_holder: None,
            runtime_lang: 0,
            identifier: String::new(),
        }),
        NodeData::SubroutineType(SubroutineTypeData {
            flags: DIFlags::empty(),
            types: None,
        }),
        NodeData::Subprogram(SubprogramData {
            scope: Some(file),
            name: "foo".into(),
            linkage_name: String::new(),
            file: Some(file),
            line: 1,
            ty: None,
            is_local: false,
            is_definition: true,
            scope_line: 1,
            flags: DIFlags::empty(),
            is_optimized: false,
            function: None,
            template_params: None,
            declaration: None,
            variables: None,
        }),
        NodeData::LexicalBlock(LexicalBlockData {
            scope: None,
            file: Some(file),
            line: 2,
            column: 1,
        }),
        NodeData::LexicalBlockFile(LexicalBlockFileData {
            scope: None,
            file: Some(file),
            discriminator: 1,
        }),
        NodeData::LocalVariable(LocalVariableData {
            scope: None,
            name: "x".into(),
            file: Some(file),
            line: 2,
            ty: None,
            arg: 0,
            flags: DIFlags::empty(),
        }),
        NodeData::GlobalVariable(GlobalVariableData {
            scope: None,
            name: "g".into(),
            linkage_name: String::new(),
            file: Some(file),
            line: 1,
            ty: None,
            is_local: false,
            is_definition: true,
            constant: None,
            declaration: None,
        }),
        NodeData::Enumerator(EnumeratorData {
            name: "A".into(),
            value: -1,
        }),
        NodeData::Expression(vec![]),
        NodeData::Subrange(SubrangeData {
            lower_bound: 0,
            count: 4,
        }),
        NodeData::Location(LocationData {
            line: 1,
            column: 1,
            scope: file,
            inlined_at: None,
        }),
    ]
}

fn graph_of_each() -> (MetadataGraph, Vec<MetadataId>) {
    let mut graph = MetadataGraph::new();
    let ids = one_of_each()
        .into_iter()
        .map(|data| graph.push(data, Storage::Uniqued))
        .collect();
    (graph, ids)
}

fn round_trips<T: NodeRef>(graph: &MetadataGraph, id: MetadataId) -> bool {
    let handle = Some(ValueRef::Metadata(id));
    match unwrap_as::<T>(graph, handle) {
        Some(node) => node.id() == id && wrap(Some(node)) == handle,
        None => false,
    }
}

#[test]
fn every_kind_round_trips_through_its_own_ref() {
    let (graph, ids) = graph_of_each();
    for &id in &ids {
        let ok = match graph.kind(id).unwrap() {
            NodeKind::Tuple => round_trips::<DITuple>(&graph, id),
            NodeKind::File => round_trips::<DIFile>(&graph, id),
            NodeKind::CompileUnit => round_trips::<DICompileUnit>(&graph, id),
            NodeKind::BasicType => round_trips::<DIBasicType>(&graph, id),
            NodeKind::DerivedType => round_trips::<DIDerivedType>(&graph, id),
            NodeKind::CompositeType => round_trips::<DICompositeType>(&graph, id),
            NodeKind::SubroutineType => round_trips::<DISubroutineType>(&graph, id),
            NodeKind::Subprogram => round_trips::<DISubprogram>(&graph, id),
            NodeKind::LexicalBlock => round_trips::<DILexicalBlock>(&graph, id),
            NodeKind::LexicalBlockFile => round_trips::<DILexicalBlockFile>(&graph, id),
            NodeKind::LocalVariable => round_trips::<DILocalVariable>(&graph, id),
            NodeKind::GlobalVariable => round_trips::<DIGlobalVariable>(&graph, id),
            NodeKind::Enumerator => round_trips::<DIEnumerator>(&graph, id),
            NodeKind::Expression => round_trips::<DIExpression>(&graph, id),
            NodeKind::Subrange => round_trips::<DISubrange>(&graph, id),
            NodeKind::Location => round_trips::<DILocation>(&graph, id),
        };
        assert!(ok, "{id:?} did not round-trip");
    }
}

#[test]
fn null_stays_null() {
    let (graph, _) = graph_of_each();
    assert_eq!(wrap::<DIFile>(None), None);
    assert_eq!(unwrap_md(&graph, None), None);
    assert_eq!(unwrap_as::<DIScope>(&graph, None), None);
}

#[test]
fn wrong_kind_unwraps_to_null() {
    let (graph, ids) = graph_of_each();
    let file = Some(ValueRef::Metadata(ids[0]));
    assert_eq!(unwrap_as::<DICompositeType>(&graph, file), None);
    assert_eq!(unwrap_as::<DIType>(&graph, file), None);
    assert!(unwrap_as::<DIScope>(&graph, file).is_some());
}

#[test]
fn value_and_foreign_handles_unwrap_to_null() {
    let (graph, _) = graph_of_each();
    let value = Some(ValueRef::Value(ValueId::from_raw(0)));
    assert_eq!(unwrap_md(&graph, value), None);
    let foreign = Some(ValueRef::Metadata(MetadataId::from_raw(10_000)));
    assert_eq!(unwrap_md(&graph, foreign), None);
}

#[test]
fn categories_match_node_kinds() {
    let (graph, ids) = graph_of_each();
    for &id in &ids {
        let kind = graph.kind(id).unwrap();
        let handle = Some(ValueRef::Metadata(id));
        assert_eq!(unwrap_as::<DIScope>(&graph, handle).is_some(), kind.is_scope(), "{kind}");
        assert_eq!(unwrap_as::<DIType>(&graph, handle).is_some(), kind.is_type(), "{kind}");
    }
}

#[test]
fn upcasts_keep_identity() {
    let sp = DISubprogram::from_id_unchecked(MetadataId::from_raw(7));
    assert_eq!(DIScope::from(sp).id(), sp.id());
    assert_eq!(DINode::from(DIScope::from(sp)).id(), sp.id());
    let ty = DICompositeType::from_id_unchecked(MetadataId::from_raw(3));
    assert_eq!(DIType::from(ty).id(), MetadataId::from(ty));
}

#[test]
fn list_keeps_nulls_in_place() {
    let (graph, ids) = graph_of_each();
    let handles = [
        Some(ValueRef::Metadata(ids[3])),
        None,
        Some(ValueRef::Value(ValueId::from_raw(1))),
        Some(ValueRef::Metadata(ids[0])),
    ];
    let list = unwrap_list(&graph, &handles);
    assert_eq!(list.as_slice(), &[Some(ids[3]), None, None, Some(ids[0])]);
}

proptest! {
    #[test]
    fn any_in_graph_id_round_trips_as_a_node(raw in 0u32..16) {
        let (graph, _) = graph_of_each();
        let id = MetadataId::from_raw(raw);
        let handle = Some(ValueRef::Metadata(id));
        prop_assert_eq!(unwrap_md(&graph, handle), Some(id));
        let as_any = unwrap_as::<DINode>(&graph, handle);
        let kind = graph.kind(id).unwrap();
        prop_assert_eq!(as_any.is_some(), DINode::accepts(kind));
        if let Some(node) = as_any {
            prop_assert_eq!(wrap(Some(node)), handle);
        }
    }

    #[test]
    fn out_of_graph_ids_never_unwrap(raw in 16u32..u32::MAX) {
        let (graph, _) = graph_of_each();
        prop_assert_eq!(unwrap_md(&graph, Some(ValueRef::Metadata(MetadataId::from_raw(raw)))), None);
    }
}
