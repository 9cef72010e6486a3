use dig_ir::metadata::{CompileUnitData, FileData, SubprogramData};
use dig_ir::{DIFlags, EmissionKind, Module, NodeData};

use super::*;
use crate::handle::DIFile;

fn unit(factory: &NodeFactory<'_>) -> CompileUnitData {
    let file: DIFile = factory.unique(NodeData::File(FileData {
        filename: "a.c".into(),
        directory: "/src".into(),
    }));
    CompileUnitData {
        language: 12,
        file: file.id(),
        producer: "testcc 1.0".into(),
        is_optimized: false,
        flags: String::new(),
        runtime_version: 0,
        split_debug_filename: String::new(),
        emission_kind: EmissionKind::Full,
        dwo_id: 42,
        emit_debug_info: true,
        enum_types: None,
        retained_types: None,
        subprograms: None,
        global_variables: None,
    }
}

fn subprogram(template_params: Option<dig_ir::MetadataId>) -> SubprogramData {
    SubprogramData {
        scope: None,
        name: "foo".into(),
        linkage_name: String::new(),
        file: None,
        line: 1,
        ty: None,
        is_local: false,
        is_definition: true,
        scope_line: 1,
        flags: DIFlags::PROTOTYPED,
        is_optimized: false,
        function: None,
        template_params,
        declaration: None,
        variables: None,
    }
}

fn dwo_id_kept<R: Revision>() -> u64 {
    let module = Module::new("m");
    let factory = NodeFactory::new(&module);
    let cu = R::lower(R::create_compile_unit(&factory, unit(&factory))).unwrap();
    let graph = factory.graph();
    graph.compile_unit(cu.id()).unwrap().dwo_id
}

#[test]
fn only_the_descriptor_revision_drops_the_dwo_id() {
    assert_eq!(dwo_id_kept::<DescriptorApi>(), 0);
    assert_eq!(dwo_id_kept::<TypedApi>(), 42);
    assert_eq!(dwo_id_kept::<DetachedApi>(), 42);
}

fn recorded_function<R: Revision>() -> (Option<dig_ir::ValueId>, dig_ir::ValueId) {
    let module = Module::new("m");
    let f = module.add_function("foo");
    let factory = NodeFactory::new(&module);
    let sp = R::lower(R::create_function(&factory, subprogram(None), f)).unwrap();
    let graph = factory.graph();
    (graph.subprogram(sp.id()).unwrap().function, f)
}

#[test]
fn detached_subprograms_do_not_record_their_function() {
    let (recorded, f) = recorded_function::<DescriptorApi>();
    assert_eq!(recorded, Some(f));
    let (recorded, f) = recorded_function::<TypedApi>();
    assert_eq!(recorded, Some(f));
    let (recorded, _) = recorded_function::<DetachedApi>();
    assert_eq!(recorded, None);
}

#[test]
fn detached_revision_drops_template_params() {
    let module = Module::new("m");
    let f = module.add_function("foo");
    let factory = NodeFactory::new(&module);
    let params = factory.tuple(&[]);

    let typed = TypedApi::create_function(&factory, subprogram(Some(params.id())), f).unwrap();
    let detached = DetachedApi::create_function(&factory, subprogram(Some(params.id())), f).unwrap();

    let graph = factory.graph();
    assert_eq!(graph.subprogram(typed.id()).unwrap().template_params, Some(params.id()));
    assert_eq!(graph.subprogram(detached.id()).unwrap().template_params, None);
}

#[test]
fn subroutine_types_unique_across_file_arguments() {
    let module = Module::new("m");
    let factory = NodeFactory::new(&module);
    let file: DIFile = factory.unique(NodeData::File(FileData {
        filename: "a.c".into(),
        directory: String::new(),
    }));
    let types = factory.tuple(&[None]);

    let with_file = TypedApi::create_subroutine_type(&factory, Some(file), Some(types), DIFlags::empty());
    let without = DetachedApi::create_subroutine_type(&factory, None, Some(types), DIFlags::empty());
    assert_eq!(with_file, without);
}

#[test]
fn null_descriptors_wrap_to_null() {
    let null: Descriptor<DIFile> = Descriptor::null();
    assert!(!null.is_valid());
    assert_eq!(DescriptorApi::wrap(null), None);
    assert_eq!(format!("{null:?}"), "Descriptor(null)");

    let file = DIFile::from_id_unchecked(dig_ir::MetadataId::from_raw(1));
    let some = DescriptorApi::lift(Some(file));
    assert!(some.is_valid());
    assert_eq!(DescriptorApi::lower(some), Some(file));
}

#[test]
fn revisions_report_their_metadata_version() {
    assert_eq!(DescriptorApi::DEBUG_METADATA_VERSION, 2);
    assert_eq!(TypedApi::DEBUG_METADATA_VERSION, 3);
    assert_eq!(DetachedApi::DEBUG_METADATA_VERSION, 3);
}

#[cfg(not(any(feature = "api-descriptor", feature = "api-typed")))]
#[test]
fn detached_is_the_default_revision() {
    assert_eq!(ActiveRevision::NAME, "detached");
    assert_eq!(get_debug_metadata_version(), 3);
}
