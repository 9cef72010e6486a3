use super::*;
use crate::metadata::dwarf::DW_TAG_STRUCTURE_TYPE;
use crate::metadata::{
    CompositeTypeData, DIFlags, FileData, LexicalBlockData, LocalVariableData, Storage,
    SubprogramData,
};
use crate::{InsertPoint, IrBuilder};

fn push_subprogram(module: &Module, name: &str) -> MetadataId {
    module.metadata_mut().push(
        NodeData::Subprogram(SubprogramData {
            scope: None,
            name: name.into(),
            linkage_name: String::new(),
            file: None,
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
        Storage::Distinct,
    )
}

fn push_variable(module: &Module, scope: MetadataId) -> MetadataId {
    module.metadata_mut().push(
        NodeData::LocalVariable(LocalVariableData {
            scope: Some(scope),
            name: "x".into(),
            file: None,
            line: 2,
            ty: None,
            arg: 0,
            flags: DIFlags::empty(),
        }),
        Storage::Uniqued,
    )
}

#[test]
fn empty_module_verifies() {
    assert!(Module::new("m").verify().is_ok());
}

#[test]
fn located_instructions_in_own_subprogram_verify() {
    let module = Module::new("m");
    let f = module.add_function("foo");
    let sp = push_subprogram(&module, "foo");
    module.set_subprogram(f, sp).unwrap();
    let block = module.metadata_mut().push(
        NodeData::LexicalBlock(LexicalBlockData {
            scope: Some(sp),
            file: None,
            line: 2,
            column: 1,
        }),
        Storage::Distinct,
    );
    let bb = module.append_basic_block(f, "entry").unwrap();
    let irb = IrBuilder::new(&module);
    irb.position_at_end(bb);
    irb.set_current_debug_location(DebugLoc::new(2, 5, block));
    irb.build_alloca("x").unwrap();

    assert_eq!(module.verify(), Ok(()));
}

#[test]
fn location_in_foreign_subprogram_is_reported() {
    let module = Module::new("m");
    let f = module.add_function("foo");
    let sp = push_subprogram(&module, "foo");
    let other = push_subprogram(&module, "bar");
    module.set_subprogram(f, sp).unwrap();
    let bb = module.append_basic_block(f, "entry").unwrap();
    let irb = IrBuilder::new(&module);
    irb.position_at_end(bb);
    irb.set_current_debug_location(DebugLoc::new(1, 1, other));
    irb.build_return(None).unwrap();

    let err = module.verify().unwrap_err();
    assert_eq!(err.problems.len(), 1);
    assert!(err.problems[0].contains("not to the subprogram"));
}

#[test]
fn location_without_subprogram_is_reported() {
    let module = Module::new("m");
    let f = module.add_function("foo");
    let sp = push_subprogram(&module, "foo");
    let bb = module.append_basic_block(f, "entry").unwrap();
    module
        .insert_instruction(
            "x",
            Opcode::Alloca,
            Some(DebugLoc::new(1, 1, sp)),
            InsertPoint::AtEnd(bb),
        )
        .unwrap();

    let err = module.verify().unwrap_err();
    assert!(err.problems[0].contains("has no subprogram"));
}

#[test]
fn unresolved_composite_is_reported() {
    let module = Module::new("m");
    module.metadata_mut().push(
        NodeData::CompositeType(CompositeTypeData {
            tag: DW_TAG_STRUCTURE_TYPE,
            scope: None,
            name: "Node".into(),
            file: None,
            line: 1,
            size_bits: 0,
            align_bits: 0,
            flags: DIFlags::empty(),
            elements: None,
            base_type: None,
            vtable_holder: None,
            runtime_lang: 0,
            identifier: String::new(),
        }),
        Storage::Uniqued,
    );

    let err = module.verify().unwrap_err();
    assert!(err.to_string().contains("'Node'"));
}

#[test]
fn malformed_declare_operands_are_reported() {
    let module = Module::new("m");
    let f = module.add_function("foo");
    let sp = push_subprogram(&module, "foo");
    module.set_subprogram(f, sp).unwrap();
    let var = push_variable(&module, sp);
    let file = module.metadata_mut().push(
        NodeData::File(FileData {
            filename: "a.c".into(),
            directory: String::new(),
        }),
        Storage::Uniqued,
    );
    let bb = module.append_basic_block(f, "entry").unwrap();
    let slot = module
        .insert_instruction("x", Opcode::Alloca, None, InsertPoint::AtEnd(bb))
        .unwrap();
    module
        .insert_instruction(
            "",
            Opcode::DbgDeclare {
                storage: slot,
                variable: var,
                expression: file,
            },
            None,
            InsertPoint::AtEnd(bb),
        )
        .unwrap();

    let err = module.verify().unwrap_err();
    assert_eq!(err.problems.len(), 2);
    assert!(err.problems[0].contains("is not an expression"));
    assert!(err.problems[1].contains("no debug location"));
    assert_eq!(
        err.to_string(),
        format!("module verification failed: {}; {}", err.problems[0], err.problems[1])
    );
}

#[test]
fn dangling_operand_is_reported() {
    let module = Module::new("m");
    module
        .metadata_mut()
        .push(NodeData::Tuple(vec![Some(MetadataId::from_raw(42))]), Storage::Uniqued);
    let err = module.verify().unwrap_err();
    assert!(err.problems[0].contains("missing node !42"));
}
