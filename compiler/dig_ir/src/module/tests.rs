use pretty_assertions::assert_eq;

use super::*;
use crate::metadata::{FileData, NodeData, Storage};

#[test]
fn values_report_their_kind() {
    let module = Module::new("m");
    let f = module.add_function("main");
    let g = module.add_global("counter");
    let c = module.const_int(32, -4);

    assert_eq!(module.name(), "m");
    assert_eq!(module.value_kind(f), Some(ValueKind::Function));
    assert_eq!(module.value_kind(g), Some(ValueKind::GlobalVariable));
    assert_eq!(module.value_kind(c), Some(ValueKind::Constant));
    assert_eq!(module.value_kind(ValueId::from_raw(40)), None);
    assert_eq!(module.value_name(g).as_deref(), Some("counter"));
    assert_eq!(module.const_int_value(c), Some((32, -4)));
    assert_eq!(module.functions(), vec![f]);
}

#[test]
fn subprogram_attachment_requires_function() {
    let module = Module::new("m");
    let f = module.add_function("foo");
    let g = module.add_global("g");
    let sp = module.metadata_mut().push(
        NodeData::File(FileData {
            filename: "a.c".into(),
            directory: String::new(),
        }),
        Storage::Uniqued,
    );

    assert_eq!(module.subprogram(f), None);
    module.set_subprogram(f, sp).unwrap();
    assert_eq!(module.subprogram(f), Some(sp));
    assert_eq!(module.set_subprogram(g, sp), Err(IrError::NotAFunction(g)));
    assert_eq!(
        module.set_subprogram(ValueId::from_raw(9), sp),
        Err(IrError::UnknownValue(ValueId::from_raw(9)))
    );
}

#[test]
fn blocks_belong_to_their_function() {
    let module = Module::new("m");
    let f = module.add_function("foo");
    let entry = module.append_basic_block(f, "entry").unwrap();
    let exit = module.append_basic_block(f, "exit").unwrap();

    assert_eq!(module.function_blocks(f), vec![entry, exit]);
    assert_eq!(module.block_parent(exit), Some(f));
    assert_eq!(module.block_name(entry).as_deref(), Some("entry"));

    let g = module.add_global("g");
    assert_eq!(
        module.append_basic_block(g, "bad"),
        Err(IrError::NotAFunction(g))
    );
}

#[test]
fn insert_before_keeps_anchor_order() {
    let module = Module::new("m");
    let f = module.add_function("foo");
    let bb = module.append_basic_block(f, "entry").unwrap();
    let a = module
        .insert_instruction("a", Opcode::Alloca, None, InsertPoint::AtEnd(bb))
        .unwrap();
    let ret = module
        .insert_instruction("", Opcode::Ret(None), None, InsertPoint::AtEnd(bb))
        .unwrap();
    let b = module
        .insert_instruction("b", Opcode::Alloca, None, InsertPoint::Before(ret))
        .unwrap();

    assert_eq!(module.block_instructions(bb), vec![a, b, ret]);
    assert_eq!(module.instruction(b).and_then(|i| i.block), Some(bb));
}

#[test]
fn insert_before_rejects_non_instructions() {
    let module = Module::new("m");
    let f = module.add_function("foo");
    assert_eq!(
        module.insert_instruction("x", Opcode::Alloca, None, InsertPoint::Before(f)),
        Err(IrError::NotAnInstruction(f))
    );
    assert_eq!(
        module.insert_instruction(
            "x",
            Opcode::Alloca,
            None,
            InsertPoint::AtEnd(BlockId::from_raw(3))
        ),
        Err(IrError::UnknownBlock(BlockId::from_raw(3)))
    );
}

#[test]
fn flags_replace_by_key() {
    let module = Module::new("m");
    module.add_flag(FlagBehavior::Warning, "Dwarf Version", 4);
    module.add_flag(FlagBehavior::Warning, "Debug Info Version", 3);
    module.add_flag(FlagBehavior::Override, "Dwarf Version", 5);

    assert_eq!(module.flag("Dwarf Version"), Some(5));
    assert_eq!(module.flag("CodeView"), None);
    assert_eq!(module.flags().len(), 2);
    assert_eq!(module.flags()[0].behavior, FlagBehavior::Override);
}

#[test]
fn named_metadata_appends() {
    let module = Module::new("m");
    assert!(module.named_metadata("llvm.dbg.cu").is_empty());
    let id = module
        .metadata_mut()
        .push(NodeData::Expression(vec![]), Storage::Uniqued);
    module.add_named_metadata_operand("llvm.dbg.cu", id);
    assert_eq!(module.named_metadata("llvm.dbg.cu"), vec![id]);
}
