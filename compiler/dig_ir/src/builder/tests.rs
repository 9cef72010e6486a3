use pretty_assertions::assert_eq;

use super::*;
use crate::metadata::MetadataId;

fn setup(module: &Module) -> (ValueId, BlockId) {
    let f = module.add_function("foo");
    let bb = module.append_basic_block(f, "entry").unwrap();
    (f, bb)
}

#[test]
fn unpositioned_builder_fails() {
    let module = Module::new("m");
    let irb = IrBuilder::new(&module);
    assert_eq!(irb.build_alloca("x"), Err(IrError::NoInsertPoint));
}

#[test]
fn instructions_carry_current_location() {
    let module = Module::new("m");
    let (_, bb) = setup(&module);
    let irb = IrBuilder::new(&module);
    irb.position_at_end(bb);

    let loc = DebugLoc::new(7, 3, MetadataId::from_raw(0));
    irb.set_current_debug_location(loc);
    let slot = irb.build_alloca("x").unwrap();
    irb.unset_current_debug_location();
    let ret = irb.build_return(None).unwrap();

    assert_eq!(module.instruction(slot).unwrap().debug_loc, Some(loc));
    assert_eq!(module.instruction(ret).unwrap().debug_loc, None);
    assert_eq!(irb.current_debug_location(), None);
}

#[test]
fn position_before_inserts_ahead_of_anchor() {
    let module = Module::new("m");
    let (f, bb) = setup(&module);
    let irb = IrBuilder::new(&module);
    irb.position_at_end(bb);
    let slot = irb.build_alloca("x").unwrap();
    let ret = irb.build_return(None).unwrap();

    irb.position_before(ret);
    let one = module.const_int(32, 1);
    let store = irb.build_store(one, slot).unwrap();
    let call = irb.build_call(f, &[one], "r").unwrap();

    assert_eq!(module.block_instructions(bb), vec![slot, store, call, ret]);
    assert_eq!(
        module.instruction(call).unwrap().opcode,
        Opcode::Call {
            callee: f,
            args: vec![one],
        }
    );
}

#[test]
fn load_reads_from_pointer() {
    let module = Module::new("m");
    let (_, bb) = setup(&module);
    let irb = IrBuilder::new(&module);
    irb.position_at_end(bb);
    let slot = irb.build_alloca("x").unwrap();
    let val = irb.build_load(slot, "v").unwrap();
    assert_eq!(module.instruction(val).unwrap().opcode, Opcode::Load { ptr: slot });
    assert_eq!(irb.insert_point(), Some(InsertPoint::AtEnd(bb)));
}
