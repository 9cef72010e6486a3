//! DWARF constants used by debug-info nodes.
//!
//! Only the values the builder and its callers need are listed. Tags,
//! encodings and languages are stored on nodes as raw `u32` so front ends can
//! pass values this table does not name.

// -- Tags --

pub const DW_TAG_ARRAY_TYPE: u32 = 0x01;
pub const DW_TAG_ENUMERATION_TYPE: u32 = 0x04;
pub const DW_TAG_MEMBER: u32 = 0x0d;
pub const DW_TAG_POINTER_TYPE: u32 = 0x0f;
pub const DW_TAG_REFERENCE_TYPE: u32 = 0x10;
pub const DW_TAG_COMPILE_UNIT: u32 = 0x11;
pub const DW_TAG_STRUCTURE_TYPE: u32 = 0x13;
pub const DW_TAG_SUBROUTINE_TYPE: u32 = 0x15;
pub const DW_TAG_TYPEDEF: u32 = 0x16;
pub const DW_TAG_UNION_TYPE: u32 = 0x17;
pub const DW_TAG_UNSPECIFIED_PARAMETERS: u32 = 0x18;
pub const DW_TAG_INHERITANCE: u32 = 0x1c;
pub const DW_TAG_BASE_TYPE: u32 = 0x24;
pub const DW_TAG_CONST_TYPE: u32 = 0x26;
pub const DW_TAG_ENUMERATOR: u32 = 0x28;
pub const DW_TAG_SUBPROGRAM: u32 = 0x2e;
pub const DW_TAG_VOLATILE_TYPE: u32 = 0x35;
pub const DW_TAG_RESTRICT_TYPE: u32 = 0x37;
pub const DW_TAG_UNSPECIFIED_TYPE: u32 = 0x3b;

// -- Base type encodings --

pub const DW_ATE_ADDRESS: u32 = 0x01;
pub const DW_ATE_BOOLEAN: u32 = 0x02;
pub const DW_ATE_FLOAT: u32 = 0x04;
pub const DW_ATE_SIGNED: u32 = 0x05;
pub const DW_ATE_SIGNED_CHAR: u32 = 0x06;
pub const DW_ATE_UNSIGNED: u32 = 0x07;
pub const DW_ATE_UNSIGNED_CHAR: u32 = 0x08;
pub const DW_ATE_UTF: u32 = 0x10;

// -- Source languages --

pub const DW_LANG_C89: u32 = 0x01;
pub const DW_LANG_C: u32 = 0x02;
pub const DW_LANG_C_PLUS_PLUS: u32 = 0x04;
pub const DW_LANG_C99: u32 = 0x0c;
pub const DW_LANG_D: u32 = 0x13;
pub const DW_LANG_RUST: u32 = 0x1c;

// -- Location expression opcodes --

pub const DW_OP_DEREF: u64 = 0x06;
pub const DW_OP_CONSTU: u64 = 0x10;
pub const DW_OP_MINUS: u64 = 0x1c;
pub const DW_OP_PLUS: u64 = 0x22;
pub const DW_OP_PLUS_UCONST: u64 = 0x23;
pub const DW_OP_STACK_VALUE: u64 = 0x9f;
/// Marks a piece of a larger variable: `DW_OP_bit_piece offset size`.
pub const DW_OP_BIT_PIECE: u64 = 0x9d;

/// Whether `tag` names a qualifier that wraps another type.
pub fn is_qualifier_tag(tag: u32) -> bool {
    matches!(
        tag,
        DW_TAG_CONST_TYPE | DW_TAG_VOLATILE_TYPE | DW_TAG_RESTRICT_TYPE
    )
}

/// Human-readable tag name for dumps and diagnostics.
pub fn tag_name(tag: u32) -> &'static str {
    match tag {
        DW_TAG_ARRAY_TYPE => "DW_TAG_array_type",
        DW_TAG_ENUMERATION_TYPE => "DW_TAG_enumeration_type",
        DW_TAG_MEMBER => "DW_TAG_member",
        DW_TAG_POINTER_TYPE => "DW_TAG_pointer_type",
        DW_TAG_REFERENCE_TYPE => "DW_TAG_reference_type",
        DW_TAG_COMPILE_UNIT => "DW_TAG_compile_unit",
        DW_TAG_STRUCTURE_TYPE => "DW_TAG_structure_type",
        DW_TAG_SUBROUTINE_TYPE => "DW_TAG_subroutine_type",
        DW_TAG_TYPEDEF => "DW_TAG_typedef",
        DW_TAG_UNION_TYPE => "DW_TAG_union_type",
        DW_TAG_UNSPECIFIED_PARAMETERS => "DW_TAG_unspecified_parameters",
        DW_TAG_INHERITANCE => "DW_TAG_inheritance",
        DW_TAG_BASE_TYPE => "DW_TAG_base_type",
        DW_TAG_CONST_TYPE => "DW_TAG_const_type",
        DW_TAG_ENUMERATOR => "DW_TAG_enumerator",
        DW_TAG_SUBPROGRAM => "DW_TAG_subprogram",
        DW_TAG_VOLATILE_TYPE => "DW_TAG_volatile_type",
        DW_TAG_RESTRICT_TYPE => "DW_TAG_restrict_type",
        DW_TAG_UNSPECIFIED_TYPE => "DW_TAG_unspecified_type",
        _ => "DW_TAG_<unknown>",
    }
}
