//! Argument bundles for the wide creation operations.
//!
//! Names are `&str` slices; an empty slice means anonymous or absent.
//! Handles are `Option<ValueRef>`, with `None` as the null handle.

use dig_ir::{DIFlags, ValueRef};

/// Arguments of [`DIBuilder::create_compile_unit`](crate::DIBuilder::create_compile_unit).
#[derive(Debug, Clone)]
pub struct CompileUnitParams<'a> {
    /// Source language (`DW_LANG_*`).
    pub language: u32,
    pub filename: &'a str,
    pub directory: &'a str,
    pub producer: &'a str,
    pub is_optimized: bool,
    /// Command-line flags of the compiler invocation.
    pub flags: &'a str,
    pub runtime_version: u32,
    pub split_name: &'a str,
    /// Raw emission kind: `1` full, `2` line tables only.
    pub emission_kind: u32,
    /// Split-unit id; dropped by revisions that have none.
    pub dwo_id: u64,
    pub emit_debug_info: bool,
}

impl<'a> CompileUnitParams<'a> {
    /// Full, unoptimized compile unit with no flags or split unit.
    pub fn new(language: u32, filename: &'a str, directory: &'a str, producer: &'a str) -> Self {
        Self {
            language,
            filename,
            directory,
            producer,
            is_optimized: false,
            flags: "",
            runtime_version: 0,
            split_name: "",
            emission_kind: 1,
            dwo_id: 0,
            emit_debug_info: true,
        }
    }

    #[must_use]
    pub fn with_emission_kind(mut self, code: u32) -> Self {
        self.emission_kind = code;
        self
    }

    #[must_use]
    pub fn with_optimized(mut self, optimized: bool) -> Self {
        self.is_optimized = optimized;
        self
    }

    #[must_use]
    pub fn with_dwo_id(mut self, dwo_id: u64) -> Self {
        self.dwo_id = dwo_id;
        self
    }
}

/// Arguments of [`DIBuilder::create_member_type`](crate::DIBuilder::create_member_type).
#[derive(Debug, Clone)]
pub struct MemberTypeParams<'a> {
    /// Owning composite type.
    pub scope: Option<ValueRef>,
    pub name: &'a str,
    pub file: Option<ValueRef>,
    pub line: u32,
    pub size_bits: u64,
    pub align_bits: u64,
    pub offset_bits: u64,
    pub flags: DIFlags,
    /// Type of the member.
    pub ty: Option<ValueRef>,
}

/// Arguments of [`DIBuilder::create_struct_type`](crate::DIBuilder::create_struct_type).
///
/// An empty `elements` list creates a forward declaration to be completed
/// with `set_struct_body`.
#[derive(Debug, Clone)]
pub struct StructTypeParams<'a> {
    pub scope: Option<ValueRef>,
    pub name: &'a str,
    pub file: Option<ValueRef>,
    pub line: u32,
    pub size_bits: u64,
    pub align_bits: u64,
    pub flags: DIFlags,
    /// Base class.
    pub derived_from: Option<ValueRef>,
    pub elements: &'a [Option<ValueRef>],
    pub runtime_lang: u32,
    pub vtable_holder: Option<ValueRef>,
    /// Cross-module identity; a non-empty id makes the type distinct.
    pub unique_id: &'a str,
}

impl<'a> StructTypeParams<'a> {
    /// Struct with no scope, file, flags, base class or identifier.
    pub fn new(name: &'a str, size_bits: u64, align_bits: u64, elements: &'a [Option<ValueRef>]) -> Self {
        Self {
            scope: None,
            name,
            file: None,
            line: 0,
            size_bits,
            align_bits,
            flags: DIFlags::empty(),
            derived_from: None,
            elements,
            runtime_lang: 0,
            vtable_holder: None,
            unique_id: "",
        }
    }
}

/// Arguments of [`DIBuilder::create_union_type`](crate::DIBuilder::create_union_type).
#[derive(Debug, Clone)]
pub struct UnionTypeParams<'a> {
    pub scope: Option<ValueRef>,
    pub name: &'a str,
    pub file: Option<ValueRef>,
    pub line: u32,
    pub size_bits: u64,
    pub align_bits: u64,
    pub flags: DIFlags,
    pub elements: &'a [Option<ValueRef>],
    pub runtime_lang: u32,
    pub unique_id: &'a str,
}

impl<'a> UnionTypeParams<'a> {
    pub fn new(name: &'a str, size_bits: u64, align_bits: u64, elements: &'a [Option<ValueRef>]) -> Self {
        Self {
            scope: None,
            name,
            file: None,
            line: 0,
            size_bits,
            align_bits,
            flags: DIFlags::empty(),
            elements,
            runtime_lang: 0,
            unique_id: "",
        }
    }
}

/// Arguments of [`DIBuilder::create_enumeration_type`](crate::DIBuilder::create_enumeration_type).
#[derive(Debug, Clone)]
pub struct EnumerationTypeParams<'a> {
    pub scope: Option<ValueRef>,
    pub name: &'a str,
    pub file: Option<ValueRef>,
    pub line: u32,
    pub size_bits: u64,
    pub align_bits: u64,
    /// Enumerator handles.
    pub elements: &'a [Option<ValueRef>],
    pub underlying_type: Option<ValueRef>,
    pub unique_id: &'a str,
}

/// Arguments of [`DIBuilder::create_function`](crate::DIBuilder::create_function).
#[derive(Debug, Clone)]
pub struct FunctionParams<'a> {
    pub scope: Option<ValueRef>,
    pub name: &'a str,
    /// Mangled name; empty when equal to `name`.
    pub linkage_name: &'a str,
    pub file: Option<ValueRef>,
    pub line: u32,
    /// Subroutine type.
    pub ty: Option<ValueRef>,
    pub is_local: bool,
    pub is_definition: bool,
    /// First line of the body.
    pub scope_line: u32,
    pub flags: DIFlags,
    pub is_optimized: bool,
    /// The IR function the subprogram describes.
    pub function: Option<ValueRef>,
    /// Tuple of template parameters.
    pub template_params: Option<ValueRef>,
    /// Subprogram declaration this definition completes.
    pub declaration: Option<ValueRef>,
}

impl<'a> FunctionParams<'a> {
    /// External definition whose body starts on its declaration line.
    pub fn new(
        scope: Option<ValueRef>,
        name: &'a str,
        file: Option<ValueRef>,
        line: u32,
        ty: Option<ValueRef>,
        function: Option<ValueRef>,
    ) -> Self {
        Self {
            scope,
            name,
            linkage_name: "",
            file,
            line,
            ty,
            is_local: false,
            is_definition: true,
            scope_line: line,
            flags: DIFlags::PROTOTYPED,
            is_optimized: false,
            function,
            template_params: None,
            declaration: None,
        }
    }
}

/// Arguments of [`DIBuilder::create_global_variable`](crate::DIBuilder::create_global_variable).
#[derive(Debug, Clone)]
pub struct GlobalVariableParams<'a> {
    pub scope: Option<ValueRef>,
    pub name: &'a str,
    pub linkage_name: &'a str,
    pub file: Option<ValueRef>,
    pub line: u32,
    pub ty: Option<ValueRef>,
    pub is_local: bool,
    pub is_definition: bool,
    /// Constant (or global) IR value holding the variable.
    pub value: Option<ValueRef>,
    /// Static member declaration this definition completes.
    pub declaration: Option<ValueRef>,
}

impl<'a> GlobalVariableParams<'a> {
    pub fn new(
        scope: Option<ValueRef>,
        name: &'a str,
        file: Option<ValueRef>,
        line: u32,
        ty: Option<ValueRef>,
    ) -> Self {
        Self {
            scope,
            name,
            linkage_name: "",
            file,
            line,
            ty,
            is_local: false,
            is_definition: true,
            value: None,
            declaration: None,
        }
    }
}
