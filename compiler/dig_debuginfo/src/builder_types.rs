//! `DIBuilder` methods for the compile unit, files, types and arrays.

use dig_ir::metadata::dwarf::{
    DW_TAG_ARRAY_TYPE, DW_TAG_BASE_TYPE, DW_TAG_ENUMERATION_TYPE, DW_TAG_MEMBER,
    DW_TAG_POINTER_TYPE, DW_TAG_STRUCTURE_TYPE, DW_TAG_TYPEDEF, DW_TAG_UNION_TYPE,
    DW_TAG_UNSPECIFIED_TYPE,
};
use dig_ir::metadata::{
    BasicTypeData, CompileUnitData, CompositeTypeData, DerivedTypeData, EnumeratorData, FileData,
    SubrangeData,
};
use dig_ir::{DIFlags, EmissionKind, NodeData, ValueRef};
use smallvec::SmallVec;

use crate::builder::DIBuilder;
use crate::compat::Revision;
use crate::config::DebugInfoError;
use crate::handle::{
    DIBasicType, DICompositeType, DIDerivedType, DIEnumerator, DIFile, DIScope, DISubrange,
    DIType, NodeRef,
};
use crate::params::{
    CompileUnitParams, EnumerationTypeParams, MemberTypeParams, StructTypeParams, UnionTypeParams,
};

impl<R: Revision> DIBuilder<'_, R> {
    // -- Compile unit and files --

    /// Create the builder's compile unit and register it in `llvm.dbg.cu`.
    ///
    /// # Errors
    ///
    /// `InvalidEmissionKind` for a code other than 1 or 2, and
    /// `CompileUnitExists` if this builder already made one.
    pub fn create_compile_unit(
        &self,
        params: CompileUnitParams<'_>,
    ) -> Result<Option<ValueRef>, DebugInfoError> {
        self.note_use("create_compile_unit");
        let emission_kind = EmissionKind::try_from(params.emission_kind)
            .map_err(DebugInfoError::InvalidEmissionKind)?;
        if self.compile_unit.get().is_some() {
            return Err(DebugInfoError::CompileUnitExists);
        }

        let file: DIFile = self.factory.unique(NodeData::File(FileData {
            filename: params.filename.to_string(),
            directory: params.directory.to_string(),
        }));
        let handle = R::create_compile_unit(
            &self.factory,
            CompileUnitData {
                language: params.language,
                file: file.id(),
                producer: params.producer.to_string(),
                is_optimized: params.is_optimized,
                flags: params.flags.to_string(),
                runtime_version: params.runtime_version,
                split_debug_filename: params.split_name.to_string(),
                emission_kind,
                dwo_id: params.dwo_id,
                emit_debug_info: params.emit_debug_info,
                enum_types: None,
                retained_types: None,
                subprograms: None,
                global_variables: None,
            },
        );

        let cu = R::lower(handle);
        self.compile_unit.set(cu);
        if let Some(cu) = cu {
            self.module.add_named_metadata_operand("llvm.dbg.cu", cu.id());
            tracing::debug!(?cu, file = params.filename, "compile unit created");
        }
        Ok(R::wrap(handle))
    }

    pub fn create_file(&self, filename: &str, directory: &str) -> Option<ValueRef> {
        self.note_use("create_file");
        let file: DIFile = self.factory.unique(NodeData::File(FileData {
            filename: filename.to_string(),
            directory: directory.to_string(),
        }));
        self.out(file)
    }

    // -- Basic and derived types --

    /// A type with a name and nothing else, such as `decltype(nullptr)`.
    pub fn create_unspecified_type(&self, name: &str) -> Option<ValueRef> {
        self.note_use("create_unspecified_type");
        let ty: DIBasicType = self.factory.unique(NodeData::BasicType(BasicTypeData {
            tag: DW_TAG_UNSPECIFIED_TYPE,
            name: name.to_string(),
            size_bits: 0,
            align_bits: 0,
            encoding: 0,
        }));
        self.out(ty)
    }

    /// A base type; `encoding` is a `DW_ATE_*` value.
    pub fn create_basic_type(
        &self,
        name: &str,
        size_bits: u64,
        align_bits: u64,
        encoding: u32,
    ) -> Option<ValueRef> {
        self.note_use("create_basic_type");
        let ty: DIBasicType = self.factory.unique(NodeData::BasicType(BasicTypeData {
            tag: DW_TAG_BASE_TYPE,
            name: name.to_string(),
            size_bits,
            align_bits,
            encoding,
        }));
        self.out(ty)
    }

    /// Wrap `from_ty` in a qualifier (`DW_TAG_const_type`, ...).
    pub fn create_qualified_type(&self, tag: u32, from_ty: Option<ValueRef>) -> Option<ValueRef> {
        self.note_use("create_qualified_type");
        let base = self.md::<DIType>(from_ty);
        let ty = self.derived(DerivedTypeData {
            tag,
            scope: None,
            name: String::new(),
            file: None,
            line: 0,
            base_type: base.map(NodeRef::id),
            size_bits: 0,
            align_bits: 0,
            offset_bits: 0,
            flags: DIFlags::empty(),
        });
        self.out(ty)
    }

    pub fn create_pointer_type(
        &self,
        pointee: Option<ValueRef>,
        size_bits: u64,
        align_bits: u64,
        name: &str,
    ) -> Option<ValueRef> {
        self.note_use("create_pointer_type");
        let base = self.md::<DIType>(pointee);
        let ty = self.derived(DerivedTypeData {
            tag: DW_TAG_POINTER_TYPE,
            scope: None,
            name: name.to_string(),
            file: None,
            line: 0,
            base_type: base.map(NodeRef::id),
            size_bits,
            align_bits,
            offset_bits: 0,
            flags: DIFlags::empty(),
        });
        self.out(ty)
    }

    pub fn create_typedef(
        &self,
        ty: Option<ValueRef>,
        name: &str,
        file: Option<ValueRef>,
        line: u32,
        scope: Option<ValueRef>,
    ) -> Option<ValueRef> {
        self.note_use("create_typedef");
        let base = self.md::<DIType>(ty);
        let file = self.md::<DIFile>(file);
        let scope = self.md::<DIScope>(scope);
        let typedef = self.derived(DerivedTypeData {
            tag: DW_TAG_TYPEDEF,
            scope: scope.map(NodeRef::id),
            name: name.to_string(),
            file: file.map(NodeRef::id),
            line,
            base_type: base.map(NodeRef::id),
            size_bits: 0,
            align_bits: 0,
            offset_bits: 0,
            flags: DIFlags::empty(),
        });
        self.out(typedef)
    }

    /// A data member, owned by the composite type in `params.scope`.
    pub fn create_member_type(&self, params: MemberTypeParams<'_>) -> Option<ValueRef> {
        self.note_use("create_member_type");
        let scope = self.md::<DIScope>(params.scope);
        let file = self.md::<DIFile>(params.file);
        let base = self.md::<DIType>(params.ty);
        let member = self.derived(DerivedTypeData {
            tag: DW_TAG_MEMBER,
            scope: scope.map(NodeRef::id),
            name: params.name.to_string(),
            file: file.map(NodeRef::id),
            line: params.line,
            base_type: base.map(NodeRef::id),
            size_bits: params.size_bits,
            align_bits: params.align_bits,
            offset_bits: params.offset_bits,
            flags: params.flags,
        });
        self.out(member)
    }

    fn derived(&self, data: DerivedTypeData) -> DIDerivedType {
        self.factory.unique(NodeData::DerivedType(data))
    }

    // -- Composite types --

    /// Create a struct type.
    ///
    /// With no elements the struct is a forward declaration: it can be
    /// referenced right away and is completed by
    /// [`set_struct_body`](Self::set_struct_body). A genuinely empty struct
    /// is completed with `set_struct_body(ty, &[])`; left unpatched it is
    /// emitted as a declaration with `FWD_DECL`.
    pub fn create_struct_type(&self, params: StructTypeParams<'_>) -> Option<ValueRef> {
        self.note_use("create_struct_type");
        let data = CompositeTypeData {
            tag: DW_TAG_STRUCTURE_TYPE,
            scope: self.md::<DIScope>(params.scope).map(NodeRef::id),
            name: params.name.to_string(),
            file: self.md::<DIFile>(params.file).map(NodeRef::id),
            line: params.line,
            size_bits: params.size_bits,
            align_bits: params.align_bits,
            flags: params.flags,
            elements: None,
            base_type: self.md::<DIType>(params.derived_from).map(NodeRef::id),
            vtable_holder: self.md::<DIType>(params.vtable_holder).map(NodeRef::id),
            runtime_lang: params.runtime_lang,
            identifier: params.unique_id.to_string(),
        };
        let ty = self.record_type(data, params.elements);
        self.out(ty)
    }

    /// Create a union type; forward-declared when `elements` is empty.
    ///
    /// As with structs, an empty union needs `set_union_body(ty, &[])`.
    pub fn create_union_type(&self, params: UnionTypeParams<'_>) -> Option<ValueRef> {
        self.note_use("create_union_type");
        let data = CompositeTypeData {
            tag: DW_TAG_UNION_TYPE,
            scope: self.md::<DIScope>(params.scope).map(NodeRef::id),
            name: params.name.to_string(),
            file: self.md::<DIFile>(params.file).map(NodeRef::id),
            line: params.line,
            size_bits: params.size_bits,
            align_bits: params.align_bits,
            flags: params.flags,
            elements: None,
            base_type: None,
            vtable_holder: None,
            runtime_lang: params.runtime_lang,
            identifier: params.unique_id.to_string(),
        };
        let ty = self.record_type(data, params.elements);
        self.out(ty)
    }

    /// Struct or union: empty element lists stay unresolved until patched.
    fn record_type(&self, mut data: CompositeTypeData, elements: &[Option<ValueRef>]) -> DICompositeType {
        let forward = elements.is_empty();
        if !forward {
            data.elements = Some(self.array(elements).id());
        }
        let ty = self.composite(data);
        if forward {
            self.tracked.borrow_mut().track_forward_decl(ty);
        }
        ty
    }

    /// Identifier-bearing composites are distinct; the rest are uniqued.
    fn composite(&self, data: CompositeTypeData) -> DICompositeType {
        if data.identifier.is_empty() {
            self.factory.unique(NodeData::CompositeType(data))
        } else {
            self.factory.distinct(NodeData::CompositeType(data))
        }
    }

    /// An array of `elem_ty`; `subscripts` are subrange handles, one per
    /// dimension.
    pub fn create_array_type(
        &self,
        size_bits: u64,
        align_bits: u64,
        elem_ty: Option<ValueRef>,
        subscripts: &[Option<ValueRef>],
    ) -> Option<ValueRef> {
        self.note_use("create_array_type");
        let ty = self.array_like(size_bits, align_bits, elem_ty, subscripts, DIFlags::empty());
        self.out(ty)
    }

    /// Like [`create_array_type`](Self::create_array_type), flagged as a
    /// vector.
    pub fn create_vector_type(
        &self,
        size_bits: u64,
        align_bits: u64,
        elem_ty: Option<ValueRef>,
        subscripts: &[Option<ValueRef>],
    ) -> Option<ValueRef> {
        self.note_use("create_vector_type");
        let ty = self.array_like(size_bits, align_bits, elem_ty, subscripts, DIFlags::VECTOR);
        self.out(ty)
    }

    fn array_like(
        &self,
        size_bits: u64,
        align_bits: u64,
        elem_ty: Option<ValueRef>,
        subscripts: &[Option<ValueRef>],
        flags: DIFlags,
    ) -> DICompositeType {
        let base = self.md::<DIType>(elem_ty);
        let subscripts = self.array(subscripts);
        self.composite(CompositeTypeData {
            tag: DW_TAG_ARRAY_TYPE,
            scope: None,
            name: String::new(),
            file: None,
            line: 0,
            size_bits,
            align_bits,
            flags,
            elements: Some(subscripts.id()),
            base_type: base.map(NodeRef::id),
            vtable_holder: None,
            runtime_lang: 0,
            identifier: String::new(),
        })
    }

    pub fn create_enumerator(&self, name: &str, value: i64) -> Option<ValueRef> {
        self.note_use("create_enumerator");
        let e: DIEnumerator = self.factory.unique(NodeData::Enumerator(EnumeratorData {
            name: name.to_string(),
            value,
        }));
        self.out(e)
    }

    /// An enumeration; listed in the compile unit's enum types at finalize.
    pub fn create_enumeration_type(&self, params: EnumerationTypeParams<'_>) -> Option<ValueRef> {
        self.note_use("create_enumeration_type");
        let elements = self.array(params.elements);
        let ty = self.composite(CompositeTypeData {
            tag: DW_TAG_ENUMERATION_TYPE,
            scope: self.md::<DIScope>(params.scope).map(NodeRef::id),
            name: params.name.to_string(),
            file: self.md::<DIFile>(params.file).map(NodeRef::id),
            line: params.line,
            size_bits: params.size_bits,
            align_bits: params.align_bits,
            flags: DIFlags::empty(),
            elements: Some(elements.id()),
            base_type: self.md::<DIType>(params.underlying_type).map(NodeRef::id),
            vtable_holder: None,
            runtime_lang: 0,
            identifier: params.unique_id.to_string(),
        });
        self.tracked.borrow_mut().track_enum(ty);
        self.out(ty)
    }

    // -- Subroutine types --

    /// A function type. Index 0 of `parameter_types` is the return type
    /// (null for `void`); a null entry after it marks varargs.
    pub fn create_subroutine_type(
        &self,
        file: Option<ValueRef>,
        parameter_types: &[Option<ValueRef>],
        flags: DIFlags,
    ) -> Option<ValueRef> {
        self.note_use("create_subroutine_type");
        let file = self.md::<DIFile>(file);
        let types = self.type_array(parameter_types);
        let handle = R::create_subroutine_type(&self.factory, R::lift(file), R::lift(Some(types)), flags);
        R::wrap(handle)
    }

    /// The null handle. In a parameter list it marks an unspecified
    /// (variadic) parameter.
    #[inline]
    pub fn create_unspecified_parameter(&self) -> Option<ValueRef> {
        None
    }

    /// Keep `ty` in the compile unit even if nothing references it.
    pub fn retain_type(&self, ty: Option<ValueRef>) {
        self.note_use("retain_type");
        if let Some(ty) = self.md::<DIType>(ty) {
            self.tracked.borrow_mut().track_retained(ty);
        }
    }

    // -- Arrays and ranges --

    /// A subrange `[lower_bound, lower_bound + count)`; `count` of -1 means
    /// unknown.
    pub fn get_or_create_range(&self, lower_bound: i64, count: i64) -> Option<ValueRef> {
        self.note_use("get_or_create_range");
        let range: DISubrange = self.factory.unique(NodeData::Subrange(SubrangeData { lower_bound, count }));
        self.out(range)
    }

    /// A uniqued tuple of arbitrary nodes; null entries are kept.
    pub fn get_or_create_array(&self, elements: &[Option<ValueRef>]) -> Option<ValueRef> {
        self.note_use("get_or_create_array");
        let tuple = self.array(elements);
        self.out(tuple)
    }

    /// A uniqued tuple of types; entries that are not types become null.
    pub fn get_or_create_type_array(&self, elements: &[Option<ValueRef>]) -> Option<ValueRef> {
        self.note_use("get_or_create_type_array");
        let tuple = self.type_array(elements);
        self.out(tuple)
    }

    fn type_array(&self, elements: &[Option<ValueRef>]) -> crate::handle::DITuple {
        let types: SmallVec<[_; 8]> = elements
            .iter()
            .map(|&h| self.md::<DIType>(h).map(NodeRef::id))
            .collect();
        self.factory.tuple(&types)
    }
}
