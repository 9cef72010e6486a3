//! Debug-info metadata store.
//!
//! Every debug-info node lives in a flat arena owned by the module and is
//! referenced by a [`MetadataId`]. Node identity is the index, so a node
//! whose operands are rewritten in place keeps every existing reference to
//! it valid. This is what makes self-referential types representable.
//!
//! # Uniqued vs. distinct
//!
//! Each node records a [`Storage`]. Uniqued nodes are expected to be unique
//! by content within whatever table created them; distinct nodes never take
//! part in content lookup. The store itself does no lookup.

pub mod dwarf;
mod flags;

use std::fmt;

pub use flags::DIFlags;

use crate::value::ValueId;

/// A 32-bit index into the metadata arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MetadataId(u32);

impl MetadataId {
    /// Create an id from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for MetadataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.0)
    }
}

/// How a node takes part in uniquing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Storage {
    Uniqued,
    Distinct,
}

/// Emission kind of a compile unit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EmissionKind {
    /// Types, variables, scopes and line tables.
    Full,
    /// Line tables only.
    LineTablesOnly,
}

impl EmissionKind {
    /// Decode the raw code front ends pass (`1` = full, `2` = line tables).
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Full),
            2 => Some(Self::LineTablesOnly),
            _ => None,
        }
    }

    /// Raw code of this kind.
    pub const fn code(self) -> u32 {
        match self {
            Self::Full => 1,
            Self::LineTablesOnly => 2,
        }
    }
}

impl TryFrom<u32> for EmissionKind {
    /// The rejected code.
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, u32> {
        Self::from_code(code).ok_or(code)
    }
}

/// Kind tag of a node, without its payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Tuple,
    File,
    CompileUnit,
    BasicType,
    DerivedType,
    CompositeType,
    SubroutineType,
    Subprogram,
    LexicalBlock,
    LexicalBlockFile,
    LocalVariable,
    GlobalVariable,
    Enumerator,
    Expression,
    Subrange,
    Location,
}

impl NodeKind {
    /// Kinds that can enclose other declarations.
    ///
    /// Types count as scopes so members can be parented to their composite.
    pub const fn is_scope(self) -> bool {
        matches!(
            self,
            Self::File
                | Self::CompileUnit
                | Self::Subprogram
                | Self::LexicalBlock
                | Self::LexicalBlockFile
        ) || self.is_type()
    }

    /// Kinds that are types.
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Self::BasicType | Self::DerivedType | Self::CompositeType | Self::SubroutineType
        )
    }

    /// Scopes that live inside a function body.
    pub const fn is_local_scope(self) -> bool {
        matches!(
            self,
            Self::Subprogram | Self::LexicalBlock | Self::LexicalBlockFile
        )
    }

    /// Short name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tuple => "tuple",
            Self::File => "DIFile",
            Self::CompileUnit => "DICompileUnit",
            Self::BasicType => "DIBasicType",
            Self::DerivedType => "DIDerivedType",
            Self::CompositeType => "DICompositeType",
            Self::SubroutineType => "DISubroutineType",
            Self::Subprogram => "DISubprogram",
            Self::LexicalBlock => "DILexicalBlock",
            Self::LexicalBlockFile => "DILexicalBlockFile",
            Self::LocalVariable => "DILocalVariable",
            Self::GlobalVariable => "DIGlobalVariable",
            Self::Enumerator => "DIEnumerator",
            Self::Expression => "DIExpression",
            Self::Subrange => "DISubrange",
            Self::Location => "DILocation",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FileData {
    pub filename: String,
    pub directory: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CompileUnitData {
    pub language: u32,
    pub file: MetadataId,
    pub producer: String,
    pub is_optimized: bool,
    pub flags: String,
    pub runtime_version: u32,
    pub split_debug_filename: String,
    pub emission_kind: EmissionKind,
    pub dwo_id: u64,
    pub emit_debug_info: bool,
    /// Lists filled in when the owning builder finalizes.
    pub enum_types: Option<MetadataId>,
    pub retained_types: Option<MetadataId>,
    pub subprograms: Option<MetadataId>,
    pub global_variables: Option<MetadataId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BasicTypeData {
    /// `DW_TAG_base_type` or `DW_TAG_unspecified_type`.
    pub tag: u32,
    pub name: String,
    pub size_bits: u64,
    pub align_bits: u64,
    pub encoding: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DerivedTypeData {
    pub tag: u32,
    pub scope: Option<MetadataId>,
    pub name: String,
    pub file: Option<MetadataId>,
    pub line: u32,
    pub base_type: Option<MetadataId>,
    pub size_bits: u64,
    pub align_bits: u64,
    pub offset_bits: u64,
    pub flags: DIFlags,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CompositeTypeData {
    pub tag: u32,
    pub scope: Option<MetadataId>,
    pub name: String,
    pub file: Option<MetadataId>,
    pub line: u32,
    pub size_bits: u64,
    pub align_bits: u64,
    pub flags: DIFlags,
    /// Element tuple; `None` while the type is an unresolved forward declaration.
    pub elements: Option<MetadataId>,
    /// Derived-from type (base class, or element type for arrays/vectors/enums).
    pub base_type: Option<MetadataId>,
    pub vtable_holder: Option<MetadataId>,
    pub runtime_lang: u32,
    pub identifier: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubroutineTypeData {
    pub flags: DIFlags,
    /// Tuple of types; index 0 is the return type.
    pub types: Option<MetadataId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubprogramData {
    pub scope: Option<MetadataId>,
    pub name: String,
    pub linkage_name: String,
    pub file: Option<MetadataId>,
    pub line: u32,
    pub ty: Option<MetadataId>,
    pub is_local: bool,
    pub is_definition: bool,
    pub scope_line: u32,
    pub flags: DIFlags,
    pub is_optimized: bool,
    /// Function recorded on the node itself (older metadata API revisions).
    pub function: Option<ValueId>,
    pub template_params: Option<MetadataId>,
    pub declaration: Option<MetadataId>,
    /// Preserved local variables, filled in at finalize.
    pub variables: Option<MetadataId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexicalBlockData {
    pub scope: Option<MetadataId>,
    pub file: Option<MetadataId>,
    pub line: u32,
    pub column: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexicalBlockFileData {
    pub scope: Option<MetadataId>,
    pub file: Option<MetadataId>,
    pub discriminator: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LocalVariableData {
    pub scope: Option<MetadataId>,
    pub name: String,
    pub file: Option<MetadataId>,
    pub line: u32,
    pub ty: Option<MetadataId>,
    /// 1-based argument number; 0 for auto variables.
    pub arg: u32,
    pub flags: DIFlags,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct GlobalVariableData {
    pub scope: Option<MetadataId>,
    pub name: String,
    pub linkage_name: String,
    pub file: Option<MetadataId>,
    pub line: u32,
    pub ty: Option<MetadataId>,
    pub is_local: bool,
    pub is_definition: bool,
    pub constant: Option<ValueId>,
    pub declaration: Option<MetadataId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EnumeratorData {
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubrangeData {
    pub lower_bound: i64,
    pub count: i64,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LocationData {
    pub line: u32,
    pub column: u32,
    pub scope: MetadataId,
    pub inlined_at: Option<MetadataId>,
}

/// Payload of a metadata node.
///
/// `Hash`/`Eq` compare full content, which is what uniquing tables key on.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeData {
    /// Array of (possibly null) node references.
    Tuple(Vec<Option<MetadataId>>),
    File(FileData),
    CompileUnit(CompileUnitData),
    BasicType(BasicTypeData),
    DerivedType(DerivedTypeData),
    CompositeType(CompositeTypeData),
    SubroutineType(SubroutineTypeData),
    Subprogram(SubprogramData),
    LexicalBlock(LexicalBlockData),
    LexicalBlockFile(LexicalBlockFileData),
    LocalVariable(LocalVariableData),
    GlobalVariable(GlobalVariableData),
    Enumerator(EnumeratorData),
    /// Location expression opcodes.
    Expression(Vec<u64>),
    Subrange(SubrangeData),
    Location(LocationData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Tuple(_) => NodeKind::Tuple,
            Self::File(_) => NodeKind::File,
            Self::CompileUnit(_) => NodeKind::CompileUnit,
            Self::BasicType(_) => NodeKind::BasicType,
            Self::DerivedType(_) => NodeKind::DerivedType,
            Self::CompositeType(_) => NodeKind::CompositeType,
            Self::SubroutineType(_) => NodeKind::SubroutineType,
            Self::Subprogram(_) => NodeKind::Subprogram,
            Self::LexicalBlock(_) => NodeKind::LexicalBlock,
            Self::LexicalBlockFile(_) => NodeKind::LexicalBlockFile,
            Self::LocalVariable(_) => NodeKind::LocalVariable,
            Self::GlobalVariable(_) => NodeKind::GlobalVariable,
            Self::Enumerator(_) => NodeKind::Enumerator,
            Self::Expression(_) => NodeKind::Expression,
            Self::Subrange(_) => NodeKind::Subrange,
            Self::Location(_) => NodeKind::Location,
        }
    }

    /// The explicit enclosing scope recorded on the node.
    ///
    /// Compile units, files and unscoped nodes (basic types, subranges,
    /// expressions, tuples) return `None`; they are enclosed by the compile
    /// unit implicitly.
    pub fn scope(&self) -> Option<MetadataId> {
        match self {
            Self::DerivedType(d) => d.scope,
            Self::CompositeType(c) => c.scope,
            Self::Subprogram(s) => s.scope,
            Self::LexicalBlock(b) => b.scope,
            Self::LexicalBlockFile(b) => b.scope,
            Self::LocalVariable(v) => v.scope,
            Self::GlobalVariable(v) => v.scope,
            Self::Location(l) => Some(l.scope),
            Self::Tuple(_)
            | Self::File(_)
            | Self::CompileUnit(_)
            | Self::BasicType(_)
            | Self::SubroutineType(_)
            | Self::Enumerator(_)
            | Self::Expression(_)
            | Self::Subrange(_) => None,
        }
    }

    /// Source-level name, if the kind has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::File(f) => Some(&f.filename),
            Self::BasicType(b) => Some(&b.name),
            Self::DerivedType(d) => Some(&d.name),
            Self::CompositeType(c) => Some(&c.name),
            Self::Subprogram(s) => Some(&s.name),
            Self::LocalVariable(v) => Some(&v.name),
            Self::GlobalVariable(v) => Some(&v.name),
            Self::Enumerator(e) => Some(&e.name),
            _ => None,
        }
    }

    /// Every metadata node this node refers to, in field order.
    pub fn operands(&self) -> Vec<MetadataId> {
        let ops: Vec<Option<MetadataId>> = match self {
            Self::Tuple(elems) => elems.clone(),
            Self::CompileUnit(cu) => vec![
                Some(cu.file),
                cu.enum_types,
                cu.retained_types,
                cu.subprograms,
                cu.global_variables,
            ],
            Self::DerivedType(d) => vec![d.scope, d.file, d.base_type],
            Self::CompositeType(c) => {
                vec![c.scope, c.file, c.elements, c.base_type, c.vtable_holder]
            }
            Self::SubroutineType(s) => vec![s.types],
            Self::Subprogram(s) => vec![
                s.scope,
                s.file,
                s.ty,
                s.template_params,
                s.declaration,
                s.variables,
            ],
            Self::LexicalBlock(b) => vec![b.scope, b.file],
            Self::LexicalBlockFile(b) => vec![b.scope, b.file],
            Self::LocalVariable(v) => vec![v.scope, v.file, v.ty],
            Self::GlobalVariable(v) => vec![v.scope, v.file, v.ty, v.declaration],
            Self::Location(l) => vec![Some(l.scope), l.inlined_at],
            Self::File(_)
            | Self::BasicType(_)
            | Self::Enumerator(_)
            | Self::Expression(_)
            | Self::Subrange(_) => Vec::new(),
        };
        ops.into_iter().flatten().collect()
    }
}

#[derive(Clone, Debug)]
struct Node {
    data: NodeData,
    storage: Storage,
}

/// Arena of debug-info nodes owned by a module.
#[derive(Clone, Debug, Default)]
pub struct MetadataGraph {
    nodes: Vec<Node>,
}

impl MetadataGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn push(&mut self, data: NodeData, storage: Storage) -> MetadataId {
        let raw = u32::try_from(self.nodes.len())
            .unwrap_or_else(|_| panic!("metadata arena exceeded u32::MAX nodes"));
        self.nodes.push(Node { data, storage });
        MetadataId(raw)
    }

    pub fn contains(&self, id: MetadataId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: MetadataId) -> Option<&NodeData> {
        self.nodes.get(id.index()).map(|n| &n.data)
    }

    /// Mutable access for in-place operand replacement.
    ///
    /// The caller is responsible for re-keying any uniquing table that
    /// holds the node's previous content.
    pub fn get_mut(&mut self, id: MetadataId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.index()).map(|n| &mut n.data)
    }

    pub fn kind(&self, id: MetadataId) -> Option<NodeKind> {
        self.get(id).map(NodeData::kind)
    }

    pub fn storage(&self, id: MetadataId) -> Option<Storage> {
        self.nodes.get(id.index()).map(|n| n.storage)
    }

    /// Take a node out of uniquing for good.
    pub fn make_distinct(&mut self, id: MetadataId) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.storage = Storage::Distinct;
        }
    }

    /// Iterate over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataId, &NodeData)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (MetadataId(i as u32), &n.data))
    }

    /// Elements of a tuple node.
    pub fn tuple(&self, id: MetadataId) -> Option<&[Option<MetadataId>]> {
        match self.get(id)? {
            NodeData::Tuple(elems) => Some(elems),
            _ => None,
        }
    }

    pub fn composite(&self, id: MetadataId) -> Option<&CompositeTypeData> {
        match self.get(id)? {
            NodeData::CompositeType(c) => Some(c),
            _ => None,
        }
    }

    pub fn derived_type(&self, id: MetadataId) -> Option<&DerivedTypeData> {
        match self.get(id)? {
            NodeData::DerivedType(d) => Some(d),
            _ => None,
        }
    }

    pub fn subprogram(&self, id: MetadataId) -> Option<&SubprogramData> {
        match self.get(id)? {
            NodeData::Subprogram(s) => Some(s),
            _ => None,
        }
    }

    pub fn compile_unit(&self, id: MetadataId) -> Option<&CompileUnitData> {
        match self.get(id)? {
            NodeData::CompileUnit(cu) => Some(cu),
            _ => None,
        }
    }

    pub fn local_variable(&self, id: MetadataId) -> Option<&LocalVariableData> {
        match self.get(id)? {
            NodeData::LocalVariable(v) => Some(v),
            _ => None,
        }
    }

    pub fn location(&self, id: MetadataId) -> Option<&LocationData> {
        match self.get(id)? {
            NodeData::Location(l) => Some(l),
            _ => None,
        }
    }

    /// Elements of a composite type, or `None` while unresolved.
    pub fn composite_elements(&self, id: MetadataId) -> Option<&[Option<MetadataId>]> {
        self.tuple(self.composite(id)?.elements?)
    }

    /// Explicit enclosing scope of a node.
    pub fn enclosing_scope(&self, id: MetadataId) -> Option<MetadataId> {
        self.get(id)?.scope()
    }

    /// The subprogram a local scope belongs to.
    ///
    /// Walks lexical blocks outward; returns `None` for non-local scopes
    /// or malformed chains.
    pub fn subprogram_of(&self, scope: MetadataId) -> Option<MetadataId> {
        let mut current = scope;
        for _ in 0..=self.nodes.len() {
            match self.get(current)? {
                NodeData::Subprogram(_) => return Some(current),
                NodeData::LexicalBlock(b) => current = b.scope?,
                NodeData::LexicalBlockFile(b) => current = b.scope?,
                NodeData::Location(l) => current = l.scope,
                _ => return None,
            }
        }
        None
    }
}
