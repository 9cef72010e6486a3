//! Value, block and instruction handles.

use std::fmt;

use crate::metadata::MetadataId;

/// Index of a value (function, global, constant or instruction) in a module.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ValueId(u32);

impl ValueId {
    /// Create a value id from a raw index.
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
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Index of a basic block in a module.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    /// Create a block id from a raw index.
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
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// Opaque handle crossing the debug-info API boundary.
///
/// A handle is either a plain IR value or a metadata node wrapped as a
/// value. The null handle is expressed as `Option::<ValueRef>::None`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueRef {
    /// An IR value (function, global, constant, instruction).
    Value(ValueId),
    /// A metadata node used in value position.
    Metadata(MetadataId),
}

impl ValueRef {
    /// The IR value behind this handle, if it is not metadata.
    #[inline]
    pub fn as_value(self) -> Option<ValueId> {
        match self {
            Self::Value(v) => Some(v),
            Self::Metadata(_) => None,
        }
    }

    /// The metadata node behind this handle, if any.
    #[inline]
    pub fn as_metadata(self) -> Option<MetadataId> {
        match self {
            Self::Metadata(md) => Some(md),
            Self::Value(_) => None,
        }
    }
}

impl From<ValueId> for ValueRef {
    fn from(value: ValueId) -> Self {
        Self::Value(value)
    }
}

impl From<MetadataId> for ValueRef {
    fn from(md: MetadataId) -> Self {
        Self::Metadata(md)
    }
}

/// What kind of value a [`ValueId`] refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ValueKind {
    Function,
    GlobalVariable,
    Constant,
    Instruction,
}

/// A source location attached to an instruction.
///
/// Locations are plain values on instructions and on the IR cursor; they are
/// not nodes of the permanent metadata graph.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DebugLoc {
    pub line: u32,
    pub column: u32,
    /// Enclosing local scope (subprogram or lexical block).
    pub scope: MetadataId,
    pub inlined_at: Option<MetadataId>,
}

impl DebugLoc {
    pub fn new(line: u32, column: u32, scope: MetadataId) -> Self {
        Self {
            line,
            column,
            scope,
            inlined_at: None,
        }
    }
}

/// Instruction operation and operands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Opcode {
    /// Stack slot.
    Alloca,
    Store {
        value: ValueId,
        ptr: ValueId,
    },
    Load {
        ptr: ValueId,
    },
    Call {
        callee: ValueId,
        args: Vec<ValueId>,
    },
    Ret(Option<ValueId>),
    /// Marks `storage` as holding the source variable `variable`, with its
    /// address described by `expression`.
    DbgDeclare {
        storage: ValueId,
        variable: MetadataId,
        expression: MetadataId,
    },
}

/// An instruction stored in the module.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
    pub name: String,
    pub opcode: Opcode,
    /// Containing block; `None` once detached.
    pub block: Option<BlockId>,
    pub debug_loc: Option<DebugLoc>,
}

/// Where a new instruction goes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertPoint {
    /// Append to the end of the block.
    AtEnd(BlockId),
    /// Insert immediately before the given instruction.
    Before(ValueId),
}
