//! The host module: values, blocks, module flags and the metadata graph.

use std::cell::{Ref, RefCell, RefMut};

use rustc_hash::FxHashMap;

use crate::error::IrError;
use crate::metadata::{MetadataGraph, MetadataId};
use crate::value::{BlockId, DebugLoc, InsertPoint, Instruction, Opcode, ValueId, ValueKind};

/// How conflicting module flags are merged when modules are linked.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FlagBehavior {
    Error,
    Warning,
    Override,
}

/// A `(behavior, key, value)` module flag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModuleFlag {
    pub behavior: FlagBehavior,
    pub key: String,
    pub value: u64,
}

#[derive(Clone, Debug)]
struct FunctionData {
    name: String,
    blocks: Vec<BlockId>,
    subprogram: Option<MetadataId>,
}

#[derive(Clone, Debug)]
enum ValueData {
    Function(FunctionData),
    Global { name: String },
    ConstInt { bits: u32, value: i64 },
    Instruction(Instruction),
}

impl ValueData {
    fn kind(&self) -> ValueKind {
        match self {
            Self::Function(_) => ValueKind::Function,
            Self::Global { .. } => ValueKind::GlobalVariable,
            Self::ConstInt { .. } => ValueKind::Constant,
            Self::Instruction(_) => ValueKind::Instruction,
        }
    }
}

#[derive(Clone, Debug)]
struct BlockData {
    name: String,
    parent: ValueId,
    instructions: Vec<ValueId>,
}

/// An IR module.
///
/// All state sits behind `RefCell`s so that an [`IrBuilder`](crate::IrBuilder)
/// and a debug-info builder can share `&Module`. Borrows never escape a
/// method except through [`metadata`](Self::metadata) and
/// [`metadata_mut`](Self::metadata_mut). Not `Sync`: one module is mutated
/// from one thread.
#[derive(Debug)]
pub struct Module {
    name: String,
    values: RefCell<Vec<ValueData>>,
    blocks: RefCell<Vec<BlockData>>,
    flags: RefCell<Vec<ModuleFlag>>,
    named_metadata: RefCell<FxHashMap<String, Vec<MetadataId>>>,
    metadata: RefCell<MetadataGraph>,
}

impl Module {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: RefCell::new(Vec::new()),
            blocks: RefCell::new(Vec::new()),
            flags: RefCell::new(Vec::new()),
            named_metadata: RefCell::new(FxHashMap::default()),
            metadata: RefCell::new(MetadataGraph::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn push_value(&self, data: ValueData) -> ValueId {
        let mut values = self.values.borrow_mut();
        let raw = u32::try_from(values.len())
            .unwrap_or_else(|_| panic!("value arena exceeded u32::MAX entries"));
        values.push(data);
        ValueId::from_raw(raw)
    }

    // -- Values --

    /// Declare a function with no body yet.
    pub fn add_function(&self, name: &str) -> ValueId {
        self.push_value(ValueData::Function(FunctionData {
            name: name.to_string(),
            blocks: Vec::new(),
            subprogram: None,
        }))
    }

    pub fn add_global(&self, name: &str) -> ValueId {
        self.push_value(ValueData::Global {
            name: name.to_string(),
        })
    }

    pub fn const_int(&self, bits: u32, value: i64) -> ValueId {
        self.push_value(ValueData::ConstInt { bits, value })
    }

    pub fn value_kind(&self, value: ValueId) -> Option<ValueKind> {
        self.values.borrow().get(value.index()).map(ValueData::kind)
    }

    /// Name of a function, global or instruction.
    pub fn value_name(&self, value: ValueId) -> Option<String> {
        match self.values.borrow().get(value.index())? {
            ValueData::Function(f) => Some(f.name.clone()),
            ValueData::Global { name } => Some(name.clone()),
            ValueData::Instruction(inst) => Some(inst.name.clone()),
            ValueData::ConstInt { .. } => None,
        }
    }

    /// Integer constant payload as `(bits, value)`.
    pub fn const_int_value(&self, value: ValueId) -> Option<(u32, i64)> {
        match self.values.borrow().get(value.index())? {
            ValueData::ConstInt { bits, value } => Some((*bits, *value)),
            _ => None,
        }
    }

    /// All function values in declaration order.
    pub fn functions(&self) -> Vec<ValueId> {
        self.values
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, v)| matches!(v, ValueData::Function(_)))
            .map(|(i, _)| ValueId::from_raw(i as u32))
            .collect()
    }

    // -- Function debug attachment --

    /// Debug descriptor attached to a function.
    pub fn subprogram(&self, function: ValueId) -> Option<MetadataId> {
        match self.values.borrow().get(function.index())? {
            ValueData::Function(f) => f.subprogram,
            _ => None,
        }
    }

    /// Attach (or replace) the debug descriptor of a function.
    pub fn set_subprogram(&self, function: ValueId, subprogram: MetadataId) -> Result<(), IrError> {
        match self.values.borrow_mut().get_mut(function.index()) {
            Some(ValueData::Function(f)) => {
                f.subprogram = Some(subprogram);
                Ok(())
            }
            Some(_) => Err(IrError::NotAFunction(function)),
            None => Err(IrError::UnknownValue(function)),
        }
    }

    // -- Blocks and instructions --

    pub fn append_basic_block(&self, function: ValueId, name: &str) -> Result<BlockId, IrError> {
        let mut values = self.values.borrow_mut();
        let func = match values.get_mut(function.index()) {
            Some(ValueData::Function(f)) => f,
            Some(_) => return Err(IrError::NotAFunction(function)),
            None => return Err(IrError::UnknownValue(function)),
        };
        let mut blocks = self.blocks.borrow_mut();
        let id = BlockId::from_raw(
            u32::try_from(blocks.len())
                .unwrap_or_else(|_| panic!("block arena exceeded u32::MAX entries")),
        );
        blocks.push(BlockData {
            name: name.to_string(),
            parent: function,
            instructions: Vec::new(),
        });
        func.blocks.push(id);
        Ok(id)
    }

    pub fn function_blocks(&self, function: ValueId) -> Vec<BlockId> {
        match self.values.borrow().get(function.index()) {
            Some(ValueData::Function(f)) => f.blocks.clone(),
            _ => Vec::new(),
        }
    }

    pub fn block_name(&self, block: BlockId) -> Option<String> {
        self.blocks.borrow().get(block.index()).map(|b| b.name.clone())
    }

    /// Function that owns a block.
    pub fn block_parent(&self, block: BlockId) -> Option<ValueId> {
        self.blocks.borrow().get(block.index()).map(|b| b.parent)
    }

    /// Instructions of a block, in order.
    pub fn block_instructions(&self, block: BlockId) -> Vec<ValueId> {
        self.blocks
            .borrow()
            .get(block.index())
            .map(|b| b.instructions.clone())
            .unwrap_or_default()
    }

    /// A copy of an instruction.
    pub fn instruction(&self, value: ValueId) -> Option<Instruction> {
        match self.values.borrow().get(value.index())? {
            ValueData::Instruction(inst) => Some(inst.clone()),
            _ => None,
        }
    }

    /// Insert a new instruction at `point`.
    pub fn insert_instruction(
        &self,
        name: &str,
        opcode: Opcode,
        debug_loc: Option<DebugLoc>,
        point: InsertPoint,
    ) -> Result<ValueId, IrError> {
        let (block, position) = self.resolve_insert_point(point)?;
        let id = self.push_value(ValueData::Instruction(Instruction {
            name: name.to_string(),
            opcode,
            block: Some(block),
            debug_loc,
        }));
        let mut blocks = self.blocks.borrow_mut();
        let data = blocks
            .get_mut(block.index())
            .ok_or(IrError::UnknownBlock(block))?;
        match position {
            Some(pos) => data.instructions.insert(pos, id),
            None => data.instructions.push(id),
        }
        Ok(id)
    }

    /// Block and in-block position for an insertion point (`None` = end).
    fn resolve_insert_point(&self, point: InsertPoint) -> Result<(BlockId, Option<usize>), IrError> {
        match point {
            InsertPoint::AtEnd(block) => {
                if self.blocks.borrow().get(block.index()).is_none() {
                    return Err(IrError::UnknownBlock(block));
                }
                Ok((block, None))
            }
            InsertPoint::Before(anchor) => {
                let block = match self.values.borrow().get(anchor.index()) {
                    Some(ValueData::Instruction(inst)) => {
                        inst.block.ok_or(IrError::Detached(anchor))?
                    }
                    Some(_) => return Err(IrError::NotAnInstruction(anchor)),
                    None => return Err(IrError::UnknownValue(anchor)),
                };
                let blocks = self.blocks.borrow();
                let pos = blocks
                    .get(block.index())
                    .and_then(|b| b.instructions.iter().position(|&i| i == anchor))
                    .ok_or(IrError::Detached(anchor))?;
                Ok((block, Some(pos)))
            }
        }
    }

    // -- Module flags --

    /// Add a module flag, replacing an existing flag with the same key.
    pub fn add_flag(&self, behavior: FlagBehavior, key: &str, value: u64) {
        let mut flags = self.flags.borrow_mut();
        if let Some(existing) = flags.iter_mut().find(|f| f.key == key) {
            existing.behavior = behavior;
            existing.value = value;
            return;
        }
        flags.push(ModuleFlag {
            behavior,
            key: key.to_string(),
            value,
        });
    }

    pub fn flag(&self, key: &str) -> Option<u64> {
        self.flags
            .borrow()
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value)
    }

    pub fn flags(&self) -> Vec<ModuleFlag> {
        self.flags.borrow().clone()
    }

    // -- Metadata --

    /// Append an operand to a named metadata list (e.g. `llvm.dbg.cu`).
    pub fn add_named_metadata_operand(&self, name: &str, node: MetadataId) {
        self.named_metadata
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(node);
    }

    pub fn named_metadata(&self, name: &str) -> Vec<MetadataId> {
        self.named_metadata
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Shared access to the metadata graph.
    pub fn metadata(&self) -> Ref<'_, MetadataGraph> {
        self.metadata.borrow()
    }

    /// Exclusive access to the metadata graph.
    pub fn metadata_mut(&self) -> RefMut<'_, MetadataGraph> {
        self.metadata.borrow_mut()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
