//! IR errors.

use crate::value::{BlockId, ValueId};

/// Error from an IR construction operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// The cursor has not been positioned.
    #[error("IR builder has no insertion point")]
    NoInsertPoint,
    /// The value id does not exist in this module.
    #[error("unknown value {0:?}")]
    UnknownValue(ValueId),
    /// The block id does not exist in this module.
    #[error("unknown block {0:?}")]
    UnknownBlock(BlockId),
    /// A function was required.
    #[error("{0:?} is not a function")]
    NotAFunction(ValueId),
    /// An instruction was required.
    #[error("{0:?} is not an instruction")]
    NotAnInstruction(ValueId),
    /// The anchor instruction is not inside a block.
    #[error("instruction {0:?} is not attached to a block")]
    Detached(ValueId),
}

/// Problems found by [`Module::verify`](crate::Module::verify).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("module verification failed: {}", .problems.join("; "))]
pub struct VerifyError {
    pub problems: Vec<String>,
}
