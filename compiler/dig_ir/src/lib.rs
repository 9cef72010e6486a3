//! Dig IR - host module and debug-info metadata store
//!
//! This crate contains the pieces of the intermediate representation that the
//! debug-info builder binds to:
//! - A [`Module`] owning functions, globals, constants, basic blocks and
//!   instructions, all referenced by `u32` indices
//! - An [`IrBuilder`] cursor that inserts instructions and stamps them with
//!   the current debug location
//! - The metadata arena ([`MetadataGraph`]) holding every debug-info node;
//!   the graph lives exactly as long as the module that owns it
//! - A verifier that checks the debug info attached to the module
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: values, blocks and metadata are `u32` indices
//! - **Shared, single-threaded**: `Module` uses interior mutability so a
//!   debug-info builder and an IR cursor can both hold `&Module`
//! - **No uniquing here**: the store records whether a node is uniqued or
//!   distinct, but content-addressed lookup belongs to the builder that
//!   creates the nodes

mod builder;
mod error;
pub mod metadata;
mod module;
mod value;
mod verify;

pub use builder::IrBuilder;
pub use error::{IrError, VerifyError};
pub use metadata::{
    DIFlags, EmissionKind, MetadataGraph, MetadataId, NodeData, NodeKind, Storage,
};
pub use module::{FlagBehavior, Module, ModuleFlag};
pub use value::{BlockId, DebugLoc, InsertPoint, Instruction, Opcode, ValueId, ValueKind, ValueRef};

/// Compile-time assertion that a type has a specific size.
///
/// Used to keep handle types register-sized.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{MetadataId, ValueId, ValueRef};
    static_assert_size!(MetadataId, 4);
    static_assert_size!(ValueId, 4);
    static_assert_size!(ValueRef, 8);
}
