//! Debug-Info Metadata Graph Builder
//!
//! This crate builds the debug-information graph of a [`dig_ir::Module`]:
//! compile units, files, types, variables, functions, scopes and location
//! expressions. Nodes are uniqued per builder, forward-declared composite
//! types are patched in place, and source positions are bound to IR
//! instructions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   Option<ValueRef>   ┌───────────┐   R::NodeHandle<T>   ┌─────────────┐
//! │  Front end   │────────────────────▶│ DIBuilder │─────────────────────▶│ NodeFactory │
//! │              │◀────────────────────│ (stable)  │◀─────────────────────│ + Revision  │
//! └──────────────┘        wrap          └───────────┘        lift          └─────────────┘
//!                                                                                │
//!                                                                    ┌───────────▼──────────┐
//!                                                                    │ Module metadata arena │
//!                                                                    └──────────────────────┘
//! ```
//!
//! - **Handles** ([`handle`]): typed node references and the checked
//!   wrap/unwrap between them and the opaque [`ValueRef`] handle
//! - **Factory** ([`factory`]): node creation with per-builder uniquing
//! - **Revisions** ([`compat`]): one [`Revision`] impl per supported shape of
//!   the underlying metadata API, selected by cargo feature
//! - **Builder** ([`DIBuilder`]): the stable call surface, the forward
//!   declaration patch, the scope/location binder and the lifecycle
//!
//! # Usage
//!
//! ```ignore
//! use dig_debuginfo::{CompileUnitParams, DIBuilder, FunctionParams};
//! use dig_ir::{metadata::dwarf, Module};
//!
//! let module = Module::new("demo");
//! let di = DIBuilder::new(&module);
//! let cu = di.create_compile_unit(CompileUnitParams::new(dwarf::DW_LANG_C99, "a.c", "/src", "testcc 1.0"))?;
//! let file = di.create_file("a.c", "/src");
//! let int = di.create_basic_type("int", 32, 32, dwarf::DW_ATE_SIGNED);
//! let fn_ty = di.create_subroutine_type(file, &[None, int], DIFlags::empty());
//! let sp = di.create_function(FunctionParams::new(cu, "foo", file, 1, fn_ty, func.into()))?;
//! di.dispose();
//! ```
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=dig_debuginfo=debug`: lifecycle transitions
//! - `RUST_LOG=dig_debuginfo=trace`: every node creation

mod binder;
mod builder;
mod builder_scope;
mod builder_types;
pub mod compat;
mod config;
mod context;
pub mod factory;
pub mod handle;
mod line_map;
mod params;
mod patch;
mod uniquing;

use std::sync::Once;

pub use builder::{DIBuilder, Lifecycle};
pub use compat::{
    get_debug_metadata_version, ActiveRevision, Descriptor, DescriptorApi, DetachedApi, Revision,
    TypedApi,
};
pub use config::{DebugFormat, DebugInfoConfig, DebugInfoError};
pub use context::DebugContext;
pub use dig_ir::{DIFlags, EmissionKind, ValueRef};
pub use line_map::LineMap;
pub use params::{
    CompileUnitParams, EnumerationTypeParams, FunctionParams, GlobalVariableParams,
    MemberTypeParams, StructTypeParams, UnionTypeParams,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=dig_debuginfo=debug` or `RUST_LOG=dig_debuginfo=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
