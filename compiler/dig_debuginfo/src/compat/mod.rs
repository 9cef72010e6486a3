//! Metadata API revisions.
//!
//! The underlying metadata API has changed shape over time. Three revisions
//! are supported:
//!
//! | | [`DescriptorApi`] | [`TypedApi`] | [`DetachedApi`] |
//! |---|---|---|---|
//! | native handle | [`Descriptor<T>`] | `Option<T>` | `Option<T>` |
//! | compile unit DWO id | dropped | kept | kept |
//! | subroutine type file | taken | taken | not taken |
//! | function linkage | node records fn | node records fn | fn records node |
//! | template params / decl | kept / kept | kept / kept | dropped / kept |
//! | body replacement | `replace_arrays` | `replace_elements` | `replace_elements` |
//! | debug metadata version | 2 | 3 | 3 |
//!
//! [`DIBuilder`](crate::DIBuilder) resolves every difference at the call
//! site of a [`Revision`] method, so the stable surface behaves the same for
//! all three. `ActiveRevision` is picked by cargo feature (`api-descriptor`,
//! `api-typed`, `api-detached`; `api-detached` wins when several are on and
//! is the default). Each revision can also be named explicitly as the
//! builder's type parameter.

mod descriptor;
mod detached;
mod typed;

use std::fmt;

use dig_ir::metadata::{CompileUnitData, SubprogramData};
use dig_ir::{DIFlags, ValueId, ValueRef};

pub use descriptor::{Descriptor, DescriptorApi};
pub use detached::DetachedApi;
pub use typed::TypedApi;

use crate::factory::NodeFactory;
use crate::handle::{self, DICompileUnit, DICompositeType, DIFile, DISubprogram, DISubroutineType, DITuple, NodeRef};

/// One supported shape of the underlying metadata API.
///
/// Implementations differ only in the native handle type and in the
/// signatures of the constructors listed here; everything else goes through
/// [`NodeFactory`] directly.
pub trait Revision: Sized + 'static {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Value of the "Debug Info Version" module flag.
    const DEBUG_METADATA_VERSION: u32;

    /// How this revision hands out node references.
    type NodeHandle<T: NodeRef>: Copy + fmt::Debug;

    /// Native handle for a typed reference.
    fn lift<T: NodeRef>(node: Option<T>) -> Self::NodeHandle<T>;

    /// Typed reference behind a native handle.
    fn lower<T: NodeRef>(handle: Self::NodeHandle<T>) -> Option<T>;

    /// Native handle to opaque handle.
    #[inline]
    fn wrap<T: NodeRef>(handle: Self::NodeHandle<T>) -> Option<ValueRef> {
        handle::wrap(Self::lower(handle))
    }

    fn create_compile_unit(
        factory: &NodeFactory<'_>,
        unit: CompileUnitData,
    ) -> Self::NodeHandle<DICompileUnit>;

    fn create_subroutine_type(
        factory: &NodeFactory<'_>,
        file: Self::NodeHandle<DIFile>,
        types: Self::NodeHandle<DITuple>,
        flags: DIFlags,
    ) -> Self::NodeHandle<DISubroutineType>;

    /// Create the subprogram for `function`.
    ///
    /// Only records the function on the node when this revision does so;
    /// attaching the node to the function is the caller's job.
    fn create_function(
        factory: &NodeFactory<'_>,
        subprogram: SubprogramData,
        function: ValueId,
    ) -> Self::NodeHandle<DISubprogram>;

    /// Replace the element list of `composite` in place.
    fn replace_body(
        factory: &NodeFactory<'_>,
        composite: Self::NodeHandle<DICompositeType>,
        elements: Self::NodeHandle<DITuple>,
    );
}

#[cfg(any(
    feature = "api-detached",
    not(any(feature = "api-descriptor", feature = "api-typed"))
))]
pub type ActiveRevision = DetachedApi;

#[cfg(all(feature = "api-typed", not(feature = "api-detached")))]
pub type ActiveRevision = TypedApi;

#[cfg(all(
    feature = "api-descriptor",
    not(feature = "api-typed"),
    not(feature = "api-detached")
))]
pub type ActiveRevision = DescriptorApi;

/// Debug metadata version of the active revision.
#[inline]
pub fn get_debug_metadata_version() -> u32 {
    ActiveRevision::DEBUG_METADATA_VERSION
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
