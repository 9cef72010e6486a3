//! Typed node references and the opaque handle boundary.
//!
//! Front ends hold `Option<ValueRef>` handles. Inside the crate every node is
//! referred to through a typed wrapper around its [`MetadataId`] (`DIFile`,
//! `DISubprogram`, ...) or one of the category wrappers (`DIScope`, `DIType`,
//! `DINode`). [`wrap`] goes out to a handle; [`unwrap_as`] comes back in with
//! a checked downcast.
//!
//! A failed downcast is not an error: the result is `None`, a warning is
//! logged, and the caller treats the operand as absent.

use std::fmt;
use std::hash::Hash;

use dig_ir::{MetadataGraph, MetadataId, NodeKind, ValueRef};
use smallvec::SmallVec;

/// A typed reference to a metadata node.
pub trait NodeRef: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Whether a node of `kind` may be viewed as this reference type.
    fn accepts(kind: NodeKind) -> bool;

    /// Wrap an id without checking its kind.
    fn from_id_unchecked(id: MetadataId) -> Self;

    fn id(self) -> MetadataId;
}

macro_rules! node_refs {
    ($($(#[$attr:meta])* $name:ident => |$kind:ident| $accepts:expr;)*) => {$(
        $(#[$attr])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $name(MetadataId);

        impl NodeRef for $name {
            const NAME: &'static str = stringify!($name);

            #[inline]
            fn accepts($kind: NodeKind) -> bool {
                $accepts
            }

            #[inline]
            fn from_id_unchecked(id: MetadataId) -> Self {
                Self(id)
            }

            #[inline]
            fn id(self) -> MetadataId {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl From<$name> for MetadataId {
            #[inline]
            fn from(node: $name) -> Self {
                node.0
            }
        }
    )*};
}

node_refs! {
    /// Uniqued array of (possibly null) node references.
    DITuple => |k| k == NodeKind::Tuple;
    DIFile => |k| k == NodeKind::File;
    DICompileUnit => |k| k == NodeKind::CompileUnit;
    DIBasicType => |k| k == NodeKind::BasicType;
    /// Qualifier, pointer, member, typedef or inheritance.
    DIDerivedType => |k| k == NodeKind::DerivedType;
    /// Struct, union, array, vector or enumeration.
    DICompositeType => |k| k == NodeKind::CompositeType;
    DISubroutineType => |k| k == NodeKind::SubroutineType;
    DISubprogram => |k| k == NodeKind::Subprogram;
    DILexicalBlock => |k| k == NodeKind::LexicalBlock;
    DILexicalBlockFile => |k| k == NodeKind::LexicalBlockFile;
    DILocalVariable => |k| k == NodeKind::LocalVariable;
    DIGlobalVariable => |k| k == NodeKind::GlobalVariable;
    DIEnumerator => |k| k == NodeKind::Enumerator;
    DIExpression => |k| k == NodeKind::Expression;
    DISubrange => |k| k == NodeKind::Subrange;
    DILocation => |k| k == NodeKind::Location;
    /// Anything that can enclose declarations, types included.
    DIScope => |k| k.is_scope();
    /// Any type node.
    DIType => |k| k.is_type();
    /// Any debug-info entity; excludes tuples, expressions and locations.
    DINode => |k| !matches!(k, NodeKind::Tuple | NodeKind::Expression | NodeKind::Location);
}

macro_rules! upcasts {
    ($($to:ident <= $($from:ident),+;)*) => {$($(
        impl From<$from> for $to {
            #[inline]
            fn from(node: $from) -> Self {
                Self(node.0)
            }
        }
    )+)*};
}

upcasts! {
    DIScope <= DIFile, DICompileUnit, DIBasicType, DIDerivedType, DICompositeType,
        DISubroutineType, DISubprogram, DILexicalBlock, DILexicalBlockFile;
    DIType <= DIBasicType, DIDerivedType, DICompositeType, DISubroutineType;
    DINode <= DIFile, DICompileUnit, DIBasicType, DIDerivedType, DICompositeType,
        DISubroutineType, DISubprogram, DILexicalBlock, DILexicalBlockFile,
        DILocalVariable, DIGlobalVariable, DIEnumerator, DISubrange, DIScope, DIType;
}

/// Wrap a typed reference as an opaque handle. `None` stays `None`.
#[inline]
pub fn wrap<T: NodeRef>(node: Option<T>) -> Option<ValueRef> {
    node.map(|n| ValueRef::Metadata(n.id()))
}

/// The metadata node behind a handle, of any kind.
///
/// Null handles give `None` silently; IR-value handles and ids outside the
/// graph give `None` with a warning.
pub fn unwrap_md(graph: &MetadataGraph, handle: Option<ValueRef>) -> Option<MetadataId> {
    match handle? {
        ValueRef::Metadata(id) if graph.contains(id) => Some(id),
        ValueRef::Metadata(id) => {
            tracing::warn!(?id, "handle refers to a node outside this module");
            None
        }
        ValueRef::Value(value) => {
            tracing::warn!(?value, "expected a metadata handle, got an IR value");
            None
        }
    }
}

/// Checked downcast of a handle to `T`.
///
/// Kind mismatches give `None` with a warning.
pub fn unwrap_as<T: NodeRef>(graph: &MetadataGraph, handle: Option<ValueRef>) -> Option<T> {
    let id = unwrap_md(graph, handle)?;
    let kind = graph.kind(id)?;
    if T::accepts(kind) {
        Some(T::from_id_unchecked(id))
    } else {
        tracing::warn!(?id, %kind, expected = T::NAME, "handle kind mismatch, treating as null");
        None
    }
}

/// Unwrap a list of element handles, keeping null entries in place.
pub fn unwrap_list(
    graph: &MetadataGraph,
    handles: &[Option<ValueRef>],
) -> SmallVec<[Option<MetadataId>; 8]> {
    handles.iter().map(|&h| unwrap_md(graph, h)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
