//! Debug-info node flags.

use bitflags::bitflags;

bitflags! {
    /// Flags carried by types, members, subprograms and variables.
    ///
    /// The two low bits form the accessibility field (`PRIVATE`, `PROTECTED`,
    /// `PUBLIC = PRIVATE | PROTECTED`); the rest are independent bits.
    /// Unknown bits supplied by a front end are retained.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DIFlags: u32 {
        const PRIVATE = 1;
        const PROTECTED = 2;
        const PUBLIC = 3;
        /// Declaration only; the definition lives elsewhere or never arrived.
        const FWD_DECL = 1 << 2;
        const APPLE_BLOCK = 1 << 3;
        const BLOCK_BYREF_STRUCT = 1 << 4;
        const VIRTUAL = 1 << 5;
        /// Compiler-generated entity.
        const ARTIFICIAL = 1 << 6;
        const EXPLICIT = 1 << 7;
        const PROTOTYPED = 1 << 8;
        const OBJC_CLASS_COMPLETE = 1 << 9;
        const OBJECT_POINTER = 1 << 10;
        const VECTOR = 1 << 11;
        const STATIC_MEMBER = 1 << 12;
        const LVALUE_REFERENCE = 1 << 13;
        const RVALUE_REFERENCE = 1 << 14;
    }
}

impl DIFlags {
    /// Flags from the raw `unsigned` a front end passes, keeping unknown bits.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Accessibility field, or empty when unset.
    #[inline]
    pub fn accessibility(self) -> Self {
        self & Self::PUBLIC
    }
}
