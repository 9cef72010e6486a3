//! Debug info configuration types and error definitions.

use dig_ir::IrError;

/// Which debug format a module's flags announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugFormat {
    /// DWARF; the flag value is the configured DWARF version.
    #[default]
    Dwarf,
    /// `CodeView`, for MSVC targets.
    CodeView,
}

impl DebugFormat {
    /// `CodeView` for `*-windows-msvc` triples, DWARF otherwise.
    #[must_use]
    pub fn for_target(target: &str) -> Self {
        let msvc = target.contains("windows") && target.contains("msvc");
        if msvc { Self::CodeView } else { Self::Dwarf }
    }

    /// Module flag naming this format, with its value.
    pub(crate) fn module_flag(self, dwarf_version: u32) -> (&'static str, u64) {
        match self {
            Self::Dwarf => ("Dwarf Version", u64::from(dwarf_version)),
            Self::CodeView => ("CodeView", 1),
        }
    }
}

impl std::fmt::Display for DebugFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Dwarf => "DWARF",
            Self::CodeView => "CodeView",
        })
    }
}

/// Configuration for a [`DIBuilder`](crate::DIBuilder).
#[derive(Debug, Clone)]
pub struct DebugInfoConfig {
    /// DWARF version recorded in the module flags (4 or 5).
    /// Only applicable when format is DWARF.
    pub dwarf_version: u32,
    /// Debug format (DWARF or `CodeView`).
    pub format: DebugFormat,
    /// Whether the builder adds the "Debug Info Version" and format flags
    /// to the module when it is created.
    pub emit_module_flags: bool,
}

impl Default for DebugInfoConfig {
    fn default() -> Self {
        Self {
            dwarf_version: 4,
            format: DebugFormat::Dwarf,
            emit_module_flags: true,
        }
    }
}

impl DebugInfoConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration appropriate for a target triple.
    #[must_use]
    pub fn for_target(target: &str) -> Self {
        Self {
            format: DebugFormat::for_target(target),
            ..Self::default()
        }
    }

    /// Set the DWARF version (4 or 5).
    #[must_use]
    pub fn with_dwarf_version(mut self, version: u32) -> Self {
        self.dwarf_version = version;
        self
    }

    /// Set the debug format.
    #[must_use]
    pub fn with_format(mut self, format: DebugFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable the module flags added at construction.
    #[must_use]
    pub fn with_module_flags(mut self, emit: bool) -> Self {
        self.emit_module_flags = emit;
        self
    }
}

/// Error type for debug info operations.
///
/// Only precondition violations are errors. A handle of the wrong kind
/// passed where a node is optional is treated as absent and logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DebugInfoError {
    /// Emission kind code other than `1` (full) or `2` (line tables only).
    #[error("invalid emission kind {0}")]
    InvalidEmissionKind(u32),
    /// The builder already created its compile unit.
    #[error("builder already has a compile unit")]
    CompileUnitExists,
    /// A location was requested without an enclosing scope.
    #[error("debug location requires a scope")]
    MissingScope,
    /// `create_function` was given a handle that is not a function value.
    #[error("handle is not a function value")]
    NotAFunction,
    /// A body was set on a handle that is not a composite type.
    #[error("handle is not a composite type")]
    NotAComposite,
    /// A `dbg.declare` operand is missing or of the wrong kind.
    #[error("invalid dbg.declare: {reason}")]
    InvalidDeclare { reason: &'static str },
    /// The IR rejected an operation.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Create a `DebugInfoError::InvalidDeclare` error (cold path).
#[cold]
#[inline(never)]
pub(crate) fn invalid_declare(reason: &'static str) -> DebugInfoError {
    DebugInfoError::InvalidDeclare { reason }
}
