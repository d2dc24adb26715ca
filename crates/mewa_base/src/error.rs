//! Stable error codes shared across the mewa workspace.
//!
//! Every fallible operation in mewa returns a [`MewaError`]: a numeric
//! [`ErrorCode`] from the flat space §6 defines, an optional free-text
//! argument, and an optional source [`Location`]. No crate in this
//! workspace reaches for `thiserror` or `anyhow` — like
//! `logicaffeine-base`'s `SpannedError` and `logicaffeine-kernel`'s
//! `InterfaceError`, this is a hand-written enum with a hand-written
//! `Display` impl.
//!
//! # Example
//!
//! ```
//! use mewa_base::error::{MewaError, ErrorCode, Location};
//!
//! let err = MewaError::new(ErrorCode::UnknownIdentifier, "frobnicate")
//!     .at(Location::new(12, None));
//!
//! assert!(err.to_string().contains("frobnicate"));
//! assert!(err.to_string().contains("12"));
//! ```

use std::fmt;

/// A stable numeric error code, grouped by origin as in §6.
///
/// Codes are never renumbered once assigned; a host translating these into
/// its own exception model can match on the numeric value durably across
/// mewa releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // --- General (401-499) ---
    /// Internal invariant violated; never expected in normal operation.
    LogicError = 401,
    /// The grammar or source file could not be read.
    FileReadError = 402,

    // --- Lexer class (5xx) ---
    /// A character was encountered that no token pattern, ignore pattern
    /// or comment bracket accounts for.
    BadCharacter = 501,
    /// A lexer directive referenced a pattern that failed to compile.
    InvalidPattern = 502,

    // --- Grammar class (6xx-7xx) ---
    /// Malformed grammar-file syntax.
    GrammarSyntaxError = 601,
    /// A directive or production was given the wrong number of arguments.
    WrongArgumentCount = 602,
    /// A right-hand-side symbol names neither a declared token nor a
    /// non-terminal.
    UnknownIdentifier = 603,
    /// The start symbol appears more than once on the left, or also
    /// appears on some right-hand side.
    DuplicateStartSymbol = 701,
    /// A non-terminal is never reachable from the start symbol.
    UnreachableNonTerminal = 702,

    // --- Conflict class (8xx) ---
    /// Two items propose a shift action on the same terminal at different
    /// priority with no way to prefer one (§4.4 step 6, Open Question 2).
    ShiftShiftConflictInGrammarDef = 801,
    /// Shift and reduce actions tie in priority with no associativity to
    /// break the tie. Reported as a warning, not fatal.
    ShiftReduceConflictInGrammarDef = 802,
    /// Two reduce actions tie in priority on the same terminal.
    ReduceReduceConflictInGrammarDef = 803,
    /// Two items propose conflicting priorities for the same shift action.
    PriorityConflictInGrammarDef = 804,

    // --- Complexity class (9xx) ---
    /// The emitted tables would exceed a fixed bit-width budget from §3
    /// (state count, non-terminal count, terminal count or production
    /// length).
    ComplexityBudgetExceeded = 901,

    // --- Type-database class ---
    /// A second definition of the same key at equal priority/signature
    /// was rejected (§4.6 `defineType` returning `-1`).
    DuplicateDefinition = 1001,
    /// An integer handle did not name a live record in this database.
    InvalidHandle = 1002,
    /// A scope argument had `start > end` or otherwise failed validation.
    InvalidBoundary = 1003,
    /// More than one reduction matched a query after tie-breaking on
    /// weight (§4.6 `getReduction`).
    AmbiguousReductionDefinitions = 1004,
    /// Inserting a scope into a scoped map partially overlapped an
    /// existing scope for the same key (§4.2).
    ScopeHierarchyError = 1005,
    /// `resolveType` found definitions reachable at equal weight from two
    /// different context types.
    AmbiguousTypeReference = 1006,
    /// `deriveType` found no path from `fromType` to `toType` under the
    /// given tag mask.
    UnresolvableType = 1007,

    // --- Driver class ---
    /// The current parser state has no action defined for the lookahead
    /// token.
    UnexpectedTokenNotOneOf = 1101,
    /// The tables are internally inconsistent (e.g. accept on a
    /// non-EOF token); never expected on tables `mewa-lalr` emits.
    LanguageAutomatonCorrupted = 1102,
    /// A reduce action popped to a state with no goto entry for the
    /// produced non-terminal.
    LanguageAutomatonMissingGoto = 1103,
    /// An accept action fired before the lookahead reached end-of-input.
    LanguageAutomatonUnexpectedAccept = 1104,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, *self as u16)
    }
}

/// A source location: a 1-based line number and an optional file name.
///
/// Mirrors §7: "location is `(line, filename)`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub file: Option<String>,
}

impl Location {
    pub fn new(line: u32, file: Option<String>) -> Self {
        Location { line, file }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}", file, self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}

/// A fatal error: a stable code, an optional free-text argument, and an
/// optional source location (§7: "All errors carry `(code,
/// optional-argument-string, optional-location)`").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MewaError {
    pub code: ErrorCode,
    pub argument: Option<String>,
    pub location: Option<Location>,
}

impl MewaError {
    /// Creates an error with no location attached.
    pub fn new(code: ErrorCode, argument: impl Into<String>) -> Self {
        MewaError {
            code,
            argument: Some(argument.into()),
            location: None,
        }
    }

    /// Creates an error carrying no free-text argument.
    pub fn bare(code: ErrorCode) -> Self {
        MewaError {
            code,
            argument: None,
            location: None,
        }
    }

    /// Attaches a source location to this error.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for MewaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(arg) = &self.argument {
            write!(f, "({})", arg)?;
        }
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

impl std::error::Error for MewaError {}

/// Alias for `std::result::Result<T, MewaError>`, used as the return type
/// for fallible operations throughout mewa.
pub type Result<T> = std::result::Result<T, MewaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_argument_and_location() {
        let err = MewaError::new(ErrorCode::UnknownIdentifier, "foo")
            .at(Location::new(3, Some("grammar.mewa".to_string())));
        let s = err.to_string();
        assert!(s.contains("foo"));
        assert!(s.contains("grammar.mewa"));
        assert!(s.contains('3'));
    }

    #[test]
    fn bare_error_has_no_argument() {
        let err = MewaError::bare(ErrorCode::LogicError);
        assert_eq!(err.argument, None);
        assert!(!err.to_string().contains("()"));
    }

    #[test]
    fn error_codes_are_stable_numbers() {
        assert_eq!(ErrorCode::LogicError as u16, 401);
        assert_eq!(ErrorCode::FileReadError as u16, 402);
        assert_eq!(ErrorCode::UnexpectedTokenNotOneOf as u16, 1101);
    }

    #[test]
    fn location_without_file_displays_line_only() {
        let loc = Location::new(7, None);
        assert_eq!(loc.to_string(), "line 7");
    }
}
