//! The grammar file's abstract syntax (§3 "Production", §4.3).
//!
//! Names here are still raw strings; [`crate::validate`] is the step
//! that resolves them against the declared terminal/non-terminal sets.

/// `none | left | right` (§3 "Production").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    None,
    Left,
    Right,
}

/// A symbol on a production's right-hand side, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RhsSymbol {
    /// A quoted literal: an implicit keyword token (§4.3).
    Literal(String),
    /// A bare name: either a declared token or a non-terminal; which one
    /// is decided during validation.
    Name(String),
}

impl RhsSymbol {
    pub fn text(&self) -> &str {
        match self {
            RhsSymbol::Literal(s) | RhsSymbol::Name(s) => s,
        }
    }
}

/// A call argument's kind (§3 "Production": "call is ... function name +
/// optional literal or reference argument").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallArg {
    Literal(String),
    Reference(String),
    Int(i64),
}

/// A semantic-action reference attached to a production (§6 "Driver call
/// protocol").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub function: String,
    pub arg: Option<CallArg>,
}

/// One alternative of a grammar rule: `LHS [ / priority[L|R] ] = RHS...
/// [( call [arg] )] ;` (§4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: String,
    pub rhs: Vec<RhsSymbol>,
    pub priority: u16,
    pub assoc: Associativity,
    pub call: Option<Call>,
    /// `{}` appeared on this production: it opens a fresh scope at
    /// reduction time (§4.5).
    pub opens_scope: bool,
    /// `>>` appeared on this production: it advances the step counter at
    /// reduction time (§4.5).
    pub advances_step: bool,
    pub line: u32,
}

/// `NAME : pattern [capture-index] ;` (§4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDef {
    pub name: String,
    pub pattern: String,
    pub capture_index: u32,
    pub line: u32,
}

/// `%COMMENT "open" ["close"] ;` — a single argument defines an
/// end-of-line comment, two arguments a bracketed comment (grounded on
/// `original_source/src/automaton_parser.cpp`'s `defineEolnComment` /
/// `defineBracketComment` split).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentDef {
    EndOfLine { open: String },
    Bracket { open: String, close: String },
}

/// The parsed, not-yet-validated contents of a grammar file.
#[derive(Debug, Clone, Default)]
pub struct GrammarFile {
    pub language: Option<String>,
    pub typesystem: Option<String>,
    pub comments: Vec<CommentDef>,
    pub ignores: Vec<String>,
    pub bad: Vec<String>,
    pub tokens: Vec<TokenDef>,
    pub productions: Vec<Production>,
    /// Quoted literals used as RHS symbols, in first-use order, deduped.
    pub keywords: Vec<String>,
}
