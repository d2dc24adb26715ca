//! Packed action/goto/call tables (§3 "Parser table", §6 "Emitted tables
//! format").

use mewa_base::error::ErrorCode;
use mewa_grammar::CallArg;
use std::collections::BTreeMap;

/// One cell of the action table (§3: "shift(state) | reduce(nt, count,
/// call) | accept").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(u32),
    Reduce {
        nonterminal: u16,
        count: u32,
        call: Option<u32>,
        /// The reducing production's `{}` marker (§4.5): true if this
        /// reduce should close a scope pushed while shifting its
        /// right-hand side.
        opens_scope: bool,
        /// The reducing production's `>>` marker (§4.5): true if this
        /// reduce should advance the driver's step counter.
        advances_step: bool,
    },
    Accept,
}

/// A distinct `(function, kind, arg)` triple the call table references
/// by index (§6 "Emitted tables format").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEntry {
    pub function: String,
    pub arg: Option<CallArg>,
}

/// The packed output of LALR(1) table construction: actions, gotos and
/// the call table, ready for `mewa-driver` to execute (§3, §6).
#[derive(Debug, Clone, Default)]
pub struct ParserTables {
    pub actions: BTreeMap<(u32, u16), Action>,
    pub gotos: BTreeMap<(u32, u16), u32>,
    pub calls: Vec<CallEntry>,
    pub state_count: u32,
    pub terminal_count: u16,
    pub nonterminal_count: u16,
}

impl ParserTables {
    pub fn action(&self, state: u32, terminal: u16) -> Option<Action> {
        self.actions.get(&(state, terminal)).copied()
    }

    pub fn goto(&self, state: u32, nonterminal: u16) -> Option<u32> {
        self.gotos.get(&(state, nonterminal)).copied()
    }

    /// Every terminal for which `state` has some action defined, in
    /// ascending order — used to build the admissible-terminal list of
    /// [`mewa_base::error::ErrorCode::UnexpectedTokenNotOneOf`].
    pub fn admissible_terminals(&self, state: u32) -> Vec<u16> {
        self.actions.keys().filter(|(s, _)| *s == state).map(|(_, t)| *t).collect()
    }
}

/// A non-fatal conflict resolved by priority/associativity heuristics
/// (§4.4 step 6, §7 "Warnings"), collected rather than raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub code: ErrorCode,
    pub state: u32,
    pub terminal: Option<u16>,
    pub productions: Vec<u32>,
}
