//! The augmented grammar the item-set construction operates over.
//!
//! `mewa-grammar`'s [`mewa_grammar::ResolvedGrammar`] is dense-indexed but
//! unaugmented; LALR(1) construction needs one extra non-terminal (the
//! augmented start symbol `S'`) and one extra terminal (the end-of-input
//! sentinel `$`), per the standard construction restated in §4.4 step 3.

use mewa_grammar::{ResolvedGrammar, SymbolRef};
use std::fmt;

/// A grammar symbol: either a terminal or a non-terminal, dense-indexed.
/// The end-of-input sentinel and the augmented start symbol each get one
/// more index than `ResolvedGrammar` assigns natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(u16),
    NonTerminal(u16),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "t{t}"),
            Symbol::NonTerminal(n) => write!(f, "n{n}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AugmentedProduction {
    pub lhs: u16,
    pub rhs: Vec<Symbol>,
    pub priority: u16,
    pub assoc: mewa_grammar::Associativity,
    pub call: Option<mewa_grammar::Call>,
    pub opens_scope: bool,
    pub advances_step: bool,
}

/// The grammar augmented with `S' -> S` and the `$` end marker, the form
/// every algorithm in this crate operates on.
pub struct Grammar<'g> {
    pub source: &'g ResolvedGrammar,
    pub productions: Vec<AugmentedProduction>,
    /// Index of the augmented start non-terminal `S'`.
    pub augmented_start: u16,
    /// Index of the augmented production `S' -> S`.
    pub augmented_production: u32,
    /// Index of the `$` end-of-input terminal.
    pub eof_terminal: u16,
}

impl<'g> Grammar<'g> {
    pub fn new(source: &'g ResolvedGrammar) -> Self {
        let augmented_start = source.nonterminal_count() as u16;
        let eof_terminal = source.terminal_count() as u16;

        let mut productions: Vec<AugmentedProduction> = source
            .productions
            .iter()
            .map(|p| AugmentedProduction {
                lhs: p.lhs,
                rhs: p
                    .rhs
                    .iter()
                    .map(|s| match s {
                        SymbolRef::Terminal(t) => Symbol::Terminal(*t),
                        SymbolRef::NonTerminal(n) => Symbol::NonTerminal(*n),
                    })
                    .collect(),
                priority: p.priority,
                assoc: p.assoc,
                call: p.call.clone(),
                opens_scope: p.opens_scope,
                advances_step: p.advances_step,
            })
            .collect();

        let augmented_production = productions.len() as u32;
        productions.push(AugmentedProduction {
            lhs: augmented_start,
            rhs: vec![Symbol::NonTerminal(source.start_symbol)],
            priority: 0,
            assoc: mewa_grammar::Associativity::None,
            call: None,
            opens_scope: false,
            advances_step: false,
        });

        Grammar { source, productions, augmented_start, augmented_production, eof_terminal }
    }

    pub fn nonterminal_count(&self) -> usize {
        self.source.nonterminal_count() + 1
    }

    pub fn terminal_count(&self) -> usize {
        self.source.terminal_count() + 1
    }

    pub fn productions_of(&self, nt: u16) -> impl Iterator<Item = (u32, &AugmentedProduction)> {
        self.productions.iter().enumerate().filter(move |(_, p)| p.lhs == nt).map(|(i, p)| (i as u32, p))
    }

    pub fn symbol_at(&self, production: u32, dot: u32) -> Option<Symbol> {
        self.productions[production as usize].rhs.get(dot as usize).copied()
    }

    pub fn production_len(&self, production: u32) -> u32 {
        self.productions[production as usize].rhs.len() as u32
    }
}
