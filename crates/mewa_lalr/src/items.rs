//! LR(1) items and the closure/goto operations the canonical collection
//! is built from (§4.4 step 4).

use crate::grammar::{Grammar, Symbol};
use crate::sets::first_of_sequence;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// One LR(1) item: a production, a dot position within its right-hand
/// side, and a single lookahead terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lr1Item {
    pub production: u32,
    pub dot: u32,
    pub lookahead: u16,
}

/// An item set keeps items sorted by `(production, dot, lookahead)` so
/// two states with the same contents compare equal and hash identically
/// regardless of insertion order.
pub type ItemSet = std::collections::BTreeSet<Lr1Item>;

/// The `(production, dot)` pairs of an item set, ignoring lookaheads —
/// the key the LALR merge step groups canonical states by (§4.4 step 4:
/// "merging LR(1) items that share their LR(0) core").
pub fn core_key(items: &ItemSet) -> Vec<(u32, u32)> {
    let mut seen: std::collections::BTreeSet<(u32, u32)> = std::collections::BTreeSet::new();
    for item in items {
        seen.insert((item.production, item.dot));
    }
    seen.into_iter().collect()
}

/// Closes an item set under the grammar: whenever an item has the dot
/// immediately before a non-terminal, adds an item for every production
/// of that non-terminal at dot 0, with lookahead FIRST(rest-of-rhs ·
/// incoming-lookahead).
pub fn closure(
    grammar: &Grammar,
    nullable: &[bool],
    first: &[FxHashSet<u16>],
    kernel: ItemSet,
) -> ItemSet {
    let mut items = kernel;
    loop {
        let mut additions: Vec<Lr1Item> = Vec::new();
        for item in &items {
            let Some(Symbol::NonTerminal(nt)) = grammar.symbol_at(item.production, item.dot) else {
                continue;
            };
            let rest = &grammar.productions[item.production as usize].rhs[(item.dot + 1) as usize..];
            let lookaheads = first_of_sequence(grammar, nullable, first, rest, item.lookahead);
            for (prod, _) in grammar.productions_of(nt) {
                for la in &lookaheads {
                    let candidate = Lr1Item { production: prod, dot: 0, lookahead: *la };
                    if !items.contains(&candidate) {
                        additions.push(candidate);
                    }
                }
            }
        }
        if additions.is_empty() {
            break;
        }
        items.extend(additions);
    }
    items
}

/// Advances every item whose next symbol is `symbol`, then closes the
/// resulting kernel. Returns `None` if no item in `items` has `symbol`
/// next (an empty goto is not a state).
pub fn goto(
    grammar: &Grammar,
    nullable: &[bool],
    first: &[FxHashSet<u16>],
    items: &ItemSet,
    symbol: Symbol,
) -> Option<ItemSet> {
    let mut kernel = ItemSet::new();
    for item in items {
        if grammar.symbol_at(item.production, item.dot) == Some(symbol) {
            kernel.insert(Lr1Item { production: item.production, dot: item.dot + 1, lookahead: item.lookahead });
        }
    }
    if kernel.is_empty() {
        None
    } else {
        Some(closure(grammar, nullable, first, kernel))
    }
}

/// Every grammar symbol that appears immediately after some item's dot
/// in `items`, used to enumerate goto targets without probing every
/// possible symbol.
pub fn symbols_after_dot(grammar: &Grammar, items: &ItemSet) -> Vec<Symbol> {
    let mut seen: BTreeMap<Symbol, ()> = BTreeMap::new();
    for item in items {
        if let Some(symbol) = grammar.symbol_at(item.production, item.dot) {
            seen.insert(symbol, ());
        }
    }
    seen.into_keys().collect()
}
