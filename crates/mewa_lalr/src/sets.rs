//! Nullable and FIRST set computation by fixed-point iteration (§4.4
//! steps 1-2).

use crate::grammar::{Grammar, Symbol};
use rustc_hash::FxHashSet;

/// `nullable[nt]` is `true` iff non-terminal `nt` has a production whose
/// right-hand side is entirely nullable (including the empty
/// right-hand side itself).
pub fn compute_nullable(grammar: &Grammar) -> Vec<bool> {
    let mut nullable = vec![false; grammar.nonterminal_count()];
    loop {
        let mut changed = false;
        for p in &grammar.productions {
            if nullable[p.lhs as usize] {
                continue;
            }
            let all_nullable = p.rhs.iter().all(|s| match s {
                Symbol::Terminal(_) => false,
                Symbol::NonTerminal(nt) => nullable[*nt as usize],
            });
            if all_nullable {
                nullable[p.lhs as usize] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    nullable
}

/// `first[nt]` is the set of terminals that can begin some string
/// derived from `nt`.
pub fn compute_first(grammar: &Grammar, nullable: &[bool]) -> Vec<FxHashSet<u16>> {
    let mut first = vec![FxHashSet::default(); grammar.nonterminal_count()];
    loop {
        let mut changed = false;
        for p in &grammar.productions {
            for symbol in &p.rhs {
                match symbol {
                    Symbol::Terminal(t) => {
                        changed |= first[p.lhs as usize].insert(*t);
                        break;
                    }
                    Symbol::NonTerminal(nt) => {
                        let additions: Vec<u16> = first[*nt as usize].iter().copied().collect();
                        for t in additions {
                            changed |= first[p.lhs as usize].insert(t);
                        }
                        if !nullable[*nt as usize] {
                            break;
                        }
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    first
}

/// FIRST of a symbol sequence followed by a known lookahead terminal,
/// used when computing the lookahead set of a closure item (§4.4 step 4:
/// "lookaheads are unioned"). Returns the terminal set and whether the
/// whole sequence (including the trailing lookahead) is reachable as
/// nullable — i.e. whether `following` itself must be included.
pub fn first_of_sequence(
    grammar: &Grammar,
    nullable: &[bool],
    first: &[FxHashSet<u16>],
    seq: &[Symbol],
    following: u16,
) -> FxHashSet<u16> {
    let mut result = FxHashSet::default();
    for symbol in seq {
        match symbol {
            Symbol::Terminal(t) => {
                result.insert(*t);
                return result;
            }
            Symbol::NonTerminal(nt) => {
                result.extend(first[*nt as usize].iter().copied());
                if !nullable[*nt as usize] {
                    return result;
                }
            }
        }
    }
    let _ = grammar;
    result.insert(following);
    result
}
