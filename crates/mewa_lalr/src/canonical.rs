//! Builds the canonical LR(1) collection (§4.4 step 4, before merging).

use crate::grammar::{Grammar, Symbol};
use crate::items::{closure, goto, symbols_after_dot, ItemSet, Lr1Item};
use crate::sets::{compute_first, compute_nullable};
use rustc_hash::FxHashMap;

pub struct CanonicalCollection {
    pub states: Vec<ItemSet>,
    pub goto: FxHashMap<(usize, Symbol), usize>,
}

/// Builds the canonical LR(1) collection by BFS from the augmented
/// start item, deduplicating states by exact item-set equality (full
/// canonical precision — the LALR merge happens as a separate pass in
/// [`crate::lalr`]).
pub fn build(grammar: &Grammar) -> CanonicalCollection {
    let nullable = compute_nullable(grammar);
    let first = compute_first(grammar, &nullable);

    let start_kernel: ItemSet =
        [Lr1Item { production: grammar.augmented_production, dot: 0, lookahead: grammar.eof_terminal }]
            .into_iter()
            .collect();
    let start_state = closure(grammar, &nullable, &first, start_kernel);

    let mut states = vec![start_state.clone()];
    let mut index_of: FxHashMap<ItemSet, usize> = FxHashMap::default();
    index_of.insert(start_state, 0);

    let mut goto_table: FxHashMap<(usize, Symbol), usize> = FxHashMap::default();
    let mut frontier = vec![0usize];

    while let Some(state_idx) = frontier.pop() {
        let symbols = symbols_after_dot(grammar, &states[state_idx]);
        for symbol in symbols {
            let Some(target) = goto(grammar, &nullable, &first, &states[state_idx], symbol) else {
                continue;
            };
            let target_idx = match index_of.get(&target) {
                Some(&idx) => idx,
                None => {
                    let idx = states.len();
                    index_of.insert(target.clone(), idx);
                    states.push(target);
                    frontier.push(idx);
                    idx
                }
            };
            goto_table.insert((state_idx, symbol), target_idx);
        }
    }

    CanonicalCollection { states, goto: goto_table }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mewa_grammar::parse_and_validate;

    #[test]
    fn scenario_a_pointer_assignment_has_ten_states() {
        // Scenario A (§8): S→N; N→V "=" E; N→E; E→V; V→IDENT; V→"*" E;
        let g = parse_and_validate(
            r#"
            S = N (s) ;
            N = V "=" E (assign) | E (expr) ;
            E = V (id) | "*" E (deref) ;
            V = IDENT (var) ;
            "#,
        )
        .unwrap();
        let grammar = Grammar::new(&g);
        let collection = build(&grammar);
        assert_eq!(collection.states.len(), 10);
    }
}
