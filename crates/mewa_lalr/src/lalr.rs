//! LALR(1) state merging, conflict resolution and table emission (§4.4
//! steps 4-7).
//!
//! The canonical LR(1) collection [`crate::canonical::build`] produces is
//! usually far larger than necessary: many states share the same LR(0)
//! core (the `(production, dot)` pairs with lookaheads stripped) and
//! differ only in which lookaheads their items carry. Merging those
//! states — unioning lookaheads, keeping the LR(0)-core numbering — is
//! what makes the automaton LALR(1) rather than full canonical LR(1).

use crate::canonical::{self, CanonicalCollection};
use crate::grammar::{Grammar, Symbol};
use crate::items::{core_key, ItemSet, Lr1Item};
use crate::tables::{Action, CallEntry, ParserTables, Warning};
use mewa_base::error::{ErrorCode, MewaError, Result};
use mewa_grammar::{Associativity, ResolvedGrammar};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// The result of building an automaton: the tables proper plus any soft
/// conflicts resolved by a priority/associativity heuristic rather than
/// rejected outright (§7 "Warnings").
#[derive(Debug)]
pub struct BuildResult {
    pub tables: ParserTables,
    pub warnings: Vec<Warning>,
}

/// Builds the LALR(1) action/goto/call tables for `source` (§4.4).
///
/// Returns `Err` for a hard conflict (priority conflict among shift
/// items, unreachable shift-shift divergence, or a state/table size that
/// exceeds the §3 bit-width budgets), otherwise `Ok` with any soft
/// shift/reduce or reduce/reduce conflicts collected as warnings rather
/// than raised (§7).
pub fn build(source: &ResolvedGrammar) -> Result<BuildResult> {
    let grammar = Grammar::new(source);
    let canonical = canonical::build(&grammar);
    let (merged_states, merged_goto) = merge_lalr(&grammar, &canonical);

    if merged_states.len() > (1 << 15) {
        return Err(MewaError::new(ErrorCode::ComplexityBudgetExceeded, "too many automaton states"));
    }

    let mut warnings = Vec::new();
    let mut actions: BTreeMap<(u32, u16), Action> = BTreeMap::new();
    let mut call_table: Vec<CallEntry> = Vec::new();
    let mut call_index: FxHashMap<(String, Option<mewa_grammar::CallArg>), u32> = FxHashMap::default();

    for (state_idx, items) in merged_states.iter().enumerate() {
        build_state_actions(
            &grammar,
            state_idx,
            items,
            &merged_goto,
            &mut actions,
            &mut warnings,
            &mut call_table,
            &mut call_index,
        )?;
    }

    let mut gotos: BTreeMap<(u32, u16), u32> = BTreeMap::new();
    for (&(state, symbol), &target) in &merged_goto {
        if let Symbol::NonTerminal(nt) = symbol {
            if nt != grammar.augmented_start {
                gotos.insert((state as u32, nt), target as u32);
            }
        }
    }

    let tables = ParserTables {
        actions,
        gotos,
        calls: call_table,
        state_count: merged_states.len() as u32,
        terminal_count: grammar.source.terminal_count() as u16,
        nonterminal_count: grammar.source.nonterminal_count() as u16,
    };

    Ok(BuildResult { tables, warnings })
}

/// Groups canonical LR(1) states by LR(0) core and unions their
/// lookaheads (§4.4 step 4). Returns the merged item sets, indexed by
/// the LR(0) core's discovery order, plus the goto table re-expressed
/// over those merged indices.
fn merge_lalr(
    grammar: &Grammar,
    canonical: &CanonicalCollection,
) -> (Vec<ItemSet>, FxHashMap<(usize, Symbol), usize>) {
    let _ = grammar;
    let mut core_to_merged: FxHashMap<Vec<(u32, u32)>, usize> = FxHashMap::default();
    let mut merged_cores: Vec<Vec<(u32, u32)>> = Vec::new();
    let mut canonical_to_merged: Vec<usize> = Vec::with_capacity(canonical.states.len());

    for state in &canonical.states {
        let key = core_key(state);
        let merged_idx = *core_to_merged.entry(key.clone()).or_insert_with(|| {
            let idx = merged_cores.len();
            merged_cores.push(key);
            idx
        });
        canonical_to_merged.push(merged_idx);
    }

    // Union lookaheads per merged state, keyed by (production, dot).
    let mut lookaheads: Vec<FxHashMap<(u32, u32), std::collections::BTreeSet<u16>>> =
        vec![FxHashMap::default(); merged_cores.len()];
    for (canon_idx, state) in canonical.states.iter().enumerate() {
        let merged_idx = canonical_to_merged[canon_idx];
        for item in state {
            lookaheads[merged_idx].entry((item.production, item.dot)).or_default().insert(item.lookahead);
        }
    }

    let mut merged_sets: Vec<ItemSet> = Vec::with_capacity(merged_cores.len());
    for (merged_idx, core) in merged_cores.iter().enumerate() {
        let mut set = ItemSet::new();
        for &(production, dot) in core {
            for &lookahead in &lookaheads[merged_idx][&(production, dot)] {
                set.insert(Lr1Item { production, dot, lookahead });
            }
        }
        merged_sets.push(set);
    }

    let mut merged_goto: FxHashMap<(usize, Symbol), usize> = FxHashMap::default();
    for (&(state, symbol), &target) in &canonical.goto {
        merged_goto.insert((canonical_to_merged[state], symbol), canonical_to_merged[target]);
    }

    (merged_sets, merged_goto)
}

/// One proposal for a cell in the action table, before conflicts among
/// proposals sharing a terminal are resolved.
enum Proposal {
    Shift { target: u32, priority: u16, production: u32 },
    Reduce {
        lhs: u16,
        count: u32,
        call: Option<u32>,
        priority: u16,
        assoc: Associativity,
        production: u32,
        opens_scope: bool,
        advances_step: bool,
    },
}

/// Builds the action-table row for one merged state: shift actions from
/// items with the dot before a terminal, reduce actions from items at
/// the end of their production, and the accept action for the augmented
/// production on `$` (§4.4 step 5). Conflicting proposals on the same
/// terminal are resolved by [`resolve_terminal`] (§4.4 step 6).
#[allow(clippy::too_many_arguments)]
fn build_state_actions(
    grammar: &Grammar,
    state_idx: usize,
    items: &ItemSet,
    merged_goto: &FxHashMap<(usize, Symbol), usize>,
    actions: &mut BTreeMap<(u32, u16), Action>,
    warnings: &mut Vec<Warning>,
    call_table: &mut Vec<CallEntry>,
    call_index: &mut FxHashMap<(String, Option<mewa_grammar::CallArg>), u32>,
) -> Result<()> {
    let mut by_terminal: BTreeMap<u16, Vec<Proposal>> = BTreeMap::new();

    for item in items {
        let prod = &grammar.productions[item.production as usize];
        match grammar.symbol_at(item.production, item.dot) {
            Some(Symbol::Terminal(t)) => {
                let target = *merged_goto
                    .get(&(state_idx, Symbol::Terminal(t)))
                    .expect("an item with the dot before a terminal always has a goto target");
                by_terminal.entry(t).or_default().push(Proposal::Shift {
                    target: target as u32,
                    priority: prod.priority,
                    production: item.production,
                });
            }
            None if item.production == grammar.augmented_production => {
                actions.insert((state_idx as u32, grammar.eof_terminal), Action::Accept);
            }
            None => {
                let call = prod.call.as_ref().map(|c| {
                    *call_index.entry((c.function.clone(), c.arg.clone())).or_insert_with(|| {
                        let idx = call_table.len() as u32;
                        call_table.push(CallEntry { function: c.function.clone(), arg: c.arg.clone() });
                        idx
                    })
                });
                by_terminal.entry(item.lookahead).or_default().push(Proposal::Reduce {
                    lhs: prod.lhs,
                    count: prod.rhs.len() as u32,
                    call,
                    priority: prod.priority,
                    assoc: prod.assoc,
                    production: item.production,
                    opens_scope: prod.opens_scope,
                    advances_step: prod.advances_step,
                });
            }
            _ => {}
        }
    }

    for (terminal, proposals) in by_terminal {
        if actions.contains_key(&(state_idx as u32, terminal)) {
            // Accept already claimed this cell (augmented production at
            // end of input); nothing else can legitimately compete here.
            continue;
        }
        resolve_terminal(state_idx as u32, terminal, proposals, actions, warnings)?;
    }

    Ok(())
}

/// Resolves every proposal competing for one `(state, terminal)` cell
/// into a single [`Action`] (§4.4 step 6).
fn resolve_terminal(
    state: u32,
    terminal: u16,
    proposals: Vec<Proposal>,
    actions: &mut BTreeMap<(u32, u16), Action>,
    warnings: &mut Vec<Warning>,
) -> Result<()> {
    let mut shifts: Vec<(u32, u16, u32)> = Vec::new(); // (target, priority, production)
    let mut reduces: Vec<(u16, u32, Option<u32>, u16, Associativity, u32, bool, bool)> = Vec::new();

    for p in proposals {
        match p {
            Proposal::Shift { target, priority, production } => shifts.push((target, priority, production)),
            Proposal::Reduce { lhs, count, call, priority, assoc, production, opens_scope, advances_step } => {
                reduces.push((lhs, count, call, priority, assoc, production, opens_scope, advances_step))
            }
        }
    }

    // Shift/shift: every item proposing a shift on the same terminal in
    // the same state advances into the *same* goto target by
    // construction (goto() folds all such items into one kernel before
    // closure), so divergent targets signal a builder invariant failure
    // rather than a genuine grammar ambiguity. Divergent priorities are
    // the real conflict §4.4 step 5 names.
    let shift: Option<(u32, u16)> = if !shifts.is_empty() {
        let target = shifts[0].0;
        if shifts.iter().any(|&(t, _, _)| t != target) {
            return Err(MewaError::new(
                ErrorCode::ShiftShiftConflictInGrammarDef,
                format!("state {state} terminal {terminal}"),
            ));
        }
        let max_priority = shifts.iter().map(|&(_, p, _)| p).max().unwrap();
        let min_priority = shifts.iter().map(|&(_, p, _)| p).min().unwrap();
        if max_priority != min_priority {
            let productions: Vec<u32> = shifts.iter().map(|&(_, _, prod)| prod).collect();
            return Err(MewaError::new(
                ErrorCode::PriorityConflictInGrammarDef,
                format!("state {state} terminal {terminal} productions {productions:?}"),
            ));
        }
        Some((target, max_priority))
    } else {
        None
    };

    // Reduce/reduce: equal top priority among more than one candidate is
    // a warning, resolved by taking the lowest production index
    // deterministically; otherwise the strictly higher priority wins
    // silently (§4.4 step 6).
    let reduce: Option<(u16, u32, Option<u32>, u16, Associativity, u32, bool, bool)> = if !reduces.is_empty() {
        let max_priority = reduces.iter().map(|r| r.3).max().unwrap();
        let mut top: Vec<_> = reduces.iter().filter(|r| r.3 == max_priority).cloned().collect();
        top.sort_by_key(|r| r.5);
        if top.len() > 1 {
            warnings.push(Warning {
                code: ErrorCode::ReduceReduceConflictInGrammarDef,
                state,
                terminal: Some(terminal),
                productions: top.iter().map(|r| r.5).collect(),
            });
        }
        Some(top.into_iter().next().unwrap())
    } else {
        None
    };

    let action = match (shift, reduce) {
        (Some((target, _)), None) => Action::Shift(target),
        (None, Some((lhs, count, call, _, _, _, opens_scope, advances_step))) => {
            Action::Reduce { nonterminal: lhs, count, call, opens_scope, advances_step }
        }
        (None, None) => return Ok(()),
        (
            Some((target, shift_priority)),
            Some((lhs, count, call, reduce_priority, assoc, reduce_production, opens_scope, advances_step)),
        ) => {
            if shift_priority > reduce_priority {
                Action::Shift(target)
            } else if reduce_priority > shift_priority {
                Action::Reduce { nonterminal: lhs, count, call, opens_scope, advances_step }
            } else {
                match assoc {
                    Associativity::Left => Action::Reduce { nonterminal: lhs, count, call, opens_scope, advances_step },
                    Associativity::Right => Action::Shift(target),
                    Associativity::None => {
                        // No associativity to break the tie: documented
                        // policy (DESIGN.md) is to prefer the shift, the
                        // same default yacc-family tools apply, and to
                        // surface the ambiguity as a warning rather than
                        // deciding silently.
                        warnings.push(Warning {
                            code: ErrorCode::ShiftReduceConflictInGrammarDef,
                            state,
                            terminal: Some(terminal),
                            productions: vec![reduce_production],
                        });
                        Action::Shift(target)
                    }
                }
            }
        }
    };

    actions.insert((state, terminal), action);
    Ok(())
}
