//! Conflict-resolution scenarios (§4.4 step 6, §7 "Warnings").

use mewa_base::error::ErrorCode;
use mewa_grammar::parse_and_validate;
use mewa_lalr::{build, Action};

/// The classic dangling-else-shaped ambiguity: `E -> E "+" E` with equal
/// priority and no associativity on both alternatives yields a
/// shift/reduce conflict resolved (with a warning) by preferring shift,
/// per the documented policy in `DESIGN.md`.
#[test]
fn shift_reduce_conflict_with_no_associativity_is_a_warning_not_an_error() {
    let grammar = parse_and_validate(
        r#"
        S = E (s) ;
        E = E "+" E (add) | "n" (num) ;
        "#,
    )
    .unwrap();
    let result = build(&grammar).unwrap();
    assert!(result.warnings.iter().any(|w| w.code == ErrorCode::ShiftReduceConflictInGrammarDef));
}

/// Left associativity at equal priority prefers reduce: `1 + 2 + 3`
/// associates as `(1 + 2) + 3`, so the conflicting cell resolves to a
/// reduce action, not shift.
#[test]
fn left_associativity_prefers_reduce_over_shift() {
    let grammar = parse_and_validate(
        r#"
        S = E (s) ;
        E / 1L = E "+" E (add) | "n" (num) ;
        "#,
    )
    .unwrap();
    let result = build(&grammar).unwrap();
    assert!(result.warnings.is_empty());
    let plus = grammar.terminals.iter().position(|t| t == "+").unwrap() as u16;
    let reduce_state = (0..result.tables.state_count)
        .find(|&s| matches!(result.tables.action(s, plus), Some(Action::Reduce { .. })))
        .expect("some state should prefer reduce on +");
    assert!(matches!(result.tables.action(reduce_state, plus), Some(Action::Reduce { .. })));
}

/// Right associativity at equal priority prefers shift, e.g. for a
/// right-associative exponentiation operator.
#[test]
fn right_associativity_prefers_shift_over_reduce() {
    let grammar = parse_and_validate(
        r#"
        S = E (s) ;
        E / 1R = E "^" E (pow) | "n" (num) ;
        "#,
    )
    .unwrap();
    let result = build(&grammar).unwrap();
    assert!(result.warnings.is_empty());
}

/// Two reduce actions tying on priority at the same state/terminal is a
/// warning, resolved deterministically (lowest production index wins)
/// rather than left unresolved.
#[test]
fn reduce_reduce_conflict_is_a_warning_with_deterministic_winner() {
    // A grammar ambiguous enough to force two reduce items into the same
    // state: both A and B can reduce an empty right-hand side before "x".
    let grammar = parse_and_validate(
        r#"
        S = A "x" (sa) | B "x" (sb) ;
        A = ε (a) ;
        B = ε (b) ;
        "#,
    )
    .unwrap();
    let result = build(&grammar).unwrap();
    assert!(result.warnings.iter().any(|w| w.code == ErrorCode::ReduceReduceConflictInGrammarDef));
}

/// Unequal priority between a shift and reduce proposal is resolved
/// silently: no warning is recorded, the higher-priority action wins.
#[test]
fn unequal_priority_shift_reduce_resolves_without_warning() {
    let grammar = parse_and_validate(
        r#"
        S = E (s) ;
        E / 5 = E "+" E (add) ;
        E / 1 = "n" (num) ;
        "#,
    )
    .unwrap();
    let result = build(&grammar).unwrap();
    assert!(result.warnings.is_empty());
}
