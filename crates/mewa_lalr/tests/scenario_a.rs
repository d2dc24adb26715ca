//! Scenario A (§8): the classic pointer-assignment grammar from the
//! source tests. `S→N; N→V "=" E; N→E; E→V; V→IDENT; V→"*" E;` should
//! build a ten-state, conflict-free LALR(1) automaton.

use mewa_grammar::parse_and_validate;
use mewa_lalr::{build, Action};

const SCENARIO_A: &str = r#"
    S = N (s) ;
    N = V "=" E (assign) | E (expr) ;
    E = V (id) | "*" E (deref) ;
    V = IDENT (var) ;
"#;

#[test]
fn builds_ten_states_with_no_conflicts() {
    let grammar = parse_and_validate(SCENARIO_A).unwrap();
    let result = build(&grammar).unwrap();
    assert_eq!(result.tables.state_count, 10);
    assert!(result.warnings.is_empty(), "unexpected warnings: {:?}", result.warnings);
}

#[test]
fn accept_action_exists_on_eof() {
    let grammar = parse_and_validate(SCENARIO_A).unwrap();
    let result = build(&grammar).unwrap();
    let eof = result.tables.terminal_count;
    let has_accept = (0..result.tables.state_count)
        .any(|s| matches!(result.tables.action(s, eof), Some(Action::Accept)));
    assert!(has_accept, "no state accepts on eof");
}

#[test]
fn call_table_records_every_distinct_production_call() {
    let grammar = parse_and_validate(SCENARIO_A).unwrap();
    let result = build(&grammar).unwrap();
    let functions: std::collections::BTreeSet<&str> =
        result.tables.calls.iter().map(|c| c.function.as_str()).collect();
    assert_eq!(functions, ["assign", "deref", "expr", "id", "s", "var"].into_iter().collect());
}
