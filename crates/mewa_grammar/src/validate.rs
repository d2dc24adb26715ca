//! Post-parse validation (§4.3): symbol resolution, start-symbol
//! uniqueness, reachability, and the bit-width budgets that do not
//! depend on the eventual automaton state count (§3).

use crate::ast::GrammarFile;
use crate::resolved::{ResolvedGrammar, ResolvedProduction, SymbolRef};
use mewa_base::error::{ErrorCode, Location, MewaError, Result};
use std::collections::{HashSet, VecDeque};

const MAX_NONTERMINALS: usize = 1 << 10;
const MAX_TERMINALS: usize = 1 << 10;
const MAX_PRODUCTION_LENGTH: usize = 1 << 5;

fn err(code: ErrorCode, arg: impl Into<String>, line: u32) -> MewaError {
    MewaError::new(code, arg).at(Location::new(line, None))
}

/// Validates and resolves a parsed [`GrammarFile`] into a
/// [`ResolvedGrammar`].
pub fn validate(file: GrammarFile) -> Result<ResolvedGrammar> {
    if file.productions.is_empty() {
        return Err(MewaError::bare(ErrorCode::GrammarSyntaxError));
    }

    // Non-terminals are every distinct LHS, in first-definition order.
    let mut nonterminal_index: Vec<String> = Vec::new();
    let mut nonterminal_lookup: std::collections::HashMap<&str, u16> = std::collections::HashMap::new();
    for p in &file.productions {
        if !nonterminal_lookup.contains_key(p.lhs.as_str()) {
            let idx = nonterminal_index.len() as u16;
            nonterminal_lookup.insert(&p.lhs, idx);
            nonterminal_index.push(p.lhs.clone());
        }
    }
    if nonterminal_index.len() > MAX_NONTERMINALS {
        return Err(MewaError::new(ErrorCode::ComplexityBudgetExceeded, "too many non-terminals"));
    }

    // Terminals: declared tokens first, then implicit keyword literals.
    let mut terminal_index: Vec<String> = file.tokens.iter().map(|t| t.name.clone()).collect();
    let mut terminal_lookup: std::collections::HashMap<String, u16> =
        terminal_index.iter().enumerate().map(|(i, n)| (n.clone(), i as u16)).collect();
    for kw in &file.keywords {
        if !terminal_lookup.contains_key(kw) {
            let idx = terminal_index.len() as u16;
            terminal_lookup.insert(kw.clone(), idx);
            terminal_index.push(kw.clone());
        }
    }
    if terminal_index.len() > MAX_TERMINALS {
        return Err(MewaError::new(ErrorCode::ComplexityBudgetExceeded, "too many terminals"));
    }

    let start_name = file.productions[0].lhs.clone();
    let start_symbol = nonterminal_lookup[start_name.as_str()];
    let start_production_count = file.productions.iter().filter(|p| p.lhs == start_name).count();
    if start_production_count != 1 {
        return Err(MewaError::new(ErrorCode::DuplicateStartSymbol, start_name.clone()));
    }

    let mut productions = Vec::with_capacity(file.productions.len());
    for p in &file.productions {
        if p.rhs.len() > MAX_PRODUCTION_LENGTH {
            return Err(err(ErrorCode::ComplexityBudgetExceeded, p.lhs.clone(), p.line));
        }
        let mut rhs = Vec::with_capacity(p.rhs.len());
        for sym in &p.rhs {
            let resolved = match sym {
                crate::ast::RhsSymbol::Literal(lit) => SymbolRef::Terminal(terminal_lookup[lit]),
                crate::ast::RhsSymbol::Name(name) => {
                    if let Some(&nt) = nonterminal_lookup.get(name.as_str()) {
                        SymbolRef::NonTerminal(nt)
                    } else if let Some(&t) = terminal_lookup.get(name.as_str()) {
                        SymbolRef::Terminal(t)
                    } else {
                        return Err(err(ErrorCode::UnknownIdentifier, name.clone(), p.line));
                    }
                }
            };
            rhs.push(resolved);
        }
        productions.push(ResolvedProduction {
            lhs: nonterminal_lookup[p.lhs.as_str()],
            rhs,
            priority: p.priority,
            assoc: p.assoc,
            call: p.call.clone(),
            opens_scope: p.opens_scope,
            advances_step: p.advances_step,
            line: p.line,
        });
    }

    // Also require every RHS name that resolved to a non-terminal to
    // actually have its own production set (it always does here, since
    // resolution only assigns `NonTerminal` for names present in
    // `nonterminal_lookup`), and check that the start symbol never
    // recurses into its own right-hand side anywhere in the grammar.
    for p in &productions {
        if p.rhs.iter().any(|s| matches!(s, SymbolRef::NonTerminal(nt) if *nt == start_symbol)) {
            return Err(err(ErrorCode::DuplicateStartSymbol, start_name.clone(), p.line));
        }
    }

    check_reachable(&nonterminal_index, &productions, start_symbol)?;

    Ok(ResolvedGrammar {
        nonterminals: nonterminal_index,
        terminals: terminal_index,
        productions,
        start_symbol,
        tokens: file.tokens,
        keywords: file.keywords,
        ignores: file.ignores,
        bad: file.bad,
        comments: file.comments,
        language: file.language,
        typesystem: file.typesystem,
    })
}

fn check_reachable(nonterminals: &[String], productions: &[ResolvedProduction], start: u16) -> Result<()> {
    let mut reached: HashSet<u16> = HashSet::new();
    reached.insert(start);
    let mut queue = VecDeque::from([start]);
    while let Some(nt) = queue.pop_front() {
        for p in productions.iter().filter(|p| p.lhs == nt) {
            for sym in &p.rhs {
                if let SymbolRef::NonTerminal(next) = sym {
                    if reached.insert(*next) {
                        queue.push_back(*next);
                    }
                }
            }
        }
    }
    for (idx, name) in nonterminals.iter().enumerate() {
        if !reached.contains(&(idx as u16)) {
            return Err(MewaError::new(ErrorCode::UnreachableNonTerminal, name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn validate_src(src: &str) -> Result<ResolvedGrammar> {
        validate(parse(src).unwrap())
    }

    #[test]
    fn resolves_scenario_a_grammar() {
        let g = validate_src(
            r#"
            S = N (s) ;
            N = V "=" E (assign) | E (expr) ;
            E = V (id) | "*" E (deref) ;
            V = IDENT (var) ;
            "#,
        )
        .unwrap();
        assert_eq!(g.start_symbol, 0);
        assert_eq!(g.nonterminals[0], "S");
        assert!(g.terminals.contains(&"IDENT".to_string()));
        assert!(g.terminals.contains(&"=".to_string()));
        assert!(g.terminals.contains(&"*".to_string()));
    }

    #[test]
    fn rejects_unknown_identifier() {
        let err = validate_src(r#"S = UNDECLARED (x) ;"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownIdentifier);
    }

    #[test]
    fn rejects_start_symbol_on_rhs() {
        let err = validate_src(
            r#"
            S = A (a) ;
            A = S (loop) | "x" (leaf) ;
            "#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateStartSymbol);
    }

    #[test]
    fn rejects_duplicate_start_symbol_definitions() {
        let err = validate_src(
            r#"
            S = "a" (a) ;
            S = "b" (b) ;
            "#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateStartSymbol);
    }

    #[test]
    fn rejects_unreachable_nonterminal() {
        let err = validate_src(
            r#"
            S = "a" (a) ;
            Dead = "b" (b) ;
            "#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnreachableNonTerminal);
    }

    #[test]
    fn rejects_production_exceeding_length_budget() {
        let mut src = String::from("S = ");
        for _ in 0..40 {
            src.push_str("\"a\" ");
        }
        src.push_str("(x) ;");
        let err = validate_src(&src).unwrap_err();
        assert_eq!(err.code, ErrorCode::ComplexityBudgetExceeded);
    }
}
