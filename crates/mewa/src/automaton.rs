//! [`Automaton`]: a grammar source file compiled all the way down to
//! LALR(1) tables and a scanner, ready to drive parses (§1 "system
//! overview": "grammar source -> [Lexer builder] / [Grammar parser] ->
//! [LALR(1) builder] -> action/goto tables + call table").
//!
//! This is the one compilation step a host runs once per grammar and
//! reuses across every source file it parses with that grammar.

use mewa_base::error::Result;
use mewa_driver::scanner::LexerDef;
use mewa_driver::{Driver, Host};
use mewa_grammar::{parse_and_validate, ResolvedGrammar};
use mewa_lalr::{build, ParserTables, Warning};

/// A grammar compiled to its LALR(1) tables and lexer definition (§1 "a
/// single file grammar -> single `Automaton` value", §9 "Global state").
///
/// Construction is the only place the three generator subsystems
/// (§4.3 grammar parser, §4.4 LALR(1) generator, the lexer builder they
/// share) run; everything downstream — [`Automaton::driver`], table
/// serialization via [`crate::document`] — only reads the result.
#[derive(Debug)]
pub struct Automaton {
    grammar: ResolvedGrammar,
    tables: ParserTables,
    lexer: LexerDef,
    warnings: Vec<Warning>,
}

impl Automaton {
    /// Parses, validates and builds LALR(1) tables for a grammar file's
    /// source text in one step. Fails on the first grammar-processing
    /// error (§7 "Input errors") or hard conflict (§4.4 step 6); soft
    /// conflicts are returned in [`Automaton::warnings`] rather than
    /// raised.
    pub fn compile(source: &str) -> Result<Self> {
        let grammar = parse_and_validate(source)?;
        let built = build(&grammar)?;
        let lexer = LexerDef::compile(&grammar)?;
        Ok(Automaton { grammar, tables: built.tables, lexer, warnings: built.warnings })
    }

    /// The validated grammar this automaton was built from (symbol
    /// tables, productions, lexer directives — §3 "Production").
    pub fn grammar(&self) -> &ResolvedGrammar {
        &self.grammar
    }

    /// The packed action/goto/call tables (§3 "Parser table").
    pub fn tables(&self) -> &ParserTables {
        &self.tables
    }

    /// Soft shift/reduce, reduce/reduce and associativity-tie conflicts
    /// resolved by priority heuristics rather than rejected (§7
    /// "Warnings").
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Builds a [`Driver`] borrowing this automaton's tables and lexer,
    /// ready to parse source text against a [`Host`] (§4.5).
    pub fn driver(&self) -> Driver<'_> {
        Driver::new(&self.tables, &self.lexer)
    }

    /// Parses `source` against `host` in one call, threading `root`
    /// through as the driver's initial stack value (§4.5, §6 "Driver
    /// call protocol").
    pub fn parse<V, H: Host<V>>(&self, source: &str, host: &mut H, root: V) -> Result<V> {
        self.driver().parse(source, host, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mewa_base::{Scope, Step};
    use mewa_lalr::CallEntry;

    struct CountingHost(u32);

    impl Host<u32> for CountingHost {
        fn terminal_value(&mut self, _terminal: u16, _lexeme: &[u8], _line: u32) -> Result<u32> {
            self.0 += 1;
            Ok(self.0)
        }
        fn call(&mut self, _call: &CallEntry, args: Vec<u32>, _scope: Option<Scope>, _step: Step) -> Result<u32> {
            Ok(args.iter().sum())
        }
    }

    const SCENARIO_A: &str = r#"
        IDENT : "[a-zA-Z_][a-zA-Z_0-9]*" ;
        %IGNORE "[ \t\n]+" ;
        S = N (s) ;
        N = V "=" E (assign) | E (expr) ;
        E = V (id) | "*" E (deref) ;
        V = IDENT (var) ;
    "#;

    #[test]
    fn compiles_scenario_a_with_no_warnings() {
        let automaton = Automaton::compile(SCENARIO_A).unwrap();
        assert_eq!(automaton.tables().state_count, 10);
        assert!(automaton.warnings().is_empty());
    }

    #[test]
    fn parses_end_to_end_through_the_facade() {
        let automaton = Automaton::compile(SCENARIO_A).unwrap();
        let mut host = CountingHost(0);
        let result = automaton.parse("x = *y", &mut host, 0).unwrap();
        assert!(result > 0);
    }

    #[test]
    fn rejects_grammar_with_unknown_identifier() {
        let err = Automaton::compile("S = UNDECLARED (leaf) ;").unwrap_err();
        assert_eq!(err.code, mewa_base::error::ErrorCode::UnknownIdentifier);
    }
}
