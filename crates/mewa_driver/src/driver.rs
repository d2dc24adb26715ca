//! The shift/reduce driver loop (§4.5 "Driving a parse").
//!
//! The driver is generic over an opaque host value type `V` (§1, §9):
//! it never inspects what a constructor actually is, it only moves `V`s
//! around the parse stack and hands them to the host at shift and
//! reduce time. Scope and step bookkeeping is the one piece of semantic
//! behavior the core itself owns, because §4.5 ties it directly to the
//! `{}`/`>>` production markers rather than to anything host-specific.

use mewa_base::error::{ErrorCode, Location, MewaError, Result};
use mewa_base::{Scope, Step};
use mewa_lalr::{Action, CallEntry, ParserTables};

use crate::scanner::{LexerDef, Scanner};

/// The host hooks a driver run needs (§6 "Driver call protocol"): how to
/// turn a scanned terminal into a value, and how to invoke a production's
/// call with its reduced arguments.
pub trait Host<V> {
    /// Called on every shift of a non-keyword terminal — a token with
    /// its own declared pattern (§4.3). Bare keyword literals never
    /// reach this hook (§4.5: "if the token is not a bare keyword, also
    /// records the token's value in the host stack"), so a production's
    /// call only ever receives arguments for the RHS symbols that are
    /// non-terminals or value-carrying tokens.
    fn terminal_value(&mut self, terminal: u16, lexeme: &[u8], line: u32) -> Result<V>;

    /// Called on every reduce whose production names a call. `scope` is
    /// `Some` only for productions marked `{}` (§4.5); `step` is the
    /// step counter's value at the moment of reduction.
    fn call(&mut self, call: &CallEntry, args: Vec<V>, scope: Option<Scope>, step: Step) -> Result<V>;
}

/// One entry on the parse stack: the automaton state reached after
/// shifting or reducing onto it, the step counter's value at the
/// moment it entered the stack (the base a later `{}` reduce needs to
/// compute the scope it closes over — §4.5, mirrored in `AstNode`'s
/// `NodeScope::Range { base, len_delta }`), and its synthesized host
/// value. `value` is `None` for a bare-keyword shift (§4.5): the state
/// is still pushed so parsing proceeds, but the keyword contributes no
/// argument to the enclosing reduce.
struct StackEntry<V> {
    state: u32,
    value: Option<V>,
    step: Step,
}

/// Drives `tables` over source text, calling back into a [`Host`] at
/// every shift and reduce, and returns the synthesized value of the
/// accepted start symbol.
pub struct Driver<'a> {
    tables: &'a ParserTables,
    lexer: &'a LexerDef,
}

impl<'a> Driver<'a> {
    pub fn new(tables: &'a ParserTables, lexer: &'a LexerDef) -> Self {
        Driver { tables, lexer }
    }

    /// Parses `source` to completion, or the first `UnexpectedTokenNotOneOf`
    /// / lexer error encountered. `root` supplies the value carried by the
    /// driver's initial (pre-shift) stack entry — never observed by the
    /// host except as a reduce argument for an empty start production.
    pub fn parse<V, H: Host<V>>(&self, source: &str, host: &mut H, root: V) -> Result<V> {
        let mut scanner = Scanner::new(self.lexer, source);
        let mut stack: Vec<StackEntry<V>> = vec![StackEntry { state: 0, value: Some(root), step: 0 }];
        let mut step: Step = 0;

        let mut lookahead = self.next_terminal(&mut scanner)?;

        loop {
            let state = stack.last().expect("stack is never empty after initialization").state;
            let (terminal, lexeme, line) = &lookahead;
            match self.tables.action(state, *terminal) {
                Some(Action::Shift(target)) => {
                    let value = if self.lexer.is_keyword(*terminal) {
                        None
                    } else {
                        Some(host.terminal_value(*terminal, lexeme, *line)?)
                    };
                    stack.push(StackEntry { state: target, value, step });
                    lookahead = self.next_terminal(&mut scanner)?;
                }
                Some(Action::Reduce { nonterminal, count, call, opens_scope, advances_step }) => {
                    let base = stack.len().checked_sub(count as usize).ok_or_else(|| {
                        MewaError::bare(ErrorCode::LanguageAutomatonCorrupted)
                    })?;
                    let base_step = stack.get(base).map(|e| e.step).unwrap_or(step);
                    let popped = stack.split_off(base);
                    // Keyword-shifted frames carry no value (§4.5) and
                    // are dropped here rather than contributing a
                    // placeholder argument.
                    let args: Vec<V> = popped.into_iter().filter_map(|e| e.value).collect();

                    if advances_step {
                        step += 1;
                    }
                    let scope = if opens_scope { Some(Scope::new(base_step, step + 1)) } else { None };

                    let value = match call {
                        Some(call_idx) => {
                            let entry = self
                                .tables
                                .calls
                                .get(call_idx as usize)
                                .ok_or_else(|| MewaError::bare(ErrorCode::LanguageAutomatonCorrupted))?;
                            host.call(entry, args, scope, step)?
                        }
                        None => {
                            let mut args = args;
                            match args.pop() {
                                Some(only) => only,
                                None => return Err(MewaError::bare(ErrorCode::LanguageAutomatonCorrupted)),
                            }
                        }
                    };

                    let from_state = stack.last().expect("reduce never empties the stack").state;
                    let goto = self
                        .tables
                        .goto(from_state, nonterminal)
                        .ok_or_else(|| MewaError::bare(ErrorCode::LanguageAutomatonMissingGoto))?;
                    stack.push(StackEntry { state: goto, value: Some(value), step });
                }
                Some(Action::Accept) => {
                    if *terminal != self.tables.terminal_count {
                        return Err(MewaError::bare(ErrorCode::LanguageAutomatonUnexpectedAccept)
                            .at(Location::new(*line, None)));
                    }
                    return stack
                        .pop()
                        .expect("accepting stack holds the start value")
                        .value
                        .ok_or_else(|| MewaError::bare(ErrorCode::LanguageAutomatonCorrupted));
                }
                None => {
                    let admissible = self.tables.admissible_terminals(state);
                    let names = admissible.into_iter().map(|t| t.to_string()).collect::<Vec<_>>().join(",");
                    return Err(MewaError::new(ErrorCode::UnexpectedTokenNotOneOf, names)
                        .at(Location::new(*line, None)));
                }
            }
        }
    }

    fn next_terminal(&self, scanner: &mut Scanner) -> Result<(u16, Vec<u8>, u32)> {
        match scanner.next()? {
            Some(tok) => Ok((tok.terminal, tok.lexeme, tok.line)),
            None => Ok((self.tables.terminal_count, Vec::new(), 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mewa_grammar::parse_and_validate;
    use mewa_lalr::build;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Value {
        Leaf(String),
        Node(String, Vec<Value>),
        Unit,
    }

    struct RecordingHost;

    impl Host<Value> for RecordingHost {
        fn terminal_value(&mut self, _terminal: u16, lexeme: &[u8], _line: u32) -> Result<Value> {
            Ok(Value::Leaf(String::from_utf8_lossy(lexeme).into_owned()))
        }

        fn call(&mut self, call: &CallEntry, args: Vec<Value>, _scope: Option<Scope>, _step: Step) -> Result<Value> {
            Ok(Value::Node(call.function.clone(), args))
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
    fn drives_scenario_a_to_a_single_assign_node() {
        let grammar = parse_and_validate(SCENARIO_A).unwrap();
        let built = build(&grammar).unwrap();
        assert!(built.warnings.is_empty());
        let lexer = crate::scanner::LexerDef::compile(&grammar).unwrap();
        let driver = Driver::new(&built.tables, &lexer);
        let mut host = RecordingHost;

        // The keyword lexemes "=" and "*" shift but contribute no
        // argument (§4.5): `assign`'s args are just `V` and `E`,
        // `deref`'s is just `E`.
        let result = driver.parse("x = *y", &mut host, Value::Unit).unwrap();
        assert_eq!(
            result,
            Value::Node(
                "s".into(),
                vec![Value::Node(
                    "assign".into(),
                    vec![
                        Value::Node("var".into(), vec![Value::Leaf("x".into())]),
                        Value::Node(
                            "deref".into(),
                            vec![Value::Node("id".into(), vec![Value::Node("var".into(), vec![Value::Leaf("y".into())])])]
                        ),
                    ]
                )]
            )
        );
    }

    #[test]
    fn rejects_unexpected_token_with_admissible_list() {
        let grammar = parse_and_validate(SCENARIO_A).unwrap();
        let built = build(&grammar).unwrap();
        let lexer = crate::scanner::LexerDef::compile(&grammar).unwrap();
        let driver = Driver::new(&built.tables, &lexer);
        let mut host = RecordingHost;

        let err = driver.parse("x = = y", &mut host, Value::Unit).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedTokenNotOneOf);
    }
}
