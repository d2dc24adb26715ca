//! The self-describing emitted-tables document (§6 "Emitted tables
//! format"): "a self-describing structured document whose top level is a
//! map with keys `language`, `typesystem`, `lexer`, `action`, `gto`,
//! `call`, `nonterminal`".
//!
//! This is the one place in the workspace that reaches for `serde` — the
//! core crates pass [`mewa_lalr::ParserTables`] and
//! [`mewa_grammar::ResolvedGrammar`] around as plain Rust values; a host
//! that wants the wire format described in §6 (to hand to a scripting
//! embedding, or to cache tables across runs) converts through
//! [`TableDocument::from_automaton`] instead. File I/O for that document
//! is a host responsibility (§1); this module only builds and parses the
//! in-memory value.

use serde::{Deserialize, Serialize};

use mewa_grammar::{CallArg, CommentDef};
use mewa_lalr::Action;

use crate::Automaton;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionDoc {
    pub state: u32,
    pub terminal: u16,
    pub kind: ActionKindDoc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKindDoc {
    Shift { target: u32 },
    Reduce { nonterminal: u16, count: u32, call: Option<u32>, opens_scope: bool, advances_step: bool },
    Accept,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GotoDoc {
    pub state: u32,
    pub nonterminal: u16,
    pub target: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallArgDoc {
    pub kind: &'static str,
    pub value: String,
}

impl From<&CallArg> for CallArgDoc {
    fn from(arg: &CallArg) -> Self {
        match arg {
            CallArg::Literal(s) => CallArgDoc { kind: "literal", value: s.clone() },
            CallArg::Reference(s) => CallArgDoc { kind: "reference", value: s.clone() },
            CallArg::Int(i) => CallArgDoc { kind: "int", value: i.to_string() },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallDoc {
    pub function: String,
    pub arg: Option<CallArgDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenDoc {
    pub name: String,
    pub pattern: String,
    pub capture_index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommentDoc {
    EndOfLine { open: String },
    Bracket { open: String, close: String },
}

impl From<&CommentDef> for CommentDoc {
    fn from(c: &CommentDef) -> Self {
        match c {
            CommentDef::EndOfLine { open } => CommentDoc::EndOfLine { open: open.clone() },
            CommentDef::Bracket { open, close } => CommentDoc::Bracket { open: open.clone(), close: close.clone() },
        }
    }
}

/// §6 "`lexer` enumerates, by class, `keyword` literals, named `token`
/// definitions, `ignore` patterns, `bad` lexems and `comment` brackets".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LexerDoc {
    pub keyword: Vec<String>,
    pub token: Vec<TokenDoc>,
    pub ignore: Vec<String>,
    pub bad: Vec<String>,
    pub comment: Vec<CommentDoc>,
}

/// The structured document §6 describes, self-contained enough for a
/// host to reload a compiled grammar without re-running the generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableDocument {
    pub language: Option<String>,
    pub typesystem: Option<String>,
    pub lexer: LexerDoc,
    pub action: Vec<ActionDoc>,
    pub gto: Vec<GotoDoc>,
    pub call: Vec<CallDoc>,
    pub nonterminal: Vec<String>,
}

impl TableDocument {
    /// Builds the emitted-tables document from a compiled [`Automaton`].
    pub fn from_automaton(automaton: &Automaton) -> Self {
        let grammar = automaton.grammar();
        let tables = automaton.tables();

        let mut action: Vec<ActionDoc> = tables
            .actions
            .iter()
            .map(|(&(state, terminal), act)| ActionDoc {
                state,
                terminal,
                kind: match *act {
                    Action::Shift(target) => ActionKindDoc::Shift { target },
                    Action::Reduce { nonterminal, count, call, opens_scope, advances_step } => {
                        ActionKindDoc::Reduce { nonterminal, count, call, opens_scope, advances_step }
                    }
                    Action::Accept => ActionKindDoc::Accept,
                },
            })
            .collect();
        action.sort_by_key(|a| (a.state, a.terminal));

        let mut gto: Vec<GotoDoc> = tables
            .gotos
            .iter()
            .map(|(&(state, nonterminal), &target)| GotoDoc { state, nonterminal, target })
            .collect();
        gto.sort_by_key(|g| (g.state, g.nonterminal));

        let call = tables
            .calls
            .iter()
            .map(|c| CallDoc { function: c.function.clone(), arg: c.arg.as_ref().map(CallArgDoc::from) })
            .collect();

        TableDocument {
            language: grammar.language.clone(),
            typesystem: grammar.typesystem.clone(),
            lexer: LexerDoc {
                keyword: grammar.keywords.clone(),
                token: grammar
                    .tokens
                    .iter()
                    .map(|t| TokenDoc { name: t.name.clone(), pattern: t.pattern.clone(), capture_index: t.capture_index })
                    .collect(),
                ignore: grammar.ignores.clone(),
                bad: grammar.bad.clone(),
                comment: grammar.comments.iter().map(CommentDoc::from).collect(),
            },
            action,
            gto,
            call,
            nonterminal: grammar.nonterminals.clone(),
        }
    }

    /// Serializes the document to the JSON rendering of §6's structured
    /// format.
    pub fn to_json(&self) -> mewa_base::error::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| mewa_base::error::MewaError::new(mewa_base::error::ErrorCode::LogicError, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_A: &str = r#"
        IDENT : "[a-zA-Z_][a-zA-Z_0-9]*" ;
        %LANGUAGE "Mini" ;
        %IGNORE "[ \t\n]+" ;
        S = N (s) ;
        N = V "=" E (assign) | E (expr) ;
        E = V (id) | "*" E (deref) ;
        V = IDENT (var) ;
    "#;

    #[test]
    fn document_round_trips_through_json() {
        let automaton = Automaton::compile(SCENARIO_A).unwrap();
        let doc = TableDocument::from_automaton(&automaton);
        assert_eq!(doc.language.as_deref(), Some("Mini"));
        assert_eq!(doc.nonterminal.len(), automaton.grammar().nonterminal_count());

        let json = doc.to_json().unwrap();
        let parsed: TableDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn every_action_cell_in_the_tables_appears_in_the_document() {
        let automaton = Automaton::compile(SCENARIO_A).unwrap();
        let doc = TableDocument::from_automaton(&automaton);
        assert_eq!(doc.action.len(), automaton.tables().actions.len());
        assert_eq!(doc.gto.len(), automaton.tables().gotos.len());
    }
}
