//! Recursive-descent parser for the grammar file format (§4.3), grounded
//! on the state machine in `original_source/src/automaton_parser.cpp`'s
//! `parseLanguageDef`, re-expressed as a small parser-combinator-style
//! recursive descent instead of a single flat state enum — the same
//! transformation `logicaffeine_language::parser::common` applies to its
//! own hand-written grammar.

use crate::ast::{Associativity, Call, CallArg, CommentDef, GrammarFile, Production, RhsSymbol, TokenDef};
use crate::lexer::{Lexer, TokKind, Token};
use mewa_base::error::{ErrorCode, Location, MewaError, Result};

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
}

fn err(code: ErrorCode, arg: impl Into<String>, line: u32) -> MewaError {
    MewaError::new(code, arg).at(Location::new(line, None))
}

impl<'src> Parser<'src> {
    pub fn new(src: &'src str) -> Result<Self> {
        let mut lexer = Lexer::new(src);
        let current = lexer.next()?;
        Ok(Parser { lexer, current })
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, kind: &TokKind) -> Result<Token> {
        if &self.current.kind == kind {
            self.advance()
        } else {
            Err(err(
                ErrorCode::GrammarSyntaxError,
                format!("expected {kind}, found {}", self.current.kind),
                self.current.line,
            ))
        }
    }

    fn ident_text(&mut self) -> Result<(String, u32)> {
        let line = self.current.line;
        match &self.current.kind {
            TokKind::Ident(s) => {
                let s = s.clone();
                self.advance()?;
                Ok((s, line))
            }
            other => Err(err(ErrorCode::GrammarSyntaxError, format!("expected identifier, found {other}"), line)),
        }
    }

    /// A call name or argument accepts either a plain `Ident` or a
    /// qualified `Call` token (§4.3: "references and literals are
    /// distinguished in the call table").
    fn call_name_text(&mut self) -> Result<String> {
        let line = self.current.line;
        match &self.current.kind {
            TokKind::Ident(s) | TokKind::Call(s) => {
                let s = s.clone();
                self.advance()?;
                Ok(s)
            }
            other => Err(err(ErrorCode::GrammarSyntaxError, format!("expected call name, found {other}"), line)),
        }
    }

    pub fn parse(mut self) -> Result<GrammarFile> {
        let mut file = GrammarFile::default();
        while self.current.kind != TokKind::Eof {
            match &self.current.kind {
                TokKind::Percent => self.parse_directive(&mut file)?,
                TokKind::Ident(_) => self.parse_rule(&mut file)?,
                other => {
                    return Err(err(
                        ErrorCode::GrammarSyntaxError,
                        format!("unexpected {other} at top level"),
                        self.current.line,
                    ))
                }
            }
        }
        Ok(file)
    }

    fn quoted_string(&mut self) -> Result<(String, u32)> {
        let line = self.current.line;
        match &self.current.kind {
            TokKind::QuotedString(s) => {
                let s = s.clone();
                self.advance()?;
                Ok((s, line))
            }
            other => Err(err(ErrorCode::GrammarSyntaxError, format!("expected a quoted string, found {other}"), line)),
        }
    }

    fn parse_directive(&mut self, file: &mut GrammarFile) -> Result<()> {
        let line = self.current.line;
        self.expect(&TokKind::Percent)?;
        let (name, _) = self.ident_text()?;
        let mut args = Vec::new();
        while !matches!(self.current.kind, TokKind::Semicolon | TokKind::Eof) {
            let (s, _) = self.quoted_string()?;
            args.push(s);
        }
        self.expect(&TokKind::Semicolon)?;

        match name.to_ascii_uppercase().as_str() {
            "LANGUAGE" => {
                file.language = Some(one_arg(&name, args, line)?);
            }
            "TYPESYSTEM" => {
                file.typesystem = Some(one_arg(&name, args, line)?);
            }
            "IGNORE" => {
                file.ignores.push(one_arg(&name, args, line)?);
            }
            "BAD" => {
                file.bad.push(one_arg(&name, args, line)?);
            }
            "COMMENT" => match args.len() {
                1 => file.comments.push(CommentDef::EndOfLine { open: args.remove(0) }),
                2 => file.comments.push(CommentDef::Bracket { open: args.remove(0), close: args.remove(0) }),
                _ => return Err(err(ErrorCode::WrongArgumentCount, name, line)),
            },
            _ => return Err(err(ErrorCode::GrammarSyntaxError, format!("unknown directive %{name}"), line)),
        }
        Ok(())
    }

    /// Dispatches on whether `NAME` is followed by `:` (a token
    /// definition) or `=`/`→`/`/` (a production, possibly with a
    /// priority clause first).
    fn parse_rule(&mut self, file: &mut GrammarFile) -> Result<()> {
        let (name, line) = self.ident_text()?;

        if self.current.kind == TokKind::Colon {
            self.advance()?;
            let (pattern, _) = self.quoted_string()?;
            let capture_index = match &self.current.kind {
                TokKind::Number(n) => {
                    let n = *n as u32;
                    self.advance()?;
                    n
                }
                _ => 0,
            };
            self.expect(&TokKind::Semicolon)?;
            file.tokens.push(TokenDef { name, pattern, capture_index, line });
            return Ok(());
        }

        let (priority, assoc) = self.parse_priority_clause()?;

        loop {
            match &self.current.kind {
                TokKind::Equal | TokKind::Arrow => {}
                other => {
                    return Err(err(
                        ErrorCode::GrammarSyntaxError,
                        format!("expected `=` or `→`, found {other}"),
                        self.current.line,
                    ))
                }
            }
            self.advance()?;
            let production = self.parse_production_body(file, name.clone(), priority, assoc, line)?;
            file.productions.push(production);

            match &self.current.kind {
                TokKind::Pipe => {
                    self.advance()?;
                    continue;
                }
                TokKind::Semicolon => {
                    self.advance()?;
                    return Ok(());
                }
                other => {
                    return Err(err(
                        ErrorCode::GrammarSyntaxError,
                        format!("expected `|` or `;`, found {other}"),
                        self.current.line,
                    ))
                }
            }
        }
    }

    fn parse_priority_clause(&mut self) -> Result<(u16, Associativity)> {
        if self.current.kind != TokKind::Slash {
            return Ok((0, Associativity::None));
        }
        self.advance()?;
        let line = self.current.line;
        match self.current.kind.clone() {
            TokKind::Priority(p, a) => {
                self.advance()?;
                Ok((p, a))
            }
            TokKind::Number(n) => {
                self.advance()?;
                Ok((n as u16, Associativity::None))
            }
            other => Err(err(ErrorCode::GrammarSyntaxError, format!("expected a priority, found {other}"), line)),
        }
    }

    /// Parses one `RHS... [{}] [>>] [( call [arg] )]` alternative, after
    /// the leading `=`/`→`/`|` has already been consumed.
    fn parse_production_body(
        &mut self,
        file: &mut GrammarFile,
        lhs: String,
        priority: u16,
        assoc: Associativity,
        line: u32,
    ) -> Result<Production> {
        let mut rhs = Vec::new();
        let mut opens_scope = false;
        let mut advances_step = false;

        if self.current.kind == TokKind::Epsilon {
            self.advance()?;
        } else {
            loop {
                match self.current.kind.clone() {
                    TokKind::Ident(name) => {
                        self.advance()?;
                        rhs.push(RhsSymbol::Name(name));
                    }
                    TokKind::QuotedString(lit) => {
                        self.advance()?;
                        if !file.keywords.contains(&lit) {
                            file.keywords.push(lit.clone());
                        }
                        rhs.push(RhsSymbol::Literal(lit));
                    }
                    TokKind::ScopeOpen => {
                        self.advance()?;
                        opens_scope = true;
                    }
                    TokKind::StepAdvance => {
                        self.advance()?;
                        advances_step = true;
                    }
                    _ => break,
                }
            }
        }

        let call = if self.current.kind == TokKind::LParen {
            self.advance()?;
            let function = self.call_name_text()?;
            let arg = match self.current.kind.clone() {
                TokKind::RParen => None,
                TokKind::QuotedString(s) => {
                    self.advance()?;
                    Some(CallArg::Literal(s))
                }
                TokKind::Number(n) => {
                    self.advance()?;
                    Some(CallArg::Int(n))
                }
                TokKind::Ident(s) | TokKind::Call(s) => {
                    self.advance()?;
                    Some(CallArg::Reference(s))
                }
                other => {
                    return Err(err(ErrorCode::GrammarSyntaxError, format!("unexpected call argument {other}"), self.current.line))
                }
            };
            self.expect(&TokKind::RParen)?;
            Some(Call { function, arg })
        } else {
            None
        };

        Ok(Production { lhs, rhs, priority, assoc, call, opens_scope, advances_step, line })
    }
}

fn one_arg(name: &str, mut args: Vec<String>, line: u32) -> Result<String> {
    if args.len() != 1 {
        return Err(err(ErrorCode::WrongArgumentCount, name.to_string(), line));
    }
    Ok(args.remove(0))
}

pub fn parse(src: &str) -> Result<GrammarFile> {
    Parser::new(src)?.parse()
}
