//! Lexer for the grammar-file format itself (§4.3, §6 "Grammar file
//! format").
//!
//! This is a small hand-written scanner, not the regex-driven lexer the
//! grammar *describes* (that one is [`mewa_driver`]'s concern, built from
//! the directives this crate parses). The grammar file's own syntax is
//! fixed and small enough that a hand-rolled scanner is the simplest
//! correct thing, mirroring how `logicaffeine-language`'s `LineLexer`
//! hand-scans structural tokens before handing content to a second stage.

use mewa_base::error::{ErrorCode, Location, MewaError, Result};
use std::fmt;

/// One lexical token of the grammar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokKind {
    /// `[a-zA-Z_][a-zA-Z_0-9]*`, also used for plain call function names.
    Ident(String),
    /// `-?[a-zA-Z_][.:a-zA-Z_0-9]*` — a qualified call name/argument
    /// reference (e.g. `ns.Func` or `-Neg`). A bare `Ident` is always
    /// also accepted wherever a `Call` is.
    Call(String),
    /// `[0-9]+`
    Number(i64),
    /// `[0-9]+[LR]` — a priority with attached associativity suffix.
    Priority(u16, crate::ast::Associativity),
    /// A double- or single-quoted string, already unescaped.
    QuotedString(String),
    Percent,
    Slash,
    Equal,
    /// `→`, an alternate spelling of `Equal`.
    Arrow,
    Colon,
    Semicolon,
    /// `ε`, marks an explicitly empty right-hand side.
    Epsilon,
    LParen,
    RParen,
    Pipe,
    /// `{}`, a scope-opening marker on a production (§4.5).
    ScopeOpen,
    /// `>>`, a step-advance marker on a production (§4.5).
    StepAdvance,
    Eof,
}

impl fmt::Display for TokKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokKind::Ident(s) => write!(f, "identifier `{s}`"),
            TokKind::Call(s) => write!(f, "call name `{s}`"),
            TokKind::Number(n) => write!(f, "number `{n}`"),
            TokKind::Priority(p, a) => write!(f, "priority `{p}{a:?}`"),
            TokKind::QuotedString(s) => write!(f, "string \"{s}\""),
            TokKind::Percent => write!(f, "`%`"),
            TokKind::Slash => write!(f, "`/`"),
            TokKind::Equal => write!(f, "`=`"),
            TokKind::Arrow => write!(f, "`→`"),
            TokKind::Colon => write!(f, "`:`"),
            TokKind::Semicolon => write!(f, "`;`"),
            TokKind::Epsilon => write!(f, "`ε`"),
            TokKind::LParen => write!(f, "`(`"),
            TokKind::RParen => write!(f, "`)`"),
            TokKind::Pipe => write!(f, "`|`"),
            TokKind::ScopeOpen => write!(f, "`{{}}`"),
            TokKind::StepAdvance => write!(f, "`>>`"),
            TokKind::Eof => write!(f, "end of file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokKind,
    pub line: u32,
}

pub struct Lexer<'src> {
    src: &'src [u8],
    pos: usize,
    line: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Lexer { src: src.as_bytes(), pos: 0, line: 1 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.bump();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.bump();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            None => {
                                return Err(MewaError::bare(ErrorCode::GrammarSyntaxError)
                                    .at(Location::new(self.line, None)))
                            }
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            _ => {
                                self.bump();
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_quoted(&mut self, quote: u8) -> Result<String> {
        let line = self.line;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some(b'\n') => {
                    return Err(MewaError::bare(ErrorCode::GrammarSyntaxError)
                        .at(Location::new(line, None)))
                }
                Some(b'\\') => match self.bump() {
                    Some(c) => out.push(c as char),
                    None => {
                        return Err(MewaError::bare(ErrorCode::GrammarSyntaxError)
                            .at(Location::new(line, None)))
                    }
                },
                Some(c) if c == quote => break,
                Some(c) => out.push(c as char),
            }
        }
        Ok(out)
    }

    fn is_ident_start(c: u8) -> bool {
        c.is_ascii_alphabetic() || c == b'_'
    }
    fn is_ident_cont(c: u8) -> bool {
        c.is_ascii_alphanumeric() || c == b'_'
    }

    /// Reads an identifier-like token, upgrading it to [`TokKind::Call`]
    /// if it contains `.`/`:` separators or an optional leading `-`.
    fn read_ident_or_call(&mut self) -> TokKind {
        let start = self.pos;
        let negated = self.peek() == Some(b'-') && self.peek_at(1).is_some_and(Self::is_ident_start);
        if negated {
            self.bump();
        }
        while let Some(c) = self.peek() {
            if Self::is_ident_cont(c) {
                self.bump();
            } else if (c == b'.' || c == b':') && self.peek_at(1).is_some_and(Self::is_ident_cont) {
                self.bump();
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap().to_string();
        if negated || text.contains('.') || text.contains(':') {
            TokKind::Call(text)
        } else {
            TokKind::Ident(text)
        }
    }

    fn read_number_or_priority(&mut self) -> Result<TokKind> {
        let start = self.pos;
        let line = self.line;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        let digits = std::str::from_utf8(&self.src[start..self.pos]).unwrap();
        let value: i64 = digits
            .parse()
            .map_err(|_| MewaError::new(ErrorCode::GrammarSyntaxError, digits).at(Location::new(line, None)))?;
        match self.peek() {
            Some(b'L') => {
                self.bump();
                Ok(TokKind::Priority(value as u16, crate::ast::Associativity::Left))
            }
            Some(b'R') => {
                self.bump();
                Ok(TokKind::Priority(value as u16, crate::ast::Associativity::Right))
            }
            _ => Ok(TokKind::Number(value)),
        }
    }

    pub fn next(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let line = self.line;
        let Some(c) = self.peek() else {
            return Ok(Token { kind: TokKind::Eof, line });
        };
        let kind = match c {
            b'"' => TokKind::QuotedString(self.read_quoted(b'"')?),
            b'\'' => TokKind::QuotedString(self.read_quoted(b'\'')?),
            b'%' => {
                self.bump();
                TokKind::Percent
            }
            b'/' => {
                self.bump();
                TokKind::Slash
            }
            b'=' => {
                self.bump();
                TokKind::Equal
            }
            b':' => {
                self.bump();
                TokKind::Colon
            }
            b';' => {
                self.bump();
                TokKind::Semicolon
            }
            b'(' => {
                self.bump();
                TokKind::LParen
            }
            b')' => {
                self.bump();
                TokKind::RParen
            }
            b'|' => {
                self.bump();
                TokKind::Pipe
            }
            b'{' if self.peek_at(1) == Some(b'}') => {
                self.bump();
                self.bump();
                TokKind::ScopeOpen
            }
            b'>' if self.peek_at(1) == Some(b'>') => {
                self.bump();
                self.bump();
                TokKind::StepAdvance
            }
            c if Self::is_ident_start(c) || c == b'-' => self.read_ident_or_call(),
            c if c.is_ascii_digit() => self.read_number_or_priority()?,
            _ => {
                // Multi-byte UTF-8: check for the non-ASCII literal tokens
                // `→` (U+2192) and `ε` (U+03B5) before failing.
                let rest = std::str::from_utf8(&self.src[self.pos..]).unwrap_or("");
                if rest.starts_with('→') {
                    self.pos += '→'.len_utf8();
                    TokKind::Arrow
                } else if rest.starts_with('ε') {
                    self.pos += 'ε'.len_utf8();
                    TokKind::Epsilon
                } else {
                    return Err(MewaError::new(ErrorCode::BadCharacter, (c as char).to_string())
                        .at(Location::new(line, None)));
                }
            }
        };
        Ok(Token { kind, line })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokKind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next().unwrap();
            if tok.kind == TokKind::Eof {
                break;
            }
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn lexes_a_simple_production() {
        let toks = kinds("N = V \"=\" E ;");
        assert_eq!(
            toks,
            vec![
                TokKind::Ident("N".into()),
                TokKind::Equal,
                TokKind::Ident("V".into()),
                TokKind::QuotedString("=".into()),
                TokKind::Ident("E".into()),
                TokKind::Semicolon,
            ]
        );
    }

    #[test]
    fn lexes_priority_suffix() {
        let toks = kinds("E / 2L = E \"+\" E ;");
        assert_eq!(toks[1], TokKind::Priority(2, crate::ast::Associativity::Left));
    }

    #[test]
    fn lexes_arrow_and_epsilon() {
        let toks = kinds("A → ε ;");
        assert_eq!(toks, vec![TokKind::Ident("A".into()), TokKind::Arrow, TokKind::Epsilon, TokKind::Semicolon]);
    }

    #[test]
    fn skips_line_and_block_comments() {
        let toks = kinds("A // line comment\n= /* block */ B ;");
        assert_eq!(toks, vec![TokKind::Ident("A".into()), TokKind::Equal, TokKind::Ident("B".into()), TokKind::Semicolon]);
    }

    #[test]
    fn call_names_carry_dots_and_leading_dash() {
        let toks = kinds("(ns.Func -Neg)");
        assert_eq!(
            toks,
            vec![TokKind::LParen, TokKind::Call("ns.Func".into()), TokKind::Call("-Neg".into()), TokKind::RParen]
        );
    }

    #[test]
    fn scope_and_step_markers() {
        let toks = kinds("{} >>");
        assert_eq!(toks, vec![TokKind::ScopeOpen, TokKind::StepAdvance]);
    }

    #[test]
    fn rejects_unknown_character() {
        let mut lexer = Lexer::new("@");
        assert!(lexer.next().is_err());
    }

    #[test]
    fn quoted_string_supports_escapes() {
        let toks = kinds(r#" "a\"b" "#);
        assert_eq!(toks, vec![TokKind::QuotedString("a\"b".into())]);
    }
}
