//! The regex-backed scanner (§1 "the core only orchestrates
//! pattern-named lexemes, keywords, ignores and comment brackets", §4.5
//! "Inputs: ... the lexer definition").
//!
//! The regex engine itself is an external collaborator (§1); this module
//! only orchestrates it: compiling the patterns a [`mewa_grammar`]
//! grammar names, applying them in priority order, and stripping
//! comments/ignored trivia between tokens.

use mewa_base::error::{ErrorCode, Location, MewaError, Result};
use mewa_grammar::{CommentDef, ResolvedGrammar};
use regex::Regex;

/// One compiled named token pattern (§4.3 `NAME : pattern
/// [capture-index] ;`).
struct CompiledToken {
    terminal: u16,
    regex: Regex,
    capture_index: u32,
}

/// A compiled keyword literal (§4.3: "any quoted literal on a
/// production's right-hand side becomes a keyword token lazily").
struct CompiledKeyword {
    terminal: u16,
    text: String,
}

struct CompiledComment {
    open: Regex,
    close: Option<String>,
}

/// The compiled form of a grammar's lexer directives, ready to scan
/// source text into a token stream. Built once per grammar and reused
/// across every source file the driver scans.
pub struct LexerDef {
    keywords: Vec<CompiledKeyword>,
    tokens: Vec<CompiledToken>,
    ignores: Vec<Regex>,
    bad: Vec<Regex>,
    comments: Vec<CompiledComment>,
    pub eof_terminal: u16,
}

fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})"))
        .map_err(|e| MewaError::new(ErrorCode::InvalidPattern, format!("{pattern}: {e}")))
}

impl LexerDef {
    /// Compiles every token, keyword, ignore, bad and comment pattern a
    /// resolved grammar names. Terminal ids for keywords and named
    /// tokens are looked up from `grammar.terminals`'s dense index so
    /// the emitted terminal codes match what `mewa-lalr`'s tables use.
    pub fn compile(grammar: &ResolvedGrammar) -> Result<Self> {
        let terminal_id = |name: &str| -> u16 {
            grammar
                .terminals
                .iter()
                .position(|t| t == name)
                .expect("every declared token/keyword is a terminal in the resolved grammar") as u16
        };

        let mut keywords: Vec<CompiledKeyword> = grammar
            .keywords
            .iter()
            .map(|kw| CompiledKeyword { terminal: terminal_id(kw), text: kw.clone() })
            .collect();
        // Longest literal first so maximal munch prefers e.g. "==" over "=".
        keywords.sort_by_key(|k| std::cmp::Reverse(k.text.len()));

        let tokens = grammar
            .tokens
            .iter()
            .map(|t| {
                Ok(CompiledToken {
                    terminal: terminal_id(&t.name),
                    regex: anchored(&t.pattern)?,
                    capture_index: t.capture_index,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let ignores = grammar.ignores.iter().map(|p| anchored(p)).collect::<Result<Vec<_>>>()?;
        let bad = grammar.bad.iter().map(|p| anchored(p)).collect::<Result<Vec<_>>>()?;

        let comments = grammar
            .comments
            .iter()
            .map(|c| match c {
                CommentDef::EndOfLine { open } => Ok(CompiledComment { open: anchored(&regex::escape(open))?, close: None }),
                CommentDef::Bracket { open, close } => {
                    Ok(CompiledComment { open: anchored(&regex::escape(open))?, close: Some(close.clone()) })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LexerDef { keywords, tokens, ignores, bad, comments, eof_terminal: grammar.terminal_count() as u16 })
    }

    /// Whether `terminal` is a bare keyword literal (§4.3: "any quoted
    /// literal on a production's right-hand side becomes a keyword
    /// token lazily") rather than a named, value-carrying token. The
    /// driver's shift handler (§4.5) uses this to decide whether a
    /// shift records a host value at all.
    pub fn is_keyword(&self, terminal: u16) -> bool {
        self.keywords.iter().any(|kw| kw.terminal == terminal)
    }
}

/// One scanned token: a terminal id, its raw lexeme value (the selected
/// capture group or the whole match for named tokens; the literal text
/// for keywords) and the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedToken {
    pub terminal: u16,
    pub lexeme: Vec<u8>,
    pub line: u32,
}

/// Scans `src` against a compiled [`LexerDef`], one token at a time.
pub struct Scanner<'a> {
    def: &'a LexerDef,
    src: &'a [u8],
    pos: usize,
    line: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(def: &'a LexerDef, src: &'a str) -> Self {
        Scanner { def, src: src.as_bytes(), pos: 0, line: 1 }
    }

    fn advance_by(&mut self, len: usize) {
        for &b in &self.src[self.pos..self.pos + len] {
            if b == b'\n' {
                self.line += 1;
            }
        }
        self.pos += len;
    }

    fn rest(&self) -> &'a str {
        std::str::from_utf8(&self.src[self.pos..]).unwrap_or("")
    }

    /// Strips ignore patterns and comments until neither makes further
    /// progress at the current position.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            let mut progressed = false;
            for pattern in &self.def.ignores {
                if let Some(m) = pattern.find(self.rest()) {
                    if m.end() > 0 {
                        self.advance_by(m.end());
                        progressed = true;
                    }
                }
            }
            for comment in &self.def.comments {
                let Some(m) = comment.open.find(self.rest()) else { continue };
                self.advance_by(m.end());
                match &comment.close {
                    None => {
                        while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
                            self.advance_by(1);
                        }
                    }
                    Some(close) => {
                        let close_bytes = close.as_bytes();
                        loop {
                            if self.pos >= self.src.len() {
                                return Err(MewaError::new(ErrorCode::BadCharacter, "unterminated comment")
                                    .at(Location::new(self.line, None)));
                            }
                            if self.src[self.pos..].starts_with(close_bytes) {
                                self.advance_by(close_bytes.len());
                                break;
                            }
                            self.advance_by(1);
                        }
                    }
                }
                progressed = true;
            }
            if !progressed {
                return Ok(());
            }
        }
    }

    /// Scans the next token, or `None` at end of input (the driver
    /// synthesizes the `$` terminal for end of input itself).
    pub fn next(&mut self) -> Result<Option<ScannedToken>> {
        self.skip_trivia()?;
        if self.pos >= self.src.len() {
            return Ok(None);
        }
        let line = self.line;
        let rest = self.rest();

        // Keywords first, longest literal first, so a keyword that looks
        // like an identifier (e.g. "return") wins over a generic IDENT
        // token pattern matching the same text (maximal munch plus
        // keyword-override, the conventional resolution per DESIGN.md).
        let mut best: Option<(usize, u16, Vec<u8>)> = None;
        for kw in &self.def.keywords {
            if rest.starts_with(kw.text.as_str()) {
                best = Some((kw.text.len(), kw.terminal, kw.text.as_bytes().to_vec()));
                break;
            }
        }

        if best.is_none() {
            for tok in &self.def.tokens {
                let Some(m) = tok.regex.captures(rest) else { continue };
                let whole = m.get(0).unwrap();
                if whole.end() == 0 {
                    continue;
                }
                let value = m
                    .get(tok.capture_index as usize)
                    .map(|g| g.as_str().as_bytes().to_vec())
                    .unwrap_or_else(|| whole.as_str().as_bytes().to_vec());
                match &best {
                    Some((len, ..)) if *len >= whole.end() => {}
                    _ => best = Some((whole.end(), tok.terminal, value)),
                }
            }
        }

        if let Some((len, terminal, lexeme)) = best {
            self.advance_by(len);
            return Ok(Some(ScannedToken { terminal, lexeme, line }));
        }

        for bad in &self.def.bad {
            if let Some(m) = bad.find(rest) {
                if m.end() > 0 {
                    let text = m.as_str().to_string();
                    self.advance_by(m.end());
                    return Err(MewaError::new(ErrorCode::BadCharacter, text).at(Location::new(line, None)));
                }
            }
        }

        let bad_char = rest.chars().next().unwrap_or('\u{FFFD}');
        Err(MewaError::new(ErrorCode::BadCharacter, bad_char.to_string()).at(Location::new(line, None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mewa_grammar::parse_and_validate;

    fn def(src: &str) -> (ResolvedGrammar, LexerDef) {
        let grammar = parse_and_validate(src).unwrap();
        let lexer = LexerDef::compile(&grammar).unwrap();
        (grammar, lexer)
    }

    #[test]
    fn scans_keywords_and_named_tokens() {
        let (_, lexer) = def(
            r#"
            IDENT : "[a-zA-Z_][a-zA-Z_0-9]*" ;
            %IGNORE "[ \t\n]+" ;
            S = IDENT "=" IDENT (assign) ;
            "#,
        );
        let mut scanner = Scanner::new(&lexer, "x = y");
        let t1 = scanner.next().unwrap().unwrap();
        assert_eq!(t1.lexeme, b"x");
        let t2 = scanner.next().unwrap().unwrap();
        assert_eq!(t2.lexeme, b"=");
        let t3 = scanner.next().unwrap().unwrap();
        assert_eq!(t3.lexeme, b"y");
        assert!(scanner.next().unwrap().is_none());
    }

    #[test]
    fn keyword_wins_over_identifier_pattern() {
        let (grammar, lexer) = def(
            r#"
            IDENT : "[a-zA-Z_][a-zA-Z_0-9]*" ;
            %IGNORE "[ \t\n]+" ;
            S = "return" IDENT (ret) | IDENT (expr) ;
            "#,
        );
        let mut scanner = Scanner::new(&lexer, "return");
        let tok = scanner.next().unwrap().unwrap();
        let return_terminal = grammar.terminals.iter().position(|t| t == "return").unwrap() as u16;
        assert_eq!(tok.terminal, return_terminal);
    }

    #[test]
    fn strips_line_and_bracket_comments() {
        let (_, lexer) = def(
            r#"
            IDENT : "[a-zA-Z_][a-zA-Z_0-9]*" ;
            %IGNORE "[ \t\n]+" ;
            %COMMENT "//" ;
            %COMMENT "/*" "*/" ;
            S = IDENT (x) ;
            "#,
        );
        let mut scanner = Scanner::new(&lexer, "/* skip */ x // trailing");
        let tok = scanner.next().unwrap().unwrap();
        assert_eq!(tok.lexeme, b"x");
        assert!(scanner.next().unwrap().is_none());
    }

    #[test]
    fn unterminated_bracket_comment_is_an_error() {
        let (_, lexer) = def(
            r#"
            IDENT : "[a-zA-Z_][a-zA-Z_0-9]*" ;
            %COMMENT "/*" "*/" ;
            S = IDENT (x) ;
            "#,
        );
        let mut scanner = Scanner::new(&lexer, "/* never closes");
        assert!(scanner.next().is_err());
    }

    #[test]
    fn captures_selected_group() {
        let (_, lexer) = def(
            r#"
            STR : "\"([^\"]*)\"" 1 ;
            S = STR (s) ;
            "#,
        );
        let mut scanner = Scanner::new(&lexer, "\"hello\"");
        let tok = scanner.next().unwrap().unwrap();
        assert_eq!(tok.lexeme, b"hello");
    }

    #[test]
    fn unknown_character_is_bad_character_error() {
        let (_, lexer) = def(r#"S = "a" (s) ;"#);
        let mut scanner = Scanner::new(&lexer, "@");
        let err = scanner.next().unwrap_err();
        assert_eq!(err.code, ErrorCode::BadCharacter);
    }
}
