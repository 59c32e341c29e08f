// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use memchr::memmem;

use super::DotParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdKind {
    Plain,
    Numeral,
    Quoted,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeOp {
    Directed,
    Undirected,
}

impl EdgeOp {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Directed => "->",
            Self::Undirected => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Id { kind: IdKind, text: String },
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Colon,
    Equals,
    Plus,
    EdgeOp(EdgeOp),
    Eof,
}

impl TokenKind {
    /// Short human-facing rendering used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Id { kind: IdKind::Quoted, text } => format!("\"{text}\""),
            Self::Id { kind: IdKind::Html, text } => format!("<{text}>"),
            Self::Id { text, .. } => text.clone(),
            Self::LBrace => "'{'".to_owned(),
            Self::RBrace => "'}'".to_owned(),
            Self::LBracket => "'['".to_owned(),
            Self::RBracket => "']'".to_owned(),
            Self::Semi => "';'".to_owned(),
            Self::Comma => "','".to_owned(),
            Self::Colon => "':'".to_owned(),
            Self::Equals => "'='".to_owned(),
            Self::Plus => "'+'".to_owned(),
            Self::EdgeOp(op) => format!("'{}'", op.as_str()),
            Self::Eof => "end of input".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Token {
    /// Returns the id text if this is an unquoted id equal to `keyword` (ASCII case-insensitive).
    pub(crate) fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Id { kind: IdKind::Plain, text } if text.eq_ignore_ascii_case(keyword))
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
}

/// Splits dot source into tokens. The final token is always [`TokenKind::Eof`].
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, DotParseError> {
    let mut lexer = Lexer {
        src,
        pos: 0,
        line: 1,
        column: 1,
        at_line_start: true,
    };
    let mut tokens = Vec::new();

    loop {
        lexer.skip_trivia()?;
        let line = lexer.line;
        let column = lexer.column;
        let Some(ch) = lexer.peek() else {
            tokens.push(Token { kind: TokenKind::Eof, line, column });
            return Ok(tokens);
        };

        let kind = match ch {
            '{' => lexer.single(TokenKind::LBrace),
            '}' => lexer.single(TokenKind::RBrace),
            '[' => lexer.single(TokenKind::LBracket),
            ']' => lexer.single(TokenKind::RBracket),
            ';' => lexer.single(TokenKind::Semi),
            ',' => lexer.single(TokenKind::Comma),
            ':' => lexer.single(TokenKind::Colon),
            '=' => lexer.single(TokenKind::Equals),
            '+' => lexer.single(TokenKind::Plus),
            '"' => lexer.quoted(line, column)?,
            '<' => lexer.html(line, column)?,
            '-' => match lexer.peek_nth(1) {
                Some('>') => {
                    lexer.bump();
                    lexer.bump();
                    TokenKind::EdgeOp(EdgeOp::Directed)
                }
                Some('-') => {
                    lexer.bump();
                    lexer.bump();
                    TokenKind::EdgeOp(EdgeOp::Undirected)
                }
                Some(next) if next.is_ascii_digit() || next == '.' => lexer.numeral(),
                _ => return Err(DotParseError::UnexpectedChar { line, column, ch }),
            },
            '.' => match lexer.peek_nth(1) {
                Some(next) if next.is_ascii_digit() => lexer.numeral(),
                _ => return Err(DotParseError::UnexpectedChar { line, column, ch }),
            },
            ch if ch.is_ascii_digit() => lexer.numeral(),
            ch if is_ident_start(ch) => lexer.ident(),
            ch => return Err(DotParseError::UnexpectedChar { line, column, ch }),
        };

        tokens.push(Token { kind, line, column });
    }
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic() || !ch.is_ascii()
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
            if !ch.is_whitespace() {
                self.at_line_start = false;
            }
        }
        Some(ch)
    }

    /// Advances over `len` bytes that are known to lie on char boundaries.
    fn bump_bytes(&mut self, len: usize) {
        let end = self.pos + len;
        while self.pos < end {
            self.bump();
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn skip_trivia(&mut self) -> Result<(), DotParseError> {
        loop {
            let Some(ch) = self.peek() else {
                return Ok(());
            };

            if ch.is_whitespace() {
                self.bump();
                continue;
            }

            // Lines starting with '#' are C preprocessor output and ignored.
            if ch == '#' && self.at_line_start {
                self.skip_line();
                continue;
            }

            if self.rest().starts_with("//") {
                self.skip_line();
                continue;
            }

            if self.rest().starts_with("/*") {
                let line = self.line;
                let column = self.column;
                match memmem::find(&self.rest().as_bytes()[2..], b"*/") {
                    Some(end) => self.bump_bytes(end + 4),
                    None => return Err(DotParseError::UnterminatedComment { line, column }),
                }
                continue;
            }

            return Ok(());
        }
    }

    fn skip_line(&mut self) {
        match memchr::memchr(b'\n', self.rest().as_bytes()) {
            Some(end) => self.bump_bytes(end),
            None => self.bump_bytes(self.rest().len()),
        }
    }

    fn ident(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        TokenKind::Id { kind: IdKind::Plain, text: self.src[start..self.pos].to_owned() }
    }

    fn numeral(&mut self) -> TokenKind {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') {
            self.bump();
            while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                self.bump();
            }
        }
        TokenKind::Id { kind: IdKind::Numeral, text: self.src[start..self.pos].to_owned() }
    }

    fn quoted(&mut self, line: usize, column: usize) -> Result<TokenKind, DotParseError> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(DotParseError::UnterminatedString { line, column }),
                Some('"') => break,
                Some('\\') => match self.peek() {
                    Some('"') => {
                        self.bump();
                        text.push('"');
                    }
                    // Backslash-newline continues the string on the next line.
                    Some('\n') => {
                        self.bump();
                    }
                    Some('\r') if self.peek_nth(1) == Some('\n') => {
                        self.bump();
                        self.bump();
                    }
                    // Label escapes such as `\n`, `\l` and `\N` are interpreted by the renderer.
                    _ => text.push('\\'),
                },
                Some(ch) => text.push(ch),
            }
        }
        Ok(TokenKind::Id { kind: IdKind::Quoted, text })
    }

    fn html(&mut self, line: usize, column: usize) -> Result<TokenKind, DotParseError> {
        self.bump();
        let start = self.pos;
        let mut depth = 1usize;
        loop {
            match self.peek() {
                None => return Err(DotParseError::UnterminatedHtml { line, column }),
                Some('<') => depth += 1,
                Some('>') => {
                    depth -= 1;
                    if depth == 0 {
                        let text = self.src[start..self.pos].to_owned();
                        self.bump();
                        return Ok(TokenKind::Id { kind: IdKind::Html, text });
                    }
                }
                Some(_) => {}
            }
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{tokenize, EdgeOp, IdKind, TokenKind};
    use crate::format::dot::DotParseError;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).expect("tokenize").into_iter().map(|token| token.kind).collect()
    }

    fn id(kind: IdKind, text: &str) -> TokenKind {
        TokenKind::Id { kind, text: text.to_owned() }
    }

    #[test]
    fn tokenizes_edge_statement() {
        assert_eq!(
            kinds("A -> B;"),
            vec![
                id(IdKind::Plain, "A"),
                TokenKind::EdgeOp(EdgeOp::Directed),
                id(IdKind::Plain, "B"),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn distinguishes_negative_numerals_from_edge_ops() {
        assert_eq!(
            kinds("a--b -1.5 .5"),
            vec![
                id(IdKind::Plain, "a"),
                TokenKind::EdgeOp(EdgeOp::Undirected),
                id(IdKind::Plain, "b"),
                id(IdKind::Numeral, "-1.5"),
                id(IdKind::Numeral, ".5"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_all_comment_styles() {
        let src = "# preprocessor line\n// line comment\n/* block\ncomment */ a";
        assert_eq!(kinds(src), vec![id(IdKind::Plain, "a"), TokenKind::Eof]);
    }

    #[test]
    fn hash_inside_a_line_is_not_a_comment() {
        let err = tokenize("a # b").unwrap_err();
        assert_eq!(err, DotParseError::UnexpectedChar { line: 1, column: 3, ch: '#' });
    }

    #[test]
    fn quoted_strings_unescape_quotes_and_keep_label_escapes() {
        assert_eq!(
            kinds(r#""say \"hi\"\nnext""#),
            vec![id(IdKind::Quoted, "say \"hi\"\\nnext"), TokenKind::Eof]
        );
    }

    #[test]
    fn html_strings_nest_angle_brackets() {
        assert_eq!(
            kinds("<<b>bold</b>>"),
            vec![id(IdKind::Html, "<b>bold</b>"), TokenKind::Eof]
        );
    }

    #[test]
    fn reports_positions_of_unterminated_tokens() {
        assert_eq!(
            tokenize("a\n  \"open").unwrap_err(),
            DotParseError::UnterminatedString { line: 2, column: 3 }
        );
        assert_eq!(
            tokenize("/* open").unwrap_err(),
            DotParseError::UnterminatedComment { line: 1, column: 1 }
        );
        assert_eq!(
            tokenize("<a <b>").unwrap_err(),
            DotParseError::UnterminatedHtml { line: 1, column: 1 }
        );
    }

    #[test]
    fn identifiers_accept_non_ascii() {
        assert_eq!(kinds("größe"), vec![id(IdKind::Plain, "größe"), TokenKind::Eof]);
    }
}
