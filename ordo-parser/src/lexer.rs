/// Single-pass O(n) lexer for ordo pseudocode.
use crate::ast::Span;
use crate::error::ParseError;
use crate::token::{Token, TokenKind};

// `►`, the comment marker inherited from the classic pseudocode notation.
const ARROW_COMMENT: [u8; 3] = [0xE2, 0x96, 0xBA];

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
        let mut lexer = Lexer {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        };
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    fn at_arrow_comment(&self) -> bool {
        self.source[self.pos..].starts_with(&ARROW_COMMENT)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek2() == Some(b'/') => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some(_) if self.at_arrow_comment() => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace_and_comments();

        let sp = self.span();

        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: sp,
                lexeme: String::new(),
            });
        };

        // Numbers
        if ch.is_ascii_digit() {
            return Ok(self.lex_number(sp));
        }

        // Identifiers and keywords
        if ch.is_ascii_alphabetic() || ch == b'_' {
            return Ok(self.lex_ident(sp));
        }

        // Strings
        if ch == b'"' {
            return self.lex_string(sp);
        }

        // Multi-character operators
        match ch {
            b'<' => {
                self.advance();
                let (kind, lexeme) = match self.peek() {
                    Some(b'-') => {
                        self.advance();
                        (TokenKind::Assign, "<-")
                    }
                    Some(b'=') => {
                        self.advance();
                        (TokenKind::Le, "<=")
                    }
                    Some(b'>') => {
                        self.advance();
                        (TokenKind::Neq, "<>")
                    }
                    _ => (TokenKind::Lt, "<"),
                };
                return Ok(Token {
                    kind,
                    span: sp,
                    lexeme: lexeme.into(),
                });
            }
            b'>' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    return Ok(Token {
                        kind: TokenKind::Ge,
                        span: sp,
                        lexeme: ">=".into(),
                    });
                }
                return Ok(Token {
                    kind: TokenKind::Gt,
                    span: sp,
                    lexeme: ">".into(),
                });
            }
            b'!' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    return Ok(Token {
                        kind: TokenKind::Neq,
                        span: sp,
                        lexeme: "!=".into(),
                    });
                }
                return Err(ParseError::new("unexpected character `!`", sp.line, sp.col));
            }
            _ => {}
        }

        // Single-character tokens
        self.advance();
        let (kind, lexeme) = match ch {
            b'=' => (TokenKind::Eq, "="),
            b'+' => (TokenKind::Plus, "+"),
            b'-' => (TokenKind::Minus, "-"),
            b'*' => (TokenKind::Star, "*"),
            b'/' => (TokenKind::Slash, "/"),
            b'(' => (TokenKind::LParen, "("),
            b')' => (TokenKind::RParen, ")"),
            b'[' => (TokenKind::LBracket, "["),
            b']' => (TokenKind::RBracket, "]"),
            b',' => (TokenKind::Comma, ","),
            _ => {
                return Err(ParseError::new(
                    format!("illegal character `{}`", printable(ch)),
                    sp.line,
                    sp.col,
                ));
            }
        };
        Ok(Token {
            kind,
            span: sp,
            lexeme: lexeme.into(),
        })
    }

    fn lex_number(&mut self, sp: Span) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        // Optional decimal part
        if self.peek() == Some(b'.') {
            if let Some(next) = self.peek2() {
                if next.is_ascii_digit() {
                    self.advance();
                    while let Some(ch) = self.peek() {
                        if ch.is_ascii_digit() {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
            }
        }
        let lexeme = std::str::from_utf8(&self.source[start..self.pos])
            .unwrap()
            .to_string();
        Token {
            kind: TokenKind::Number,
            span: sp,
            lexeme,
        }
    }

    fn lex_ident(&mut self, sp: Span) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let lexeme = std::str::from_utf8(&self.source[start..self.pos])
            .unwrap()
            .to_string();
        // Keywords are case-insensitive; identifiers keep their spelling.
        let kind = match lexeme.to_ascii_uppercase().as_str() {
            "FUNCTION" => TokenKind::Function,
            "BEGIN" => TokenKind::Begin,
            "END" => TokenKind::End,
            "FOR" => TokenKind::For,
            "TO" => TokenKind::To,
            "DO" => TokenKind::Do,
            "WHILE" => TokenKind::While,
            "IF" => TokenKind::If,
            "THEN" => TokenKind::Then,
            "ELSE" => TokenKind::Else,
            "CALL" => TokenKind::Call,
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            "MOD" => TokenKind::Mod,
            "DIV" => TokenKind::IntDiv,
            _ => TokenKind::Ident,
        };
        Token {
            kind,
            span: sp,
            lexeme,
        }
    }

    fn lex_string(&mut self, sp: Span) -> Result<Token, ParseError> {
        self.advance(); // consume opening "
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::new(
                        "unterminated string literal",
                        sp.line,
                        sp.col,
                    ));
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    // Decode full UTF-8 character (may be multi-byte)
                    let rest = &self.source[self.pos..];
                    match std::str::from_utf8(rest) {
                        Ok(s) => {
                            let c = s.chars().next().unwrap();
                            for _ in 0..c.len_utf8() {
                                self.advance();
                            }
                            value.push(c);
                        }
                        Err(_) => {
                            let byte_sp = self.span();
                            return Err(ParseError::new(
                                "invalid UTF-8 in string literal",
                                byte_sp.line,
                                byte_sp.col,
                            ));
                        }
                    }
                }
            }
        }
        Ok(Token {
            kind: TokenKind::StringLit,
            span: sp,
            lexeme: value,
        })
    }
}

fn printable(ch: u8) -> String {
    if ch.is_ascii_graphic() {
        (ch as char).to_string()
    } else {
        format!("\\x{ch:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn simple_operators() {
        assert_eq!(
            kinds("+ - * /"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn assign_vs_comparisons() {
        assert_eq!(
            kinds("<- < <= <> >= > = !="),
            vec![
                TokenKind::Assign,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Neq,
                TokenKind::Ge,
                TokenKind::Gt,
                TokenKind::Eq,
                TokenKind::Neq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_case_insensitive() {
        assert_eq!(
            kinds("FUNCTION begin End for WHILE"),
            vec![
                TokenKind::Function,
                TokenKind::Begin,
                TokenKind::End,
                TokenKind::For,
                TokenKind::While,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_operators() {
        assert_eq!(
            kinds("and OR not mod div"),
            vec![
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Mod,
                TokenKind::IntDiv,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn ident_not_keyword() {
        let tokens = Lexer::tokenize("forward").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "forward");
    }

    #[test]
    fn ident_keeps_case() {
        let tokens = Lexer::tokenize("MyVar").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "MyVar");
    }

    #[test]
    fn number_literals() {
        let tokens = Lexer::tokenize("42 3.25").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "42");
        assert_eq!(tokens[1].lexeme, "3.25");
    }

    #[test]
    fn line_comment() {
        assert_eq!(
            kinds("1 // comment\n2"),
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn arrow_comment() {
        assert_eq!(
            kinds("x ► the classic marker\ny"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let tokens = Lexer::tokenize("x <- 1\ny <- 2").unwrap();
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[0].span.col, 1);
        assert_eq!(tokens[3].span.line, 2);
        assert_eq!(tokens[3].span.col, 1);
        assert_eq!(tokens[4].span.col, 3);
    }

    #[test]
    fn illegal_character() {
        let err = Lexer::tokenize("x <- @").unwrap_err();
        assert!(err.message.contains('@'));
        assert_eq!(err.line, 1);
        assert_eq!(err.col, 6);
    }

    #[test]
    fn unterminated_string() {
        assert!(Lexer::tokenize("\"unterminated").is_err());
    }

    #[test]
    fn string_literal() {
        let tokens = Lexer::tokenize("\"hello world\"").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert_eq!(tokens[0].lexeme, "hello world");
    }
}
