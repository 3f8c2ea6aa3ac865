/// Recursive descent parser with Pratt expression parsing for ordo pseudocode.
///
/// Parsing is atomic: either the whole source reduces to a [`Program`] or a
/// single [`ParseError`] is returned and no partial AST escapes.

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Parse a complete source string into a [`Program`].
///
/// ```
/// use ordo_parser::parse_program;
///
/// let prog = parse_program("FUNCTION F(n) BEGIN x <- 1 END").unwrap();
/// assert_eq!(prog.functions.len(), 1);
/// assert_eq!(prog.functions[0].name, "F");
/// ```
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let tokens = Lexer::tokenize(source)?;
    let mut parser = Parser::new(tokens);
    parser.do_parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos];
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(ParseError::new(
                format!(
                    "expected `{}`, found `{}`",
                    kind_name(kind),
                    tok_display(tok)
                ),
                tok.span.line,
                tok.span.col,
            ))
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Peek at the token N positions ahead (0 = current).
    fn lookahead(&self, n: usize) -> &TokenKind {
        let idx = self.pos + n;
        if idx < self.tokens.len() {
            &self.tokens[idx].kind
        } else {
            &TokenKind::Eof
        }
    }

    fn line(&self) -> Option<u32> {
        Some(self.peek().span.line as u32)
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        let tok = self.peek().clone();
        if tok.kind == TokenKind::Ident {
            self.advance();
            Ok(tok.lexeme)
        } else {
            Err(ParseError::new(
                format!("expected identifier, found `{}`", tok_display(&tok)),
                tok.span.line,
                tok.span.col,
            ))
        }
    }

    // ========================================================================
    // Program / functions
    // ========================================================================

    fn do_parse_program(&mut self) -> Result<Program, ParseError> {
        let mut functions = Vec::new();
        functions.push(self.parse_function()?);
        while !self.at(&TokenKind::Eof) {
            functions.push(self.parse_function()?);
        }
        Ok(Program { functions })
    }

    fn parse_function(&mut self) -> Result<Function, ParseError> {
        let line = self.line();
        self.expect(&TokenKind::Function)?;
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Begin)?;
        let body = self.parse_stmts_until(&TokenKind::End)?;
        self.expect(&TokenKind::End)?;
        Ok(Function {
            name,
            params,
            body,
            line,
        })
    }

    fn parse_param_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = Vec::new();
        if !self.at(&TokenKind::RParen) {
            params.push(self.expect_ident()?);
            while self.eat(&TokenKind::Comma) {
                params.push(self.expect_ident()?);
            }
        }
        Ok(params)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Collect statements until `terminator`, splicing explicit blocks into
    /// the sequence being built.
    fn parse_stmts_until(&mut self, terminator: &TokenKind) -> Result<Sequence, ParseError> {
        let mut stmts = Vec::new();
        while !self.at(terminator) && !self.at(&TokenKind::Eof) {
            push_flattened(&mut stmts, self.parse_stmt()?);
        }
        Ok(Sequence { stmts })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::Begin => {
                self.advance();
                let seq = self.parse_stmts_until(&TokenKind::End)?;
                self.expect(&TokenKind::End)?;
                Ok(Stmt::Block(seq))
            }
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::If => self.parse_if(),
            TokenKind::Call => {
                let line = self.line();
                self.advance();
                let (name, args) = self.parse_call_tail()?;
                Ok(Stmt::Call { name, args, line })
            }
            TokenKind::Ident => match self.lookahead(1) {
                TokenKind::LParen => {
                    let line = self.line();
                    let (name, args) = self.parse_call_tail()?;
                    Ok(Stmt::Call { name, args, line })
                }
                _ => self.parse_assign(),
            },
            _ => {
                let tok = self.peek();
                Err(ParseError::new(
                    format!("expected statement, found `{}`", tok_display(tok)),
                    tok.span.line,
                    tok.span.col,
                ))
            }
        }
    }

    fn parse_assign(&mut self) -> Result<Stmt, ParseError> {
        let line = self.line();
        let target = self.parse_assign_target()?;
        self.expect(&TokenKind::Assign)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Assign {
            target,
            value,
            line,
        })
    }

    /// Assignment target: plain identifier or array access. Array indices
    /// are checked syntactically and folded into the synthetic name `base[]`.
    fn parse_assign_target(&mut self) -> Result<String, ParseError> {
        let name = self.expect_ident()?;
        if self.eat(&TokenKind::LBracket) {
            self.parse_expr()?;
            self.expect(&TokenKind::RBracket)?;
            Ok(format!("{name}[]"))
        } else {
            Ok(name)
        }
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let line = self.line();
        self.advance(); // eat `FOR`
        let var = self.expect_ident()?;
        self.expect(&TokenKind::Assign)?;
        let start = self.parse_expr()?;
        self.expect(&TokenKind::To)?;
        let end = self.parse_expr()?;
        self.expect(&TokenKind::Do)?;
        let body = self.parse_body()?;
        Ok(Stmt::For {
            var,
            start,
            end,
            body,
            line,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let line = self.line();
        self.advance(); // eat `WHILE`
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::Do)?;
        let body = self.parse_body()?;
        Ok(Stmt::While {
            condition,
            body,
            line,
        })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let line = self.line();
        self.advance(); // eat `IF`
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::Then)?;
        let then_branch = self.parse_body()?;
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(self.parse_body()?)
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            line,
        })
    }

    /// Parse a single statement as a control-construct body, normalized to a
    /// [`Sequence`].
    fn parse_body(&mut self) -> Result<Sequence, ParseError> {
        match self.parse_stmt()? {
            Stmt::Block(seq) => Ok(seq),
            other => Ok(Sequence { stmts: vec![other] }),
        }
    }

    /// `ID ( [arg_list] )` — the identifier and argument list of a call whose
    /// leading `CALL` keyword (if any) has already been consumed.
    fn parse_call_tail(&mut self) -> Result<(String, Vec<Expr>), ParseError> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.at(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            while self.eat(&TokenKind::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok((name, args))
    }

    // ========================================================================
    // Expressions — Pratt parser
    // ========================================================================

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some((l_bp, r_bp)) = infix_bp(self.peek_kind()) {
            if l_bp < min_bp {
                break;
            }
            let op = token_to_binop(&self.advance().kind);
            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = Expr::BinOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::Plus => {
                // Unary plus is a no-op
                self.advance();
                self.parse_prefix()
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_prefix()?;
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Not => {
                self.advance();
                let operand = self.parse_prefix()?;
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                })
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Number => {
                let tok = self.advance();
                let value: f64 = tok.lexeme.parse().map_err(|_| {
                    ParseError::new(
                        format!("invalid number literal `{}`", tok.lexeme),
                        tok.span.line,
                        tok.span.col,
                    )
                })?;
                Ok(Expr::Number { value })
            }
            TokenKind::StringLit => {
                let tok = self.advance().clone();
                Ok(Expr::StringLit { value: tok.lexeme })
            }
            TokenKind::Call => {
                self.advance();
                let (name, args) = self.parse_call_tail()?;
                Ok(Expr::Call { name, args })
            }
            TokenKind::Ident => {
                let name = self.expect_ident()?;
                match self.peek_kind() {
                    TokenKind::LParen => {
                        self.advance();
                        let mut args = Vec::new();
                        if !self.at(&TokenKind::RParen) {
                            args.push(self.parse_expr()?);
                            while self.eat(&TokenKind::Comma) {
                                args.push(self.parse_expr()?);
                            }
                        }
                        self.expect(&TokenKind::RParen)?;
                        Ok(Expr::Call { name, args })
                    }
                    TokenKind::LBracket => {
                        self.advance();
                        self.parse_expr()?;
                        self.expect(&TokenKind::RBracket)?;
                        Ok(Expr::Var {
                            name: format!("{name}[]"),
                        })
                    }
                    _ => Ok(Expr::Var { name }),
                }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            _ => {
                let tok = self.peek();
                Err(ParseError::new(
                    format!("expected expression, found `{}`", tok_display(tok)),
                    tok.span.line,
                    tok.span.col,
                ))
            }
        }
    }
}

/// Append a statement to a sequence under construction, splicing explicit
/// blocks so nested `BEGIN…END` never nests one sequence inside another.
fn push_flattened(stmts: &mut Vec<Stmt>, stmt: Stmt) {
    match stmt {
        Stmt::Block(seq) => stmts.extend(seq.stmts),
        other => stmts.push(other),
    }
}

/// Binding powers for infix operators: `(left, right)`, left-associative.
fn infix_bp(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Or => Some((1, 2)),
        TokenKind::And => Some((3, 4)),
        TokenKind::Eq
        | TokenKind::Neq
        | TokenKind::Lt
        | TokenKind::Le
        | TokenKind::Gt
        | TokenKind::Ge => Some((5, 6)),
        TokenKind::Plus | TokenKind::Minus => Some((7, 8)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Mod | TokenKind::IntDiv => Some((9, 10)),
        _ => None,
    }
}

fn token_to_binop(kind: &TokenKind) -> BinOp {
    match kind {
        TokenKind::Or => BinOp::Or,
        TokenKind::And => BinOp::And,
        TokenKind::Eq => BinOp::Eq,
        TokenKind::Neq => BinOp::Neq,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Le => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::Ge => BinOp::Ge,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Mod => BinOp::Mod,
        TokenKind::IntDiv => BinOp::IntDiv,
        _ => unreachable!("not an infix operator: {kind:?}"),
    }
}

fn kind_name(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::Number => "number",
        TokenKind::StringLit => "string",
        TokenKind::Function => "FUNCTION",
        TokenKind::Begin => "BEGIN",
        TokenKind::End => "END",
        TokenKind::For => "FOR",
        TokenKind::To => "TO",
        TokenKind::Do => "DO",
        TokenKind::While => "WHILE",
        TokenKind::If => "IF",
        TokenKind::Then => "THEN",
        TokenKind::Else => "ELSE",
        TokenKind::Call => "CALL",
        TokenKind::And => "AND",
        TokenKind::Or => "OR",
        TokenKind::Not => "NOT",
        TokenKind::Mod => "MOD",
        TokenKind::IntDiv => "DIV",
        TokenKind::Ident => "identifier",
        TokenKind::Assign => "<-",
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Eq => "=",
        TokenKind::Neq => "!=",
        TokenKind::Lt => "<",
        TokenKind::Le => "<=",
        TokenKind::Gt => ">",
        TokenKind::Ge => ">=",
        TokenKind::LParen => "(",
        TokenKind::RParen => ")",
        TokenKind::LBracket => "[",
        TokenKind::RBracket => "]",
        TokenKind::Comma => ",",
        TokenKind::Eof => "end of input",
    }
}

fn tok_display(tok: &Token) -> String {
    if tok.kind == TokenKind::Eof {
        "end of input".to_string()
    } else {
        tok.lexeme.clone()
    }
}
