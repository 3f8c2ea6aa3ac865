/// Owned AST types for the ordo pseudocode language.
///
/// A program is a non-empty list of functions. Control-construct bodies are
/// always a [`Sequence`]; explicit `BEGIN…END` blocks are flattened into the
/// enclosing sequence during parsing, so no `Stmt::Block` survives inside a
/// parsed tree. All nodes are immutable after construction and serialize to
/// a lossless tree representation via serde.
use serde::{Deserialize, Serialize};

/// Source location for error reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

/// A complete program: one or more function definitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<Function>,
}

/// A function definition. The first function of a program is the entry point
/// for complexity analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Sequence,
    pub line: Option<u32>,
}

/// An ordered block of statements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub stmts: Vec<Stmt>,
}

/// Statement variants.
///
/// Every cost-bearing statement carries the 1-based source line of its
/// defining token, set once at construction. `None` only occurs in trees
/// built programmatically (e.g. in tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// An explicit `BEGIN…END` block. Transient: the parser splices these
    /// into the surrounding sequence.
    Block(Sequence),
    Assign {
        target: String,
        value: Expr,
        line: Option<u32>,
    },
    For {
        var: String,
        start: Expr,
        end: Expr,
        body: Sequence,
        line: Option<u32>,
    },
    While {
        condition: Expr,
        body: Sequence,
        line: Option<u32>,
    },
    If {
        condition: Expr,
        then_branch: Sequence,
        else_branch: Option<Sequence>,
        line: Option<u32>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        line: Option<u32>,
    },
}

impl Stmt {
    /// Source line of the statement, where stamped.
    pub fn line(&self) -> Option<u32> {
        match self {
            Stmt::Block(_) => None,
            Stmt::Assign { line, .. }
            | Stmt::For { line, .. }
            | Stmt::While { line, .. }
            | Stmt::If { line, .. }
            | Stmt::Call { line, .. } => *line,
        }
    }
}

/// Expression variants. Expressions carry no line stamp; cost attribution
/// happens at statement granularity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Number {
        value: f64,
    },
    StringLit {
        value: String,
    },
    /// A variable read. Array accesses are folded into a synthetic name of
    /// the form `base[]`; indices are not tracked.
    Var {
        name: String,
    },
    BinOp {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Unary operators. Unary plus is folded away by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}
