//! The complexity analyzer: an exhaustive-match walker over the parsed AST.
//!
//! One pass runs per execution-case mode (worst, best, average); the mode is
//! a traversal parameter and per-mode results never leak into each other.
//! Recursion structure (branching factor, divisors) is syntactic and thus
//! identical across modes; when the Master Theorem resolves a recurrence,
//! the comparison uses the worst-case local work and the resulting tight
//! closed form becomes the function's cost in every mode.

use std::collections::{BTreeMap, HashMap};

use ordo_parser::ast::{BinOp, Expr, Function, Program, Sequence, Stmt, UnaryOp};

use crate::cost::{branch_cost, while_cost, Mode};
use crate::recurrence::{extract_shrink, master_theorem, Recurrence, RecursionState};
use crate::report::{AnalysisReport, CaseBound};
use crate::symbolic::{Dominant, Rational, SymExpr};

/// Identifiers treated as the problem-size symbol `n` when they appear in
/// loop bounds or call arguments. Matching is case-insensitive.
const SIZE_NAMES: [&str; 5] = ["n", "m", "size", "len", "length"];

/// A single-use complexity analyzer.
///
/// State (memoized function costs, recursion facts, the per-line cost map)
/// is scoped to one [`analyze`](Analyzer::analyze) call. Instances are cheap;
/// use a fresh parser/analyzer pair per request rather than sharing one
/// across concurrent analyses.
#[derive(Default)]
pub struct Analyzer {
    /// Master-resolved closed forms from the worst pass, per function.
    resolved: HashMap<String, (Dominant, SymExpr)>,
    /// Recursion facts and worst-case local work, per function.
    rec_meta: HashMap<String, (RecursionState, Dominant)>,
    /// Worst-case cost per stamped source line.
    line_costs: BTreeMap<u32, SymExpr>,
    mode: Mode,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a program and report bounds for its entry function (the first
    /// function). Never fails: analysis-time ambiguities degrade to the
    /// local-work policy and are encoded in the report.
    pub fn analyze(&mut self, program: &Program) -> AnalysisReport {
        self.resolved.clear();
        self.rec_meta.clear();
        self.line_costs.clear();

        let worst = self.pass(program, Mode::Worst);
        let best = self.pass(program, Mode::Best);
        let average = self.pass(program, Mode::Average);

        let Some(entry) = program.functions.first() else {
            return constant_report();
        };
        let name = &entry.name;

        let (worst_case, best_case, average_case, theta) = match self.resolved.get(name) {
            Some((dom, _)) => {
                // A resolved recurrence is a tight bound in every mode.
                let expr = dom.expr_string();
                (
                    CaseBound {
                        expr: expr.clone(),
                        notation: format!("O({dom})"),
                    },
                    CaseBound {
                        expr: expr.clone(),
                        notation: format!("Ω({dom})"),
                    },
                    CaseBound {
                        expr,
                        notation: format!("Θ({dom})"),
                    },
                    Some(format!("Θ({dom})")),
                )
            }
            None => {
                let w = &worst[name];
                let b = &best[name];
                let a = &average[name];
                let w_dom = w.dominant();
                let b_dom = b.dominant();
                let a_dom = a.dominant();
                let theta = if w_dom == b_dom {
                    Some(format!("Θ({w_dom})"))
                } else {
                    None
                };
                (
                    CaseBound {
                        expr: w.to_string(),
                        notation: format!("O({w_dom})"),
                    },
                    CaseBound {
                        expr: b.to_string(),
                        notation: format!("Ω({b_dom})"),
                    },
                    CaseBound {
                        expr: a.to_string(),
                        notation: format!("Θ({a_dom})"),
                    },
                    theta,
                )
            }
        };

        let (is_recursive, recurrence) = match self.rec_meta.get(name) {
            Some((state, local_work)) if state.is_recursive() => (
                true,
                Some(
                    Recurrence {
                        state,
                        local_work,
                    }
                    .to_string(),
                ),
            ),
            _ => (false, None),
        };

        AnalysisReport {
            worst_case,
            best_case,
            average_case,
            theta,
            is_recursive,
            recurrence,
            line_costs: self
                .line_costs
                .iter()
                .map(|(line, cost)| (*line, cost.to_string()))
                .collect(),
        }
    }

    /// One traversal of every function in program order, in a single mode.
    /// Returns the memo table of per-function costs.
    fn pass(&mut self, program: &Program, mode: Mode) -> HashMap<String, SymExpr> {
        self.mode = mode;
        let mut memo = HashMap::new();
        for func in &program.functions {
            let cost = self.visit_function(func, &memo);
            memo.insert(func.name.clone(), cost);
        }
        memo
    }

    fn visit_function(&mut self, func: &Function, memo: &HashMap<String, SymExpr>) -> SymExpr {
        let mut rec = RecursionState::default();
        let local = self.visit_seq(&func.body, memo, &func.name, &mut rec);

        if self.mode == Mode::Worst {
            let local_dom = local.dominant();
            if rec.is_recursive() {
                if let Some(b) = rec.divisor_consensus() {
                    if let Some(dom) = master_theorem(rec.calls, b, &local_dom) {
                        let expr = dom.to_expr();
                        self.resolved
                            .insert(func.name.clone(), (dom, expr.clone()));
                        self.rec_meta.insert(func.name.clone(), (rec, local_dom));
                        return expr;
                    }
                }
            }
            self.rec_meta.insert(func.name.clone(), (rec, local_dom));
            local
        } else if let Some((_, expr)) = self.resolved.get(&func.name) {
            expr.clone()
        } else {
            local
        }
    }

    fn visit_seq(
        &mut self,
        seq: &Sequence,
        memo: &HashMap<String, SymExpr>,
        fname: &str,
        rec: &mut RecursionState,
    ) -> SymExpr {
        let mut cost = SymExpr::zero();
        for stmt in &seq.stmts {
            cost = cost + self.visit_stmt(stmt, memo, fname, rec);
        }
        cost
    }

    fn visit_stmt(
        &mut self,
        stmt: &Stmt,
        memo: &HashMap<String, SymExpr>,
        fname: &str,
        rec: &mut RecursionState,
    ) -> SymExpr {
        match stmt {
            // The parser splices blocks away; handle hand-built trees anyway.
            Stmt::Block(seq) => self.visit_seq(seq, memo, fname, rec),
            Stmt::Assign { value, line, .. } => {
                let cost = SymExpr::one() + self.visit_expr(value, memo, fname, rec);
                self.record_line(*line, &cost);
                cost
            }
            Stmt::For {
                var,
                start,
                end,
                body,
                line,
            } => {
                let start = resolve_value(start);
                let end = resolve_value(end);
                let body_cost = self.visit_seq(body, memo, fname, rec);
                let cost = body_cost.sum_over(var, &start, &end);
                self.record_line(*line, &cost);
                cost
            }
            Stmt::While {
                condition,
                body,
                line,
            } => {
                let cond = self.visit_expr(condition, memo, fname, rec);
                let body_cost = self.visit_seq(body, memo, fname, rec);
                let cost = while_cost(self.mode, &cond, &body_cost);
                self.record_line(*line, &cost);
                cost
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                line,
            } => {
                let cond = self.visit_expr(condition, memo, fname, rec);
                let then_cost = self.visit_seq(then_branch, memo, fname, rec);
                let else_cost = else_branch
                    .as_ref()
                    .map(|seq| self.visit_seq(seq, memo, fname, rec));
                let cost = branch_cost(self.mode, &cond, &then_cost, else_cost.as_ref());
                self.record_line(*line, &cost);
                cost
            }
            Stmt::Call { name, args, line } => {
                let cost = self.call_cost(name, args, memo, fname, rec);
                self.record_line(*line, &cost);
                cost
            }
        }
    }

    /// Cost of evaluating an expression: one unit per literal, variable
    /// access, or operator application.
    fn visit_expr(
        &mut self,
        expr: &Expr,
        memo: &HashMap<String, SymExpr>,
        fname: &str,
        rec: &mut RecursionState,
    ) -> SymExpr {
        match expr {
            Expr::Number { .. } | Expr::StringLit { .. } | Expr::Var { .. } => SymExpr::one(),
            Expr::BinOp { lhs, rhs, .. } => {
                SymExpr::one()
                    + self.visit_expr(lhs, memo, fname, rec)
                    + self.visit_expr(rhs, memo, fname, rec)
            }
            Expr::UnaryOp { operand, .. } => {
                SymExpr::one() + self.visit_expr(operand, memo, fname, rec)
            }
            Expr::Call { name, args } => self.call_cost(name, args, memo, fname, rec),
        }
    }

    /// Call cost: a self-call contributes zero local cost (its weight lives
    /// in the recurrence) and records its shrink; a previously analyzed
    /// function contributes its memoized cost; an unknown callee costs 1.
    fn call_cost(
        &mut self,
        name: &str,
        args: &[Expr],
        memo: &HashMap<String, SymExpr>,
        fname: &str,
        rec: &mut RecursionState,
    ) -> SymExpr {
        if name == fname {
            rec.calls += 1;
            if let Some(first) = args.first() {
                if let Some(shrink) = extract_shrink(&resolve_value(first)) {
                    rec.shrinks.push(shrink);
                }
            }
            return SymExpr::zero();
        }
        match memo.get(name) {
            Some(cost) => cost.clone(),
            None => SymExpr::one(),
        }
    }

    fn record_line(&mut self, line: Option<u32>, cost: &SymExpr) {
        if self.mode != Mode::Worst {
            return;
        }
        let Some(line) = line else { return };
        let entry = self.line_costs.entry(line).or_insert_with(SymExpr::zero);
        *entry = entry.clone() + cost.clone();
    }
}

/// Resolve a bound/argument expression to a symbolic value: numeric literals
/// become constants, recognized size names become `n`, other identifiers
/// become opaque symbols, and anything outside the `+ - * /` fragment
/// degrades to the constant 1.
fn resolve_value(expr: &Expr) -> SymExpr {
    match expr {
        Expr::Number { value } => SymExpr::num(Rational::from_f64(*value)),
        Expr::Var { name } => {
            if SIZE_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
                SymExpr::size()
            } else {
                SymExpr::sym(name.clone())
            }
        }
        Expr::BinOp { op, lhs, rhs } => {
            let l = resolve_value(lhs);
            let r = resolve_value(rhs);
            match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div | BinOp::IntDiv => match r.as_const().and_then(|c| c.recip()) {
                    Some(inv) => l.mul_rat(inv),
                    None => SymExpr::one(),
                },
                _ => SymExpr::one(),
            }
        }
        Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand,
        } => resolve_value(operand).mul_rat(-Rational::ONE),
        _ => SymExpr::one(),
    }
}

fn constant_report() -> AnalysisReport {
    let unit = |notation: &str| CaseBound {
        expr: "1".to_string(),
        notation: notation.to_string(),
    };
    AnalysisReport {
        worst_case: unit("O(1)"),
        best_case: unit("Ω(1)"),
        average_case: unit("Θ(1)"),
        theta: Some("Θ(1)".to_string()),
        is_recursive: false,
        recurrence: None,
        line_costs: BTreeMap::new(),
    }
}
