//! Per-mode cost combination rules for control constructs.

use crate::symbolic::{Rational, SymExpr};

/// Execution-case mode of an analysis pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Worst,
    Best,
    Average,
}

/// Cost of an `IF` statement: condition plus the mode's combination of the
/// branch costs. An absent `ELSE` branch costs 1 (the fall-through jump).
pub fn branch_cost(
    mode: Mode,
    cond: &SymExpr,
    then_cost: &SymExpr,
    else_cost: Option<&SymExpr>,
) -> SymExpr {
    let fallthrough = SymExpr::one();
    let else_cost = else_cost.unwrap_or(&fallthrough);
    let combined = match mode {
        Mode::Worst => then_cost.max(else_cost),
        Mode::Best => then_cost.min(else_cost),
        Mode::Average => (then_cost.clone() + else_cost.clone()).mul_rat(Rational::new(1, 2)),
    };
    cond.clone() + combined
}

/// Cost of a `WHILE` loop. The iteration count is statically undecidable, so
/// this is a documented heuristic, not a derived bound: worst case assumes
/// `n` iterations, best case assumes the body never runs, average case
/// assumes `n/2` iterations.
pub fn while_cost(mode: Mode, cond: &SymExpr, body: &SymExpr) -> SymExpr {
    let per_iter = cond.clone() + body.clone();
    match mode {
        Mode::Worst => cond.clone() + per_iter * SymExpr::size(),
        Mode::Best => cond.clone(),
        Mode::Average => {
            cond.clone() + (per_iter * SymExpr::size()).mul_rat(Rational::new(1, 2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_worst_takes_max() {
        let cond = SymExpr::int(3);
        let then_c = SymExpr::size();
        let else_c = SymExpr::int(2);
        let worst = branch_cost(Mode::Worst, &cond, &then_c, Some(&else_c));
        assert_eq!(worst.to_string(), "n + 3");
    }

    #[test]
    fn branch_best_takes_min() {
        let cond = SymExpr::int(3);
        let then_c = SymExpr::size();
        let else_c = SymExpr::int(2);
        let best = branch_cost(Mode::Best, &cond, &then_c, Some(&else_c));
        assert_eq!(best.to_string(), "5");
    }

    #[test]
    fn branch_average_weights_equally() {
        let cond = SymExpr::int(1);
        let then_c = SymExpr::size();
        let avg = branch_cost(Mode::Average, &cond, &then_c, None);
        assert_eq!(avg.to_string(), "1/2*n + 3/2");
    }

    #[test]
    fn missing_else_counts_one() {
        let cond = SymExpr::int(1);
        let then_c = SymExpr::int(4);
        let best = branch_cost(Mode::Best, &cond, &then_c, None);
        assert_eq!(best.to_string(), "2");
    }

    #[test]
    fn while_heuristics() {
        let cond = SymExpr::int(3);
        let body = SymExpr::int(4);
        assert_eq!(while_cost(Mode::Worst, &cond, &body).to_string(), "7*n + 3");
        assert_eq!(while_cost(Mode::Best, &cond, &body).to_string(), "3");
        assert_eq!(
            while_cost(Mode::Average, &cond, &body).to_string(),
            "7/2*n + 3"
        );
    }
}
