//! Divide-and-conquer recurrence detection and resolution.
//!
//! A self-recursive function accumulates a branching factor `a` and one
//! shrink per call, extracted from the first call argument. When every call
//! shrinks the problem by the same divisor `b > 1`, the recurrence
//! `T(n) = a·T(n/b) + f(n)` is resolved by comparing the growth class of the
//! local work `f(n)` against the critical exponent `log_b(a)` — no limit
//! computation, just degree/log-power classification.

use crate::symbolic::{Dominant, Rational, SymExpr};
use std::fmt;

const DEGREE_EPS: f64 = 1e-9;

/// How a recursive call shrinks the problem size.
#[derive(Clone, Debug, PartialEq)]
pub enum Shrink {
    /// Argument of the form `n / b`.
    Div(Rational),
    /// Argument of the form `n - c`. Outside the Master Theorem; surfaced in
    /// the recurrence string only.
    Sub(Rational),
}

/// Recursion facts accumulated while walking one function body.
#[derive(Clone, Debug, Default)]
pub struct RecursionState {
    pub calls: u32,
    pub shrinks: Vec<Shrink>,
}

impl RecursionState {
    pub fn is_recursive(&self) -> bool {
        self.calls > 0
    }

    /// The single divisor `b` shared by every self-call, when one exists.
    /// Requires one extracted `Div` shrink per call; mixed divisors, missing
    /// extractions, and subtractive recursion all yield `None`.
    pub fn divisor_consensus(&self) -> Option<Rational> {
        if self.shrinks.len() != self.calls as usize {
            return None;
        }
        let mut iter = self.shrinks.iter();
        let first = match iter.next()? {
            Shrink::Div(b) => *b,
            Shrink::Sub(_) => return None,
        };
        for shrink in iter {
            match shrink {
                Shrink::Div(b) if *b == first => {}
                _ => return None,
            }
        }
        Some(first)
    }
}

/// Extract the shrink pattern from a resolved first argument of a self-call.
///
/// `n/b` resolves to the monomial `c·n` with `c = 1/b`; `n-c` resolves to the
/// two-term form `n + (-c)`. Anything else is unextractable.
pub fn extract_shrink(arg: &SymExpr) -> Option<Shrink> {
    let (coeff, constant) = arg.as_linear_in_size()?;
    if coeff.is_zero() {
        return None;
    }
    if constant.is_zero() {
        if coeff.is_negative() {
            return None;
        }
        return coeff.recip().map(Shrink::Div);
    }
    if coeff.is_one() && constant.is_negative() {
        return Some(Shrink::Sub(-constant));
    }
    None
}

/// Resolve `T(n) = a·T(n/b) + f(n)` by the three-case growth comparison.
///
/// Returns the tight closed form, or `None` when `b ≤ 1` (no shrink) or the
/// comparison is non-finite.
pub fn master_theorem(a: u32, b: Rational, f: &Dominant) -> Option<Dominant> {
    if a == 0 || b.to_f64() <= 1.0 {
        return None;
    }
    let crit = (a as f64).ln() / b.to_f64().ln();
    if !crit.is_finite() {
        return None;
    }
    let f_deg = f.degree_f64();

    if f_deg < crit - DEGREE_EPS {
        // Case 1: local work is dominated by the recursion tree.
        if crit.abs() < DEGREE_EPS {
            return Some(Dominant::One);
        }
        if let Some(exact) = small_rational(crit) {
            return Some(Dominant::Term {
                degree: exact,
                log_pow: 0,
            });
        }
        return Some(Dominant::CritExp { a, b });
    }
    if f_deg <= crit + DEGREE_EPS {
        // Case 2: same polynomial rate; one extra log factor.
        let degree = match f {
            Dominant::One => Rational::ZERO,
            Dominant::Term { degree, .. } => *degree,
            Dominant::CritExp { .. } => small_rational(crit)?,
        };
        return Some(Dominant::Term { degree, log_pow: 1 });
    }
    // Case 3: local work dominates.
    Some(f.clone())
}

/// Recognize `x` as a rational with a small denominator (exact critical
/// exponents like `log_4(8) = 3/2`).
fn small_rational(x: f64) -> Option<Rational> {
    for den in 1..=6i64 {
        let num = (x * den as f64).round();
        if ((x * den as f64) - num).abs() < DEGREE_EPS {
            return Some(Rational::new(num as i64, den));
        }
    }
    None
}

/// Human-readable recurrence, e.g. `T(n) = 2T(n/2) + O(n)`.
pub struct Recurrence<'a> {
    pub state: &'a RecursionState,
    pub local_work: &'a Dominant,
}

impl fmt::Display for Recurrence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.state.calls;
        let work = self.local_work;
        if let Some(b) = self.state.divisor_consensus() {
            return write!(f, "T(n) = {a}T(n/{b}) + O({work})");
        }
        // All-subtractive recursion has its own canonical shape.
        if self.state.shrinks.len() == a as usize {
            if let Some(Shrink::Sub(first)) = self.state.shrinks.first() {
                if self
                    .state
                    .shrinks
                    .iter()
                    .all(|s| matches!(s, Shrink::Sub(c) if c == first))
                {
                    return write!(f, "T(n) = {a}T(n-{first}) + O({work})");
                }
            }
        }
        write!(f, "T(n) = {a}T(n/b) + O({work}), b unresolved")
    }
}
