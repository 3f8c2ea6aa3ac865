//! The symbolic cost domain.
//!
//! Cost expressions are sums of monomials `coeff · n^d · log(n)^k · Π s^e`
//! over the problem-size symbol `n` and opaque symbols `s` (loop iterators,
//! unrecognized identifiers). Rational coefficients and exponents; no general
//! computer algebra. `max`/`min` of two expressions are resolved during
//! simplification by growth comparison, never numerically.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

// ===========================================================================
// Rational numbers
// ===========================================================================

/// A normalized rational: `den > 0`, `gcd(num, den) = 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    pub fn new(num: i64, den: i64) -> Self {
        Self::fit(num as i128, den as i128)
    }

    pub fn from_int(n: i64) -> Self {
        Rational { num: n, den: 1 }
    }

    /// Build from a wide numerator/denominator, reducing first and halving
    /// both parts until they fit in `i64` (keeps results finite on inputs far
    /// outside any realistic cost expression).
    fn fit(mut num: i128, mut den: i128) -> Self {
        if den == 0 {
            // Callers guard against zero denominators; degrade to zero.
            return Rational::ZERO;
        }
        if den < 0 {
            num = -num;
            den = -den;
        }
        let g = gcd_i128(num.unsigned_abs(), den.unsigned_abs());
        if g > 1 {
            num /= g as i128;
            den /= g as i128;
        }
        while num > i64::MAX as i128
            || num < i64::MIN as i128
            || den > i64::MAX as i128
        {
            num /= 2;
            den /= 2;
            if den == 0 {
                den = 1;
            }
        }
        Rational {
            num: num as i64,
            den: den as i64,
        }
    }

    /// Convert a literal value. Integral values map exactly; decimals are
    /// scaled by powers of ten (the lexer only produces finite decimals).
    pub fn from_f64(v: f64) -> Self {
        if !v.is_finite() {
            return Rational::ZERO;
        }
        let mut scaled = v;
        let mut den: i128 = 1;
        for _ in 0..9 {
            if scaled.fract() == 0.0 {
                break;
            }
            scaled *= 10.0;
            den *= 10;
        }
        Self::fit(scaled.round() as i128, den)
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    pub fn recip(&self) -> Option<Self> {
        if self.num == 0 {
            None
        } else {
            Some(Self::fit(self.den as i128, self.num as i128))
        }
    }

    pub fn abs(&self) -> Self {
        Rational {
            num: self.num.abs(),
            den: self.den,
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Integer value, when integral.
    pub fn as_integer(&self) -> Option<i64> {
        if self.den == 1 {
            Some(self.num)
        } else {
            None
        }
    }
}

fn gcd_i128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

impl Add for Rational {
    type Output = Rational;
    fn add(self, rhs: Rational) -> Rational {
        Rational::fit(
            self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Sub for Rational {
    type Output = Rational;
    fn sub(self, rhs: Rational) -> Rational {
        self + (-rhs)
    }
}

impl Mul for Rational {
    type Output = Rational;
    fn mul(self, rhs: Rational) -> Rational {
        Rational::fit(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

// ===========================================================================
// Monomials
// ===========================================================================

/// Growth shape of a monomial, ordered by asymptotic dominance:
/// degree in `n` first, then log power, then opaque symbols.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct GrowthKey {
    n_pow: Rational,
    log_pow: u32,
    syms: BTreeMap<String, Rational>,
}

#[derive(Clone, Debug, PartialEq)]
struct Monomial {
    coeff: Rational,
    key: GrowthKey,
}

impl Monomial {
    fn constant(coeff: Rational) -> Self {
        Monomial {
            coeff,
            key: GrowthKey {
                n_pow: Rational::ZERO,
                log_pow: 0,
                syms: BTreeMap::new(),
            },
        }
    }

    fn mul(&self, other: &Monomial) -> Monomial {
        let mut syms = self.key.syms.clone();
        for (name, pow) in &other.key.syms {
            let entry = syms.entry(name.clone()).or_insert(Rational::ZERO);
            *entry = *entry + *pow;
        }
        syms.retain(|_, p| !p.is_zero());
        Monomial {
            coeff: self.coeff * other.coeff,
            key: GrowthKey {
                n_pow: self.key.n_pow + other.key.n_pow,
                log_pow: self.key.log_pow + other.key.log_pow,
                syms,
            },
        }
    }

    /// The monomial with a given symbol removed (its exponent forced to 0).
    fn without(&self, var: &str) -> Monomial {
        let mut m = self.clone();
        m.key.syms.remove(var);
        m
    }

    fn var_pow(&self, var: &str) -> Rational {
        self.key.syms.get(var).copied().unwrap_or(Rational::ZERO)
    }
}

// ===========================================================================
// Symbolic expressions
// ===========================================================================

/// A cost expression in monomial normal form. Terms are kept sorted by
/// descending growth; like terms are combined; zero terms are dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct SymExpr {
    terms: Vec<Monomial>,
}

impl SymExpr {
    pub fn zero() -> Self {
        SymExpr { terms: Vec::new() }
    }

    pub fn one() -> Self {
        SymExpr::num(Rational::ONE)
    }

    pub fn num(value: Rational) -> Self {
        SymExpr {
            terms: vec![Monomial::constant(value)],
        }
        .normalized()
    }

    pub fn int(value: i64) -> Self {
        SymExpr::num(Rational::from_int(value))
    }

    /// The problem-size symbol `n`.
    pub fn size() -> Self {
        SymExpr {
            terms: vec![Monomial {
                coeff: Rational::ONE,
                key: GrowthKey {
                    n_pow: Rational::ONE,
                    log_pow: 0,
                    syms: BTreeMap::new(),
                },
            }],
        }
    }

    /// An opaque symbol: a loop iterator or an identifier that is not a
    /// recognized size name. Constant with respect to `n`.
    pub fn sym(name: impl Into<String>) -> Self {
        let mut syms = BTreeMap::new();
        syms.insert(name.into(), Rational::ONE);
        SymExpr {
            terms: vec![Monomial {
                coeff: Rational::ONE,
                key: GrowthKey {
                    n_pow: Rational::ZERO,
                    log_pow: 0,
                    syms,
                },
            }],
        }
    }

    /// `n^degree · log(n)^log_pow` with unit coefficient.
    pub fn size_term(degree: Rational, log_pow: u32) -> Self {
        SymExpr {
            terms: vec![Monomial {
                coeff: Rational::ONE,
                key: GrowthKey {
                    n_pow: degree,
                    log_pow,
                    syms: BTreeMap::new(),
                },
            }],
        }
        .normalized()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The constant value of the expression, when it has no symbolic part.
    pub fn as_const(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::ZERO),
            1 => {
                let m = &self.terms[0];
                if m.key.n_pow.is_zero() && m.key.log_pow == 0 && m.key.syms.is_empty() {
                    Some(m.coeff)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn depends_on(&self, var: &str) -> bool {
        self.terms.iter().any(|m| m.key.syms.contains_key(var))
    }

    /// Decompose as `coeff·n + constant` when the expression has exactly
    /// that shape (symbol-free, no logs, degree at most 1).
    pub fn as_linear_in_size(&self) -> Option<(Rational, Rational)> {
        let mut coeff = Rational::ZERO;
        let mut constant = Rational::ZERO;
        for m in &self.terms {
            if m.key.log_pow != 0 || !m.key.syms.is_empty() {
                return None;
            }
            if m.key.n_pow.is_one() {
                coeff = m.coeff;
            } else if m.key.n_pow.is_zero() {
                constant = m.coeff;
            } else {
                return None;
            }
        }
        Some((coeff, constant))
    }

    fn normalized(mut self) -> Self {
        self.terms.sort_by(|a, b| b.key.cmp(&a.key));
        let mut merged: Vec<Monomial> = Vec::with_capacity(self.terms.len());
        for term in self.terms {
            match merged.last_mut() {
                Some(last) if last.key == term.key => {
                    last.coeff = last.coeff + term.coeff;
                }
                _ => merged.push(term),
            }
        }
        merged.retain(|m| !m.coeff.is_zero());
        SymExpr { terms: merged }
    }

    pub fn mul_rat(&self, r: Rational) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|m| Monomial {
                coeff: m.coeff * r,
                key: m.key.clone(),
            })
            .collect();
        SymExpr { terms }.normalized()
    }

    /// Raise to a non-negative integer power by repeated multiplication.
    pub fn pow_int(&self, exp: u32) -> Self {
        let mut acc = SymExpr::one();
        for _ in 0..exp {
            acc = acc * self.clone();
        }
        acc
    }

    /// Compare two expressions by asymptotic growth, then coefficients.
    /// Total and deterministic on the normal form.
    pub fn cmp_growth(&self, other: &SymExpr) -> Ordering {
        for (a, b) in self.terms.iter().zip(other.terms.iter()) {
            match a.key.cmp(&b.key) {
                Ordering::Equal => match a.coeff.cmp(&b.coeff) {
                    Ordering::Equal => continue,
                    ord => return ord,
                },
                ord => return ord,
            }
        }
        match self.terms.len().cmp(&other.terms.len()) {
            Ordering::Equal => Ordering::Equal,
            Ordering::Greater => {
                // `self` has extra trailing terms; their sign decides.
                if self.terms[other.terms.len()].coeff.is_negative() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            Ordering::Less => {
                if other.terms[self.terms.len()].coeff.is_negative() {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
        }
    }

    /// The `max` combinator, resolved by growth comparison.
    pub fn max(&self, other: &SymExpr) -> SymExpr {
        if self.cmp_growth(other) == Ordering::Less {
            other.clone()
        } else {
            self.clone()
        }
    }

    /// The `min` combinator, resolved by growth comparison.
    pub fn min(&self, other: &SymExpr) -> SymExpr {
        if self.cmp_growth(other) == Ordering::Greater {
            other.clone()
        } else {
            self.clone()
        }
    }

    /// Closed-form summation of `self` over `var` ranging from `start` to
    /// `end` inclusive. Terms free of `var` multiply by the iteration count
    /// `end − start + 1`; terms linear in `var` use the arithmetic-series
    /// closed form; higher integer powers are bounded by the end value
    /// (dominant term preserved).
    pub fn sum_over(&self, var: &str, start: &SymExpr, end: &SymExpr) -> SymExpr {
        let count = end.clone() - start.clone() + SymExpr::one();
        let half = Rational::new(1, 2);
        let series = (start.clone() + end.clone()) * count.clone();

        let mut acc = SymExpr::zero();
        for term in &self.terms {
            let single = SymExpr {
                terms: vec![term.clone()],
            };
            let k = term.var_pow(var);
            let base = SymExpr {
                terms: vec![term.without(var)],
            };
            if k.is_zero() {
                acc = acc + single * count.clone();
            } else if k.is_one() {
                acc = acc + base * series.clone().mul_rat(half);
            } else if let Some(p) = k.as_integer() {
                if p >= 2 {
                    acc = acc + base * end.pow_int(p as u32) * count.clone();
                } else {
                    // Negative powers of an iterator do not arise from the
                    // grammar; treat as constant in `var`.
                    acc = acc + base * count.clone();
                }
            } else {
                acc = acc + base * count.clone();
            }
        }
        acc
    }

    /// The dominant asymptotic term with respect to `n`. Opaque symbols and
    /// coefficients are constants and do not contribute.
    pub fn dominant(&self) -> Dominant {
        let Some(top) = self.terms.first() else {
            return Dominant::One;
        };
        let degree = top.key.n_pow;
        let log_pow = top.key.log_pow;
        if degree.is_negative() || (degree.is_zero() && log_pow == 0) {
            return Dominant::One;
        }
        Dominant::Term { degree, log_pow }
    }
}

impl Add for SymExpr {
    type Output = SymExpr;
    fn add(self, rhs: SymExpr) -> SymExpr {
        let mut terms = self.terms;
        terms.extend(rhs.terms);
        SymExpr { terms }.normalized()
    }
}

impl Sub for SymExpr {
    type Output = SymExpr;
    fn sub(self, rhs: SymExpr) -> SymExpr {
        self + rhs.mul_rat(-Rational::ONE)
    }
}

impl Mul for SymExpr {
    type Output = SymExpr;
    fn mul(self, rhs: SymExpr) -> SymExpr {
        let mut terms = Vec::with_capacity(self.terms.len() * rhs.terms.len());
        for a in &self.terms {
            for b in &rhs.terms {
                terms.push(a.mul(b));
            }
        }
        SymExpr { terms }.normalized()
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            let coeff = term.coeff;
            if i == 0 {
                if coeff.is_negative() {
                    write!(f, "-")?;
                }
            } else if coeff.is_negative() {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            write_monomial(f, &coeff.abs(), &term.key)?;
        }
        Ok(())
    }
}

fn write_monomial(f: &mut fmt::Formatter<'_>, coeff: &Rational, key: &GrowthKey) -> fmt::Result {
    let mut factors: Vec<String> = Vec::new();
    if !key.n_pow.is_zero() {
        factors.push(power_str("n", key.n_pow));
    }
    if key.log_pow == 1 {
        factors.push("log(n)".to_string());
    } else if key.log_pow > 1 {
        factors.push(format!("log(n)^{}", key.log_pow));
    }
    for (name, pow) in &key.syms {
        factors.push(power_str(name, *pow));
    }
    if factors.is_empty() {
        return write!(f, "{coeff}");
    }
    if !coeff.is_one() {
        write!(f, "{coeff}*")?;
    }
    write!(f, "{}", factors.join("*"))
}

fn power_str(base: &str, pow: Rational) -> String {
    if pow.is_one() {
        base.to_string()
    } else if let Some(p) = pow.as_integer() {
        if p >= 0 {
            format!("{base}^{p}")
        } else {
            format!("{base}^({p})")
        }
    } else {
        format!("{base}^({pow})")
    }
}

// ===========================================================================
// Dominant terms
// ===========================================================================

/// The reduced asymptotic class of a cost expression: the payload of an
/// `O(…)` / `Ω(…)` / `Θ(…)` notation.
#[derive(Clone, Debug, PartialEq)]
pub enum Dominant {
    /// Asymptotically constant.
    One,
    /// `n^degree · log(n)^log_pow`.
    Term { degree: Rational, log_pow: u32 },
    /// `n^(log_b(a))` with a non-rational critical exponent, from a
    /// Master-Theorem case-1 resolution.
    CritExp { a: u32, b: Rational },
}

impl Dominant {
    /// Degree in `n` as a float, for growth-class comparison.
    pub fn degree_f64(&self) -> f64 {
        match self {
            Dominant::One => 0.0,
            Dominant::Term { degree, .. } => degree.to_f64(),
            Dominant::CritExp { a, b } => (*a as f64).ln() / b.to_f64().ln(),
        }
    }

    pub fn log_pow(&self) -> u32 {
        match self {
            Dominant::Term { log_pow, .. } => *log_pow,
            _ => 0,
        }
    }

    /// Exact rendering of the closed form as a symbolic-expression string.
    pub fn expr_string(&self) -> String {
        match self {
            Dominant::One => "1".to_string(),
            Dominant::Term { degree, log_pow } => {
                SymExpr::size_term(*degree, *log_pow).to_string()
            }
            Dominant::CritExp { .. } => self.to_string(),
        }
    }

    /// Re-enter the expression domain, e.g. when a resolved recursive
    /// function is called by another function. The critical exponent is
    /// approximated by a nearby rational; entry-function reporting always
    /// uses the exact [`Dominant`] instead.
    pub fn to_expr(&self) -> SymExpr {
        match self {
            Dominant::One => SymExpr::one(),
            Dominant::Term { degree, log_pow } => SymExpr::size_term(*degree, *log_pow),
            Dominant::CritExp { .. } => {
                SymExpr::size_term(approx_rational(self.degree_f64(), 64), 0)
            }
        }
    }
}

impl fmt::Display for Dominant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dominant::One => write!(f, "1"),
            Dominant::Term { degree, log_pow } => {
                let mut parts: Vec<String> = Vec::new();
                if !degree.is_zero() {
                    parts.push(power_str("n", *degree));
                }
                if *log_pow == 1 {
                    parts.push("log n".to_string());
                } else if *log_pow > 1 {
                    parts.push(format!("log^{log_pow} n"));
                }
                if parts.is_empty() {
                    write!(f, "1")
                } else {
                    write!(f, "{}", parts.join(" "))
                }
            }
            Dominant::CritExp { a, b } => {
                if b.is_integer() {
                    write!(f, "n^(log_{b}({a}))")
                } else {
                    write!(f, "n^(log_({b})({a}))")
                }
            }
        }
    }
}

/// Best rational approximation of `x` with denominator at most `max_den`.
pub fn approx_rational(x: f64, max_den: i64) -> Rational {
    let mut best = Rational::from_int(x.round() as i64);
    let mut best_err = (x - best.to_f64()).abs();
    for den in 2..=max_den {
        let num = (x * den as f64).round() as i64;
        let cand = Rational::new(num, den);
        let err = (x - cand.to_f64()).abs();
        if err + 1e-12 < best_err {
            best = cand;
            best_err = err;
        }
    }
    best
}
