//! Static asymptotic-complexity analysis for ordo pseudocode.
//!
//! The analyzer walks a parsed [`ordo_parser::ast::Program`] and derives
//! symbolic worst-, best-, and average-case cost expressions for the entry
//! function, reduces each to its dominant term, detects self-recursion, and
//! resolves divide-and-conquer recurrences through a Master-Theorem case
//! analysis. Everything is a pure function of the input tree: no I/O, no
//! execution, no shared state between analysis calls.
//!
//! ```
//! use analysis::Analyzer;
//! use ordo_parser::parse_program;
//!
//! let prog = parse_program(
//!     "FUNCTION F(n) BEGIN FOR i <- 1 TO n DO x <- 1 END",
//! )
//! .unwrap();
//! let report = Analyzer::new().analyze(&prog);
//! assert_eq!(report.worst_case.notation, "O(n)");
//! assert_eq!(report.theta.as_deref(), Some("Θ(n)"));
//! ```

pub mod analyzer;
pub mod cost;
pub mod recurrence;
pub mod report;
pub mod symbolic;

pub use analyzer::Analyzer;
pub use report::{AnalysisReport, CaseBound};
