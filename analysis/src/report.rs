//! Serializable result records for one analysis call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One execution case: the simplified symbolic cost and its reduced
/// asymptotic notation, e.g. `{ expr: "2*n + 3", notation: "O(n)" }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseBound {
    pub expr: String,
    pub notation: String,
}

/// The complete result record for the entry function of a program.
///
/// `theta` is present only when the worst- and best-case dominant terms
/// coincide; `recurrence` only when the entry function is self-recursive.
/// `line_costs` maps 1-based source lines to their worst-case symbolic cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub worst_case: CaseBound,
    pub best_case: CaseBound,
    pub average_case: CaseBound,
    pub theta: Option<String>,
    pub is_recursive: bool,
    pub recurrence: Option<String>,
    pub line_costs: BTreeMap<u32, String>,
}
